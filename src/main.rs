//! Command-line front end: reads a JSON request, writes a JSON response.

use clap::Parser;
use geo_cvrp::config::Config;
use geo_cvrp::{optimize, ValidationError, VrpRequest};
use log::{error, LevelFilter};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

/// Errors surfaced by the command-line front end.
#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {path:?}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write output: {0}")]
    WriteOutput(#[from] io::Error),
    #[error("malformed request: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Parser)]
#[command(
    name = "geo-cvrp",
    version,
    about = "Solve a capacitated vehicle routing request with guided local search"
)]
struct Args {
    /// Path to a JSON request ("-" reads standard input)
    #[arg(value_name = "REQUEST", required_unless_present = "info")]
    request: Option<PathBuf>,

    /// Write the response here instead of standard output
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Override the request's time limit in seconds
    #[arg(short, long, value_name = "SECONDS")]
    time_limit: Option<f64>,

    /// Seed for a reproducible search order
    #[arg(long)]
    seed: Option<u64>,

    /// Number of nearest neighbors considered per customer
    #[arg(long)]
    granularity: Option<usize>,

    /// Maximum local optima without improvement before stopping
    #[arg(long)]
    max_iterations_without_improvement: Option<u32>,

    /// Pretty-print the JSON response
    #[arg(long)]
    pretty: bool,

    /// Print service information and exit
    #[arg(long)]
    info: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn config(&self) -> Config {
        let mut config = Config::new();
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(granularity) = self.granularity {
            config = config.with_granularity(granularity);
        }
        if let Some(iterations) = self.max_iterations_without_improvement {
            config = config.with_max_iterations_without_improvement(iterations);
        }
        config
    }
}

fn read_request(path: &Path) -> Result<VrpRequest, CliError> {
    let mut raw = String::new();
    let read = if path.as_os_str() == "-" {
        io::stdin().read_to_string(&mut raw).map(|_| ())
    } else {
        fs::read_to_string(path).map(|contents| raw = contents)
    };
    read.map_err(|source| CliError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(serde_json::from_str(&raw)?)
}

fn service_info() -> serde_json::Value {
    serde_json::json!({
        "name": "Vehicle Routing Problem Optimizer",
        "version": env!("CARGO_PKG_VERSION"),
        "description": env!("CARGO_PKG_DESCRIPTION"),
    })
}

fn run(args: &Args) -> Result<(), CliError> {
    let payload = match &args.request {
        Some(path) if !args.info => {
            let mut request = read_request(path)?;
            if let Some(seconds) = args.time_limit {
                request.time_limit_seconds = seconds;
            }
            let response = optimize(&request, &args.config())?;
            if args.pretty {
                serde_json::to_string_pretty(&response)?
            } else {
                serde_json::to_string(&response)?
            }
        }
        _ => serde_json::to_string_pretty(&service_info())?,
    };

    match &args.output {
        Some(path) => fs::write(path, payload + "\n")?,
        None => writeln!(io::stdout().lock(), "{}", payload)?,
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            let _ = writeln!(io::stderr(), "geo-cvrp: {err}");
            ExitCode::FAILURE
        }
    }
}
