//! Basic example of using the geo-cvrp library.
//!
//! Reads a JSON request from the path given on the command line, or solves a
//! small built-in request when none is given.

use geo_cvrp::config::Config;
use geo_cvrp::context::SolveContext;
use geo_cvrp::problem::Location;
use geo_cvrp::utils::{format_duration, write_solution};
use geo_cvrp::{VrpRequest, VrpSolver};
use std::env;
use std::fs;
use std::io;

fn sample_request() -> VrpRequest {
    VrpRequest {
        locations: vec![
            Location::new("warehouse", 48.8566, 2.3522),
            Location::new("louvre", 48.8606, 2.3376),
            Location::new("montmartre", 48.8867, 2.3431),
            Location::new("bastille", 48.8532, 2.3691),
            Location::new("la-defense", 48.8918, 2.2362),
            Location::new("bercy", 48.8386, 2.3822),
            Location::new("invalides", 48.8566, 2.3125),
        ],
        num_vehicles: 2,
        vehicle_capacities: Some(vec![10, 10]),
        demands: Some(vec![0, 3, 4, 2, 5, 3, 2]),
        time_limit_seconds: 5.0,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let request = match args.get(1) {
        Some(path) => {
            println!("Loading request from: {}", path);
            serde_json::from_str(&fs::read_to_string(path)?)?
        }
        None => sample_request(),
    };
    println!(
        "Request with {} locations and {} vehicles",
        request.locations.len(),
        request.num_vehicles
    );

    let config = Config::new().with_granularity(20).with_seed(42);
    let problem = request.to_problem(&config)?;

    println!(
        "Starting search (time limit: {})",
        format_duration(problem.time_limit())
    );
    let mut ctx = SolveContext::new(problem.time_limit());
    let mut solver = VrpSolver::new(&problem, config);
    let solution = solver.run(&mut ctx);

    println!("Search completed in {}", format_duration(solver.statistics.runtime));
    println!("{}", solver.statistics.format());
    println!();

    let labels = request.location_ids();
    write_solution(&mut io::stdout().lock(), &solution, &problem, Some(labels.as_slice()))?;

    Ok(())
}
