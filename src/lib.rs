//! # geo-cvrp
//!
//! A time-bounded solver for the Capacitated Vehicle Routing Problem over
//! geographic coordinates.
//!
//! A solve runs in two phases. A cheapest-insertion construction seeds one
//! route per vehicle, then a guided local search (relocate, swap, 2-opt and
//! 2-opt* moves under an edge-penalty augmented objective) improves it until
//! the time limit expires or the search converges. Customers that fit no
//! vehicle are reported as unvisited instead of failing the solve.

pub mod config;
pub mod construction;
pub mod context;
pub mod distance;
pub mod error;
pub mod extract;
pub mod local_search;
pub mod problem;
pub mod request;
pub mod solution;
pub mod utils;

use crate::config::Config;
use crate::construction::CheapestInsertion;
use crate::context::{Phase, SolveContext};
use crate::extract::SolutionExtractor;
use crate::local_search::LocalSearch;
use crate::problem::RoutingProblem;
use crate::solution::Solution;
use crate::utils::{format_duration, SearchStatistics};

use log::{debug, info};

pub use crate::error::ValidationError;
pub use crate::request::{optimize, VrpRequest, VrpResponse};

/// Orchestrates construction, improvement and extraction for one problem.
pub struct VrpSolver<'p> {
    pub problem: &'p RoutingProblem,
    pub config: Config,
    pub statistics: SearchStatistics,
}

impl<'p> VrpSolver<'p> {
    /// Create a solver for the given problem and configuration.
    pub fn new(problem: &'p RoutingProblem, config: Config) -> Self {
        VrpSolver {
            problem,
            config,
            statistics: SearchStatistics::default(),
        }
    }

    /// Run both phases within the context's deadline and decode the result.
    pub fn run(&mut self, ctx: &mut SolveContext) -> Solution {
        let problem = self.problem;
        info!(
            "Solving VRP with {} vehicles and {} locations",
            problem.num_vehicles(),
            problem.num_nodes()
        );

        let construction = CheapestInsertion::construct(problem, ctx);
        if !construction.completed && construction.inserted == 0 {
            ctx.enter(Phase::Failed);
            self.statistics.runtime = ctx.elapsed();
            return SolutionExtractor::failure(
                problem,
                "No solution found: the time limit expired before any location could be assigned",
            );
        }
        ctx.enter(Phase::ConstructedInitial);
        self.statistics.construction_distance = construction.assignment.distance;
        info!(
            "Initial assignment: {}m with {} unassigned",
            construction.assignment.distance,
            construction.assignment.unassigned.len()
        );

        ctx.enter(Phase::Improving);
        debug!("Improving with {} left", format_duration(ctx.remaining()));
        let completed = construction.completed;
        let mut local_search = LocalSearch::new(problem, &self.config);
        let best = local_search.improve(construction.assignment, problem, ctx);

        self.statistics.iterations = local_search.iterations;
        self.statistics.local_optima = local_search.local_optima;
        self.statistics.penalized_edges = local_search.penalties().penalized_edges();
        self.statistics.best_distance = best.distance;
        self.statistics.unassigned = best.unassigned.len();
        self.statistics.runtime = ctx.elapsed();
        info!("{}", self.statistics.format());

        let solution = SolutionExtractor::extract(problem, &best, completed);
        ctx.enter(Phase::Finalized);
        solution
    }
}

/// Solve with the default configuration within the problem's own time limit.
pub fn solve(problem: &RoutingProblem) -> Solution {
    let mut ctx = SolveContext::new(problem.time_limit());
    solve_with(problem, &Config::default(), &mut ctx)
}

/// Solve with an explicit configuration and execution context.
pub fn solve_with(problem: &RoutingProblem, config: &Config, ctx: &mut SolveContext) -> Solution {
    VrpSolver::new(problem, config.clone()).run(ctx)
}
