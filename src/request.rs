//! Wire-level request and response types.
//!
//! Numeric fields are kept signed on the wire so that negative values reach
//! validation and come back as a [`ValidationError`] rather than a parse error.

use crate::config::Config;
use crate::context::{Phase, SearchObserver, SolveContext};
use crate::distance::DistanceMatrix;
use crate::error::ValidationError;
use crate::problem::{
    validate_locations, validate_time_limit, Fleet, Location, ProblemBuilder, RoutingProblem,
    DEFAULT_TIME_LIMIT, MAX_VEHICLES,
};
use crate::solution::Solution;
use crate::VrpSolver;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_time_limit() -> f64 {
    DEFAULT_TIME_LIMIT.as_secs_f64()
}

/// An optimization request. The first location is the depot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VrpRequest {
    pub locations: Vec<Location>,
    pub num_vehicles: i64,
    #[serde(default)]
    pub vehicle_capacities: Option<Vec<i64>>,
    #[serde(default)]
    pub demands: Option<Vec<i64>>,
    #[serde(default = "default_time_limit")]
    pub time_limit_seconds: f64,
}

/// A single vehicle's route, labelled with location ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteResponse {
    pub vehicle_id: usize,
    pub location_ids: Vec<String>,
    pub distance: i64,
}

/// The answer to a [`VrpRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VrpResponse {
    pub total_distance: i64,
    pub routes: Vec<RouteResponse>,
    pub unvisited_nodes: Vec<String>,
    pub success: bool,
    pub message: String,
}

impl VrpRequest {
    /// Validate every field and return the fleet, demands and time limit.
    ///
    /// Nothing is built until all checks have passed.
    pub fn validate(&self) -> Result<(Fleet, Option<Vec<u64>>, Duration), ValidationError> {
        validate_locations(&self.locations)?;

        if self.num_vehicles < 1 {
            return Err(ValidationError::NoVehicles(self.num_vehicles));
        }
        let num_vehicles = self.num_vehicles as usize;
        if num_vehicles > MAX_VEHICLES {
            return Err(ValidationError::TooManyVehicles {
                max: MAX_VEHICLES,
                got: num_vehicles,
            });
        }

        let capacities = match &self.vehicle_capacities {
            Some(capacities) => {
                if capacities.len() != num_vehicles {
                    return Err(ValidationError::CapacityCountMismatch {
                        expected: num_vehicles,
                        got: capacities.len(),
                    });
                }
                if let Some((vehicle, &capacity)) = capacities.iter().enumerate().find(|&(_, &c)| c <= 0) {
                    return Err(ValidationError::NonPositiveCapacity { vehicle, capacity });
                }
                Some(capacities.iter().map(|&c| c as u64).collect())
            }
            None => None,
        };

        let demands = match &self.demands {
            Some(demands) => {
                if demands.len() != self.locations.len() {
                    return Err(ValidationError::DemandCountMismatch {
                        expected: self.locations.len(),
                        got: demands.len(),
                    });
                }
                if demands[0] != 0 {
                    return Err(ValidationError::DepotDemand(demands[0]));
                }
                if let Some((index, &demand)) = demands.iter().enumerate().find(|&(_, &d)| d < 0) {
                    return Err(ValidationError::NegativeDemand { index, demand });
                }
                Some(demands.iter().map(|&d| d as u64).collect())
            }
            None => None,
        };

        let time_limit = validate_time_limit(self.time_limit_seconds)?;
        let fleet = Fleet::new(num_vehicles, capacities)?;

        Ok((fleet, demands, time_limit))
    }

    /// Validate the request and formulate the routing problem.
    pub fn to_problem(&self, config: &Config) -> Result<RoutingProblem, ValidationError> {
        let (fleet, demands, time_limit) = self.validate()?;

        let mut builder = ProblemBuilder::new()
            .with_locations(self.locations.clone())
            .with_vehicles(fleet.num_vehicles())
            .with_time_limit(time_limit)
            .with_parallel_threshold(config.parallel_matrix_threshold);
        if let Some(capacities) = fleet.capacities() {
            builder = builder.with_capacities(capacities.to_vec());
        }
        if let Some(demands) = demands {
            builder = builder.with_demands(demands);
        }
        builder.build()
    }

    /// Location ids in request order.
    pub fn location_ids(&self) -> Vec<String> {
        self.locations.iter().map(|location| location.id.clone()).collect()
    }
}

impl VrpResponse {
    /// Label a solution's node indices with the request's location ids.
    pub fn from_solution(solution: &Solution, locations: &[Location]) -> Self {
        let id = |node: usize| locations[node].id.clone();

        VrpResponse {
            total_distance: solution.total_distance,
            routes: solution
                .routes
                .iter()
                .map(|route| RouteResponse {
                    vehicle_id: route.vehicle_id,
                    location_ids: route.node_sequence.iter().map(|&node| id(node)).collect(),
                    distance: route.distance,
                })
                .collect(),
            unvisited_nodes: solution.unvisited_nodes.iter().map(|&node| id(node)).collect(),
            success: solution.success,
            message: solution.message.clone(),
        }
    }
}

/// Validate, formulate, solve and label a request.
///
/// Only malformed input is returned as an error; infeasibility and solver
/// failure are reported inside the response.
pub fn optimize(request: &VrpRequest, config: &Config) -> Result<VrpResponse, ValidationError> {
    optimize_with(request, config, None)
}

/// Like [`optimize`], reporting progress to `observer`.
pub fn optimize_with(
    request: &VrpRequest,
    config: &Config,
    observer: Option<&mut dyn SearchObserver>,
) -> Result<VrpResponse, ValidationError> {
    info!(
        "Received optimization request for {} locations and {} vehicles",
        request.locations.len(),
        request.num_vehicles
    );

    let time_limit = validate_time_limit(request.time_limit_seconds).unwrap_or(DEFAULT_TIME_LIMIT);
    let mut ctx = SolveContext::new(time_limit);
    if let Some(observer) = observer {
        ctx = ctx.with_observer(observer);
    }

    let (fleet, demands, time_limit) = match request.validate() {
        Ok(parts) => parts,
        Err(err) => {
            error!("Validation error: {}", err);
            ctx.enter(Phase::Failed);
            return Err(err);
        }
    };
    ctx.enter(Phase::Validated);

    let matrix = DistanceMatrix::build(&request.locations, config.parallel_matrix_threshold)?;
    ctx.enter(Phase::MatrixBuilt);

    let problem = RoutingProblem::new(matrix, fleet, demands, time_limit)?;
    ctx.enter(Phase::Formulated);

    let solution = VrpSolver::new(&problem, config.clone()).run(&mut ctx);
    if solution.success {
        info!(
            "Optimization finished. Total distance: {}m",
            solution.total_distance
        );
    } else {
        error!("Solver error: {}", solution.message);
    }

    Ok(VrpResponse::from_solution(&solution, &request.locations))
}
