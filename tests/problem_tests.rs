//! Unit tests for request validation and problem formulation.

use geo_cvrp::config::Config;
use geo_cvrp::distance::DistanceMatrix;
use geo_cvrp::error::ValidationError;
use geo_cvrp::problem::{
    validate_time_limit, CapacityDimension, Fleet, Location, ProblemBuilder, RoutingProblem,
    DEFAULT_TIME_LIMIT, MAX_VEHICLES,
};
use geo_cvrp::VrpRequest;
use std::time::Duration;

/// A depot and three customers in Lisbon.
fn lisbon_locations() -> Vec<Location> {
    vec![
        Location::new("depot", 38.7223, -9.1393),
        Location::new("belem", 38.6916, -9.2160),
        Location::new("alfama", 38.7118, -9.1300),
        Location::new("oriente", 38.7680, -9.0990),
    ]
}

fn request_with(num_vehicles: i64, capacities: Option<Vec<i64>>, demands: Option<Vec<i64>>) -> VrpRequest {
    VrpRequest {
        locations: lisbon_locations(),
        num_vehicles,
        vehicle_capacities: capacities,
        demands,
        time_limit_seconds: 5.0,
    }
}

#[test]
fn test_zero_vehicles_is_rejected() {
    let request = request_with(0, None, None);
    assert_eq!(request.validate().unwrap_err(), ValidationError::NoVehicles(0));
    assert!(geo_cvrp::optimize(&request, &Config::default()).is_err());

    let request = request_with(-3, None, None);
    assert_eq!(request.validate().unwrap_err(), ValidationError::NoVehicles(-3));
}

#[test]
fn test_demand_length_mismatch_is_rejected() {
    let request = request_with(2, Some(vec![10, 10]), Some(vec![0, 1, 2]));
    assert_eq!(
        request.validate().unwrap_err(),
        ValidationError::DemandCountMismatch { expected: 4, got: 3 }
    );
    assert!(geo_cvrp::optimize(&request, &Config::default()).is_err());
}

#[test]
fn test_demand_rules() {
    let request = request_with(1, Some(vec![10]), Some(vec![2, 1, 1, 1]));
    assert_eq!(request.validate().unwrap_err(), ValidationError::DepotDemand(2));

    let request = request_with(1, Some(vec![10]), Some(vec![0, 1, -1, 1]));
    assert_eq!(
        request.validate().unwrap_err(),
        ValidationError::NegativeDemand { index: 2, demand: -1 }
    );
}

#[test]
fn test_capacity_rules() {
    let request = request_with(2, Some(vec![10]), None);
    assert_eq!(
        request.validate().unwrap_err(),
        ValidationError::CapacityCountMismatch { expected: 2, got: 1 }
    );

    let request = request_with(2, Some(vec![10, 0]), None);
    assert_eq!(
        request.validate().unwrap_err(),
        ValidationError::NonPositiveCapacity { vehicle: 1, capacity: 0 }
    );

    assert_eq!(
        Fleet::with_capacities(vec![]).unwrap_err(),
        ValidationError::NoVehicles(0)
    );
}

#[test]
fn test_time_limit_bounds() {
    assert_eq!(validate_time_limit(30.0), Ok(Duration::from_secs(30)));
    assert_eq!(validate_time_limit(300.0), Ok(Duration::from_secs(300)));
    assert!(validate_time_limit(0.0).is_err());
    assert!(validate_time_limit(-1.0).is_err());
    assert!(validate_time_limit(300.5).is_err());
    assert!(validate_time_limit(f64::INFINITY).is_err());

    let mut request = request_with(1, None, None);
    request.time_limit_seconds = 301.0;
    assert_eq!(
        request.validate().unwrap_err(),
        ValidationError::TimeLimitOutOfRange(301.0)
    );
}

#[test]
fn test_time_limit_defaults_when_omitted() {
    let json = r#"{
        "locations": [
            {"id": "depot", "lat": 0.0, "lng": 0.0},
            {"id": "a", "lat": 0.0, "lng": 0.1}
        ],
        "num_vehicles": 1
    }"#;
    let request: VrpRequest = serde_json::from_str(json).unwrap();

    assert_eq!(request.time_limit_seconds, DEFAULT_TIME_LIMIT.as_secs_f64());
    assert!(request.vehicle_capacities.is_none());
    assert!(request.demands.is_none());
    assert!(request.validate().is_ok());
}

#[test]
fn test_capacity_dimension_requires_both_inputs() {
    let config = Config::default();

    let both = request_with(2, Some(vec![10, 20]), Some(vec![0, 1, 2, 3]));
    let problem = both.to_problem(&config).unwrap();
    assert!(problem.capacity().is_capacitated());
    assert_eq!(problem.capacity().demand(3), 3);
    assert_eq!(problem.capacity().capacity(1), 20);

    let capacities_only = request_with(2, Some(vec![10, 20]), None);
    let problem = capacities_only.to_problem(&config).unwrap();
    assert_eq!(problem.capacity(), &CapacityDimension::Uncapacitated);

    let demands_only = request_with(2, None, Some(vec![0, 1, 2, 3]));
    let problem = demands_only.to_problem(&config).unwrap();
    assert_eq!(problem.capacity(), &CapacityDimension::Uncapacitated);
    assert_eq!(problem.capacity().demand(3), 0);
    assert!(problem.capacity().admits(0, u64::MAX));
}

#[test]
fn test_formulated_problem_shape() {
    let problem = RoutingProblem::formulate(
        &lisbon_locations(),
        Fleet::uncapacitated(3).unwrap(),
        None,
        Duration::from_secs(10),
    )
    .unwrap();

    assert_eq!(problem.num_nodes(), 4);
    assert_eq!(problem.customer_count(), 3);
    assert_eq!(problem.customers().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(problem.num_vehicles(), 3);
    assert_eq!(problem.depot(), 0);
    assert_eq!(problem.time_limit(), Duration::from_secs(10));
    assert_eq!(problem.distance(1, 2), problem.distance(2, 1));
}

#[test]
fn test_formulate_checks_everything_before_building() {
    let mut locations = lisbon_locations();
    locations[3].lng = 200.0;
    assert!(matches!(
        RoutingProblem::formulate(&locations, Fleet::uncapacitated(1).unwrap(), None, DEFAULT_TIME_LIMIT),
        Err(ValidationError::LongitudeOutOfRange { index: 3, .. })
    ));

    assert!(matches!(
        RoutingProblem::formulate(
            &lisbon_locations(),
            Fleet::uncapacitated(1).unwrap(),
            None,
            Duration::ZERO
        ),
        Err(ValidationError::TimeLimitOutOfRange(_))
    ));
}

#[test]
fn test_new_rejects_depot_demand() {
    let matrix = DistanceMatrix::from_rows(vec![vec![0, 4], vec![4, 0]]).unwrap();
    let result = RoutingProblem::new(
        matrix,
        Fleet::with_capacities(vec![10]).unwrap(),
        Some(vec![1, 1]),
        DEFAULT_TIME_LIMIT,
    );
    assert_eq!(result.unwrap_err(), ValidationError::DepotDemand(1));
}

#[test]
fn test_location_ids_keep_request_order() {
    let request = request_with(1, None, None);
    assert_eq!(request.location_ids(), vec!["depot", "belem", "alfama", "oriente"]);
}

#[test]
fn test_config_builders_and_defaults() {
    let config = Config::new()
        .with_granularity(8)
        .with_penalty_factor(0.3)
        .with_max_iterations_without_improvement(10)
        .with_seed(99)
        .with_parallel_matrix_threshold(64);

    assert_eq!(config.granularity, 8);
    assert_eq!(config.penalty_factor, 0.3);
    assert_eq!(config.max_iterations_without_improvement, 10);
    assert_eq!(config.seed, Some(99));
    assert_eq!(config.parallel_matrix_threshold, 64);

    // Missing fields fall back to the defaults
    let partial: Config = serde_json::from_str(r#"{"seed": 5}"#).unwrap();
    assert_eq!(partial, Config::default().with_seed(5));
}

#[test]
fn test_subnanosecond_time_limit_is_rejected() {
    assert_eq!(
        validate_time_limit(1e-10),
        Err(ValidationError::TimeLimitOutOfRange(1e-10))
    );
    assert_eq!(validate_time_limit(1e-9), Ok(Duration::from_nanos(1)));

    let mut request = request_with(1, None, None);
    request.time_limit_seconds = 1e-10;
    assert_eq!(
        request.validate().unwrap_err(),
        ValidationError::TimeLimitOutOfRange(1e-10)
    );
}

#[test]
fn test_fleet_size_is_bounded() {
    let request = request_with(1_000_000_000, None, None);
    assert_eq!(
        request.validate().unwrap_err(),
        ValidationError::TooManyVehicles {
            max: MAX_VEHICLES,
            got: 1_000_000_000
        }
    );

    assert!(Fleet::uncapacitated(MAX_VEHICLES).is_ok());
    assert!(Fleet::uncapacitated(MAX_VEHICLES + 1).is_err());
}

#[test]
fn test_problem_builder_from_locations() {
    let problem = ProblemBuilder::new()
        .with_locations(lisbon_locations())
        .with_vehicles(2)
        .with_capacities(vec![5, 8])
        .with_demands(vec![0, 2, 3, 4])
        .with_time_limit(Duration::from_secs(3))
        .with_parallel_threshold(0)
        .build()
        .unwrap();

    assert_eq!(problem.num_nodes(), 4);
    assert_eq!(problem.num_vehicles(), 2);
    assert!(problem.capacity().is_capacitated());
    assert_eq!(problem.capacity().capacity(1), 8);
    assert_eq!(problem.time_limit(), Duration::from_secs(3));

    let formulated = RoutingProblem::formulate(
        &lisbon_locations(),
        Fleet::uncapacitated(1).unwrap(),
        None,
        DEFAULT_TIME_LIMIT,
    )
    .unwrap();
    assert_eq!(problem.matrix(), formulated.matrix());
}

#[test]
fn test_problem_builder_defaults_and_errors() {
    let matrix = DistanceMatrix::from_rows(vec![vec![0, 4], vec![4, 0]]).unwrap();
    let problem = ProblemBuilder::new().with_matrix(matrix).build().unwrap();
    assert_eq!(problem.num_vehicles(), 1);
    assert_eq!(problem.time_limit(), DEFAULT_TIME_LIMIT);
    assert_eq!(problem.capacity(), &CapacityDimension::Uncapacitated);

    assert_eq!(
        ProblemBuilder::new().build().unwrap_err(),
        ValidationError::TooFewLocations(0)
    );
    assert_eq!(
        ProblemBuilder::new()
            .with_locations(lisbon_locations())
            .with_vehicles(2)
            .with_capacities(vec![5])
            .build()
            .unwrap_err(),
        ValidationError::CapacityCountMismatch { expected: 2, got: 1 }
    );
    assert_eq!(
        ProblemBuilder::new()
            .with_locations(lisbon_locations())
            .with_demands(vec![0, 1])
            .build()
            .unwrap_err(),
        ValidationError::DemandCountMismatch { expected: 4, got: 2 }
    );
}

#[test]
fn test_working_vehicles_prefer_largest_capacities() {
    // Three customers, five vehicles
    let capacitated = ProblemBuilder::new()
        .with_locations(lisbon_locations())
        .with_vehicles(5)
        .with_capacities(vec![2, 9, 4, 9, 7])
        .with_demands(vec![0, 1, 1, 1])
        .build()
        .unwrap();
    assert_eq!(capacitated.working_vehicles(), vec![1, 3, 4]);

    let uncapacitated = ProblemBuilder::new()
        .with_locations(lisbon_locations())
        .with_vehicles(5)
        .build()
        .unwrap();
    assert_eq!(uncapacitated.working_vehicles(), vec![0, 1, 2]);

    let small_fleet = ProblemBuilder::new()
        .with_locations(lisbon_locations())
        .with_vehicles(2)
        .build()
        .unwrap();
    assert_eq!(small_fleet.working_vehicles(), vec![0, 1]);
}
