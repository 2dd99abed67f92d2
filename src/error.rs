//! Error types for request validation.

use thiserror::Error;

/// Reasons a routing request is rejected before any model is built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// At least a depot and one customer are required.
    #[error("at least 2 locations are required (depot + 1 customer), got {0}")]
    TooFewLocations(usize),
    /// Latitude outside [-90, 90] or not a finite number.
    #[error("location {index} ({id}): latitude {lat} is outside [-90, 90]")]
    LatitudeOutOfRange { index: usize, id: String, lat: f64 },
    /// Longitude outside [-180, 180] or not a finite number.
    #[error("location {index} ({id}): longitude {lng} is outside [-180, 180]")]
    LongitudeOutOfRange { index: usize, id: String, lng: f64 },
    /// Two locations share an identifier.
    #[error("duplicate location id {0:?}")]
    DuplicateLocationId(String),
    /// The fleet must contain at least one vehicle.
    #[error("num_vehicles must be at least 1, got {0}")]
    NoVehicles(i64),
    /// The fleet is larger than a solve can represent.
    #[error("num_vehicles must be at most {max}, got {got}")]
    TooManyVehicles { max: usize, got: usize },
    /// One capacity per vehicle is required when capacities are given.
    #[error("number of capacities ({got}) must match num_vehicles ({expected})")]
    CapacityCountMismatch { expected: usize, got: usize },
    /// Capacities must be strictly positive.
    #[error("vehicle {vehicle} has non-positive capacity {capacity}")]
    NonPositiveCapacity { vehicle: usize, capacity: i64 },
    /// One demand per location is required when demands are given.
    #[error("number of demands ({got}) must match number of locations ({expected})")]
    DemandCountMismatch { expected: usize, got: usize },
    /// The depot carries no demand.
    #[error("depot (first location) demand must be 0, got {0}")]
    DepotDemand(i64),
    /// Demands must be non-negative.
    #[error("location {index} has negative demand {demand}")]
    NegativeDemand { index: usize, demand: i64 },
    /// The time limit must lie in (0, 300] seconds.
    #[error("time limit must be in (0, 300] seconds, got {0}")]
    TimeLimitOutOfRange(f64),
    /// An explicit distance matrix is not square.
    #[error("distance matrix row {row} has {got} entries, expected {expected}")]
    MatrixNotSquare { row: usize, expected: usize, got: usize },
    /// An explicit distance matrix has a negative entry, a non-zero diagonal or is asymmetric.
    #[error("distance matrix entry ({from}, {to}) is invalid: {reason}")]
    InvalidMatrixEntry {
        from: usize,
        to: usize,
        reason: &'static str,
    },
}
