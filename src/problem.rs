//! Problem definition and data structures for the CVRP.

use crate::distance::{DistanceMatrix, DEFAULT_PARALLEL_THRESHOLD};
use crate::error::ValidationError;
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashSet;
use std::time::Duration;

/// Mean earth radius in meters used by the great-circle distance.
pub const EARTH_RADIUS_METERS: f64 = 6_371_009.0;

/// Index of the depot in every problem.
pub const DEPOT: usize = 0;

/// Default solver time budget.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(30);

/// Upper bound on the solver time budget.
pub const MAX_TIME_LIMIT: Duration = Duration::from_secs(300);

/// Largest fleet a request may declare.
pub const MAX_VEHICLES: usize = 100_000;

/// Represents a location (customer or depot) on the globe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    /// Create a new location.
    pub fn new(id: impl Into<String>, lat: f64, lng: f64) -> Self {
        Location {
            id: id.into(),
            lat,
            lng,
        }
    }

    /// Great-circle distance in meters (haversine formula).
    pub fn distance_to(&self, other: &Location) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let d_lat = lat2 - lat1;
        let d_lng = (other.lng - self.lng).to_radians();

        let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);

        // Rounding can push h a hair above 1 for antipodal points.
        2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
    }
}

/// Check location count, coordinate ranges and id uniqueness.
pub fn validate_locations(locations: &[Location]) -> Result<(), ValidationError> {
    if locations.len() < 2 {
        return Err(ValidationError::TooFewLocations(locations.len()));
    }

    let mut seen = HashSet::with_capacity(locations.len());
    for (index, location) in locations.iter().enumerate() {
        if !(-90.0..=90.0).contains(&location.lat) {
            return Err(ValidationError::LatitudeOutOfRange {
                index,
                id: location.id.clone(),
                lat: location.lat,
            });
        }
        if !(-180.0..=180.0).contains(&location.lng) {
            return Err(ValidationError::LongitudeOutOfRange {
                index,
                id: location.id.clone(),
                lng: location.lng,
            });
        }
        if !seen.insert(location.id.as_str()) {
            return Err(ValidationError::DuplicateLocationId(location.id.clone()));
        }
    }

    Ok(())
}

/// Check that a time budget in seconds lies in (0, 300].
///
/// Values too small to be represented as a non-zero [`Duration`] are rejected.
pub fn validate_time_limit(seconds: f64) -> Result<Duration, ValidationError> {
    if !(seconds.is_finite() && seconds > 0.0 && seconds <= MAX_TIME_LIMIT.as_secs_f64()) {
        return Err(ValidationError::TimeLimitOutOfRange(seconds));
    }

    let limit = Duration::from_secs_f64(seconds);
    if limit.is_zero() {
        return Err(ValidationError::TimeLimitOutOfRange(seconds));
    }
    Ok(limit)
}

/// The vehicles available to serve customers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fleet {
    num_vehicles: usize,
    capacities: Option<Vec<u64>>,
}

impl Fleet {
    /// Create a fleet, optionally with one capacity per vehicle.
    pub fn new(num_vehicles: usize, capacities: Option<Vec<u64>>) -> Result<Self, ValidationError> {
        if num_vehicles == 0 {
            return Err(ValidationError::NoVehicles(0));
        }
        if num_vehicles > MAX_VEHICLES {
            return Err(ValidationError::TooManyVehicles {
                max: MAX_VEHICLES,
                got: num_vehicles,
            });
        }

        if let Some(capacities) = &capacities {
            if capacities.len() != num_vehicles {
                return Err(ValidationError::CapacityCountMismatch {
                    expected: num_vehicles,
                    got: capacities.len(),
                });
            }
            if let Some(vehicle) = capacities.iter().position(|&c| c == 0) {
                return Err(ValidationError::NonPositiveCapacity { vehicle, capacity: 0 });
            }
        }

        Ok(Fleet {
            num_vehicles,
            capacities,
        })
    }

    /// A fleet of vehicles without load limits.
    pub fn uncapacitated(num_vehicles: usize) -> Result<Self, ValidationError> {
        Fleet::new(num_vehicles, None)
    }

    /// A fleet with one vehicle per capacity.
    pub fn with_capacities(capacities: Vec<u64>) -> Result<Self, ValidationError> {
        Fleet::new(capacities.len(), Some(capacities))
    }

    pub fn num_vehicles(&self) -> usize {
        self.num_vehicles
    }

    pub fn capacities(&self) -> Option<&[u64]> {
        self.capacities.as_deref()
    }
}

/// The load constraint attached to a problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapacityDimension {
    /// Vehicles carry unlimited load.
    Uncapacitated,
    /// Cumulative demand on a route may not exceed the vehicle's capacity.
    Capacitated {
        demands: Vec<u64>,
        capacities: Vec<u64>,
    },
}

impl CapacityDimension {
    /// Demand of a node (zero without a capacity dimension).
    #[inline]
    pub fn demand(&self, node: usize) -> u64 {
        match self {
            CapacityDimension::Uncapacitated => 0,
            CapacityDimension::Capacitated { demands, .. } => demands[node],
        }
    }

    /// Capacity of a vehicle (unbounded without a capacity dimension).
    #[inline]
    pub fn capacity(&self, vehicle: usize) -> u64 {
        match self {
            CapacityDimension::Uncapacitated => u64::MAX,
            CapacityDimension::Capacitated { capacities, .. } => capacities[vehicle],
        }
    }

    /// Whether `vehicle` can carry `load`.
    #[inline]
    pub fn admits(&self, vehicle: usize, load: u64) -> bool {
        load <= self.capacity(vehicle)
    }

    pub fn is_capacitated(&self) -> bool {
        matches!(self, CapacityDimension::Capacitated { .. })
    }
}

/// Represents an immutable CVRP instance with a single depot at index 0.
#[derive(Debug, Clone)]
pub struct RoutingProblem {
    matrix: DistanceMatrix,
    num_vehicles: usize,
    capacity: CapacityDimension,
    time_limit: Duration,
}

impl RoutingProblem {
    /// Formulate a problem over an already built matrix.
    ///
    /// The capacity dimension is attached only when the fleet has capacities
    /// and demands are given; either one alone leaves the problem uncapacitated.
    pub fn new(
        matrix: DistanceMatrix,
        fleet: Fleet,
        demands: Option<Vec<u64>>,
        time_limit: Duration,
    ) -> Result<Self, ValidationError> {
        Self::validate(matrix.size(), &fleet, demands.as_deref(), time_limit)?;

        let num_vehicles = fleet.num_vehicles;
        let capacity = match (demands, fleet.capacities) {
            (Some(demands), Some(capacities)) => {
                debug!("Adding capacity constraints");
                CapacityDimension::Capacitated {
                    demands,
                    capacities,
                }
            }
            _ => CapacityDimension::Uncapacitated,
        };

        Ok(RoutingProblem {
            matrix,
            num_vehicles,
            capacity,
            time_limit,
        })
    }

    /// Validate all inputs, then build the great-circle matrix and formulate the problem.
    pub fn formulate(
        locations: &[Location],
        fleet: Fleet,
        demands: Option<Vec<u64>>,
        time_limit: Duration,
    ) -> Result<Self, ValidationError> {
        Self::formulate_with_threshold(locations, fleet, demands, time_limit, DEFAULT_PARALLEL_THRESHOLD)
    }

    fn formulate_with_threshold(
        locations: &[Location],
        fleet: Fleet,
        demands: Option<Vec<u64>>,
        time_limit: Duration,
        parallel_threshold: usize,
    ) -> Result<Self, ValidationError> {
        validate_locations(locations)?;
        Self::validate(locations.len(), &fleet, demands.as_deref(), time_limit)?;

        let matrix = DistanceMatrix::build(locations, parallel_threshold)?;
        RoutingProblem::new(matrix, fleet, demands, time_limit)
    }

    fn validate(
        num_nodes: usize,
        fleet: &Fleet,
        demands: Option<&[u64]>,
        time_limit: Duration,
    ) -> Result<(), ValidationError> {
        if num_nodes < 2 {
            return Err(ValidationError::TooFewLocations(num_nodes));
        }
        if fleet.num_vehicles == 0 {
            return Err(ValidationError::NoVehicles(0));
        }
        if let Some(demands) = demands {
            if demands.len() != num_nodes {
                return Err(ValidationError::DemandCountMismatch {
                    expected: num_nodes,
                    got: demands.len(),
                });
            }
            if demands[DEPOT] != 0 {
                return Err(ValidationError::DepotDemand(demands[DEPOT] as i64));
            }
        }
        if time_limit.is_zero() || time_limit > MAX_TIME_LIMIT {
            return Err(ValidationError::TimeLimitOutOfRange(time_limit.as_secs_f64()));
        }
        Ok(())
    }

    pub fn matrix(&self) -> &DistanceMatrix {
        &self.matrix
    }

    /// Distance in meters between two nodes.
    #[inline]
    pub fn distance(&self, from: usize, to: usize) -> i64 {
        self.matrix.get(from, to)
    }

    /// Number of nodes including the depot.
    pub fn num_nodes(&self) -> usize {
        self.matrix.size()
    }

    /// Get the number of customers (excluding the depot).
    pub fn customer_count(&self) -> usize {
        self.num_nodes() - 1
    }

    /// Customer node indices in ascending order.
    pub fn customers(&self) -> impl Iterator<Item = usize> {
        (DEPOT + 1)..self.num_nodes()
    }

    pub fn num_vehicles(&self) -> usize {
        self.num_vehicles
    }

    /// Vehicles that get a route in the working assignment, ascending.
    ///
    /// No solution uses more vehicles than there are customers, so a larger
    /// fleet is cut down to `customer_count` vehicles, preferring the largest
    /// capacities (lowest index among equals). The remaining vehicles stay idle.
    pub fn working_vehicles(&self) -> Vec<usize> {
        let count = self.customer_count();
        if self.num_vehicles <= count {
            return (0..self.num_vehicles).collect();
        }

        match &self.capacity {
            CapacityDimension::Uncapacitated => (0..count).collect(),
            CapacityDimension::Capacitated { capacities, .. } => (0..self.num_vehicles)
                .sorted_by_key(|&vehicle| (Reverse(capacities[vehicle]), vehicle))
                .take(count)
                .sorted()
                .collect(),
        }
    }

    pub fn depot(&self) -> usize {
        DEPOT
    }

    pub fn capacity(&self) -> &CapacityDimension {
        &self.capacity
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }
}

/// Step-by-step construction of a [`RoutingProblem`].
///
/// Nothing is validated until [`ProblemBuilder::build`]; an explicit matrix
/// takes precedence over locations.
#[derive(Debug, Clone)]
pub struct ProblemBuilder {
    locations: Vec<Location>,
    matrix: Option<DistanceMatrix>,
    num_vehicles: usize,
    capacities: Option<Vec<u64>>,
    demands: Option<Vec<u64>>,
    time_limit: Duration,
    parallel_threshold: usize,
}

impl Default for ProblemBuilder {
    fn default() -> Self {
        ProblemBuilder {
            locations: Vec::new(),
            matrix: None,
            num_vehicles: 1,
            capacities: None,
            demands: None,
            time_limit: DEFAULT_TIME_LIMIT,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl ProblemBuilder {
    /// One vehicle, no capacities, the default time limit.
    pub fn new() -> Self {
        ProblemBuilder::default()
    }

    /// Locations to build the great-circle matrix from (depot first).
    pub fn with_locations(mut self, locations: Vec<Location>) -> Self {
        self.locations = locations;
        self
    }

    /// Use an explicit distance matrix instead of locations.
    pub fn with_matrix(mut self, matrix: DistanceMatrix) -> Self {
        self.matrix = Some(matrix);
        self
    }

    pub fn with_vehicles(mut self, num_vehicles: usize) -> Self {
        self.num_vehicles = num_vehicles;
        self
    }

    /// One capacity per vehicle.
    pub fn with_capacities(mut self, capacities: Vec<u64>) -> Self {
        self.capacities = Some(capacities);
        self
    }

    /// One demand per location; the depot's must be zero.
    pub fn with_demands(mut self, demands: Vec<u64>) -> Self {
        self.demands = Some(demands);
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    /// Location count from which matrix rows are computed in parallel.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Validate everything, then build the matrix (if needed) and the problem.
    pub fn build(self) -> Result<RoutingProblem, ValidationError> {
        let fleet = Fleet::new(self.num_vehicles, self.capacities)?;

        match self.matrix {
            Some(matrix) => RoutingProblem::new(matrix, fleet, self.demands, self.time_limit),
            None => RoutingProblem::formulate_with_threshold(
                &self.locations,
                fleet,
                self.demands,
                self.time_limit,
                self.parallel_threshold,
            ),
        }
    }
}
