//! Solution representation for the CVRP.
//!
//! [`Assignment`] is the mutable working state shared by the construction and
//! improvement phases. [`Solution`] is the immutable result handed back to the
//! caller once the search is over.

use crate::problem::{RoutingProblem, DEPOT};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// The customers served by one vehicle, in visiting order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// The vehicle driving this route
    pub vehicle: usize,
    /// The sequence of customer indices (excluding the depot)
    pub customers: Vec<usize>,
    /// The total load of the route
    pub load: u64,
    /// The total distance of the route, depot to depot
    pub distance: i64,
    /// Cumulative demand after each customer
    pub prefix_loads: Vec<u64>,
}

impl Route {
    /// Create a new, empty route for a vehicle.
    pub fn new(vehicle: usize) -> Self {
        Route {
            vehicle,
            customers: Vec::new(),
            load: 0,
            distance: 0,
            prefix_loads: Vec::new(),
        }
    }

    /// Recompute distance, load and prefix loads from the customer sequence.
    pub fn update(&mut self, problem: &RoutingProblem) {
        self.calculate_distance(problem);
        self.calculate_load(problem);
    }

    /// Calculate the total distance of this route.
    pub fn calculate_distance(&mut self, problem: &RoutingProblem) {
        self.distance = problem.matrix().path_length(&self.node_sequence());
    }

    /// Calculate the total load of this route.
    pub fn calculate_load(&mut self, problem: &RoutingProblem) {
        let capacity = problem.capacity();
        let mut total_load = 0;

        self.prefix_loads.clear();
        for &customer in &self.customers {
            total_load += capacity.demand(customer);
            self.prefix_loads.push(total_load);
        }

        self.load = total_load;
    }

    /// Full node sequence with the depot at both ends; `[0, 0]` when empty.
    pub fn node_sequence(&self) -> Vec<usize> {
        let mut nodes = Vec::with_capacity(self.customers.len() + 2);
        nodes.push(DEPOT);
        nodes.extend_from_slice(&self.customers);
        nodes.push(DEPOT);
        nodes
    }

    /// Node visited before position `pos` (the depot for the first customer).
    #[inline]
    pub fn predecessor(&self, pos: usize) -> usize {
        if pos == 0 {
            DEPOT
        } else {
            self.customers[pos - 1]
        }
    }

    /// Node visited after position `pos` (the depot for the last customer).
    #[inline]
    pub fn successor(&self, pos: usize) -> usize {
        self.customers.get(pos + 1).copied().unwrap_or(DEPOT)
    }

    /// Demand carried from the depot up to and including position `pos`.
    #[inline]
    pub fn load_through(&self, pos: usize) -> u64 {
        self.prefix_loads[pos]
    }

    /// Demand of the customers strictly after position `pos`.
    #[inline]
    pub fn load_after(&self, pos: usize) -> u64 {
        self.load - self.prefix_loads[pos]
    }

    /// Check if the route is empty.
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Whether the route's load fits its vehicle.
    pub fn is_feasible(&self, problem: &RoutingProblem) -> bool {
        problem.capacity().admits(self.vehicle, self.load)
    }
}

/// Working assignment of customers to vehicle routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// One route per working vehicle, ascending by vehicle
    pub routes: Vec<Route>,
    /// Customers not on any route, ascending
    pub unassigned: Vec<usize>,
    /// Sum of the route distances
    pub distance: i64,
}

impl Assignment {
    /// An assignment with every working vehicle idle and every customer unassigned.
    pub fn empty(problem: &RoutingProblem) -> Self {
        Assignment {
            routes: problem.working_vehicles().into_iter().map(Route::new).collect(),
            unassigned: problem.customers().collect(),
            distance: 0,
        }
    }

    /// Recompute all route metrics and the total distance.
    pub fn evaluate(&mut self, problem: &RoutingProblem) {
        for route in &mut self.routes {
            route.update(problem);
        }
        self.refresh_distance();
    }

    /// Re-sum the total distance from the cached route distances.
    pub fn refresh_distance(&mut self) {
        self.distance = self.routes.iter().map(|route| route.distance).sum();
    }

    /// Find which route contains a specific customer.
    pub fn route_of(&self, customer: usize) -> Option<usize> {
        self.routes
            .iter()
            .position(|route| route.customers.contains(&customer))
    }

    /// Number of customers placed on a route.
    pub fn assigned_count(&self) -> usize {
        self.routes.iter().map(|route| route.customers.len()).sum()
    }

    /// Whether every route respects its vehicle capacity.
    pub fn is_feasible(&self, problem: &RoutingProblem) -> bool {
        self.routes.iter().all(|route| route.is_feasible(problem))
    }

    /// Compare by unassigned count first, then by distance.
    pub fn quality_cmp(&self, other: &Assignment) -> Ordering {
        self.unassigned
            .len()
            .cmp(&other.unassigned.len())
            .then(self.distance.cmp(&other.distance))
    }

    /// Whether this assignment is strictly better than `other`.
    pub fn is_better_than(&self, other: &Assignment) -> bool {
        self.quality_cmp(other) == Ordering::Less
    }
}

/// A decoded vehicle route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRoute {
    pub vehicle_id: usize,
    /// Node indices starting and ending at the depot
    pub node_sequence: Vec<usize>,
    /// Sum of consecutive matrix lookups along `node_sequence`
    pub distance: i64,
}

/// Represents the final answer to a routing problem.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    /// One route per vehicle, including idle vehicles
    pub routes: Vec<VehicleRoute>,
    /// Sum of all route distances
    pub total_distance: i64,
    /// Customers that appear on no route, ascending
    pub unvisited_nodes: Vec<usize>,
    /// Whether any assignment was produced
    pub success: bool,
    pub message: String,
}

impl fmt::Debug for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solution:")?;
        writeln!(f, "  Success: {}", self.success)?;
        writeln!(f, "  Message: {}", self.message)?;
        writeln!(f, "  Total Distance: {}m", self.total_distance)?;
        writeln!(f, "  Routes: {}", self.routes.len())?;

        for route in &self.routes {
            writeln!(
                f,
                "  Vehicle {}: {:?} (Distance: {}m)",
                route.vehicle_id, route.node_sequence, route.distance
            )?;
        }

        if !self.unvisited_nodes.is_empty() {
            writeln!(f, "  Unvisited: {:?}", self.unvisited_nodes)?;
        }

        Ok(())
    }
}
