//! Decoding of the working assignment into the final [`Solution`].

use crate::problem::{RoutingProblem, DEPOT};
use crate::solution::{Assignment, Solution, VehicleRoute};
use log::{info, warn};

/// Message reported when every customer was routed.
pub const SUCCESS_MESSAGE: &str = "Optimization completed successfully";

/// Turns assignments into caller-facing solutions.
pub struct SolutionExtractor;

impl SolutionExtractor {
    /// Decode `assignment`: one route per vehicle, distances from the matrix
    /// and every customer absent from all routes reported as unvisited.
    ///
    /// `completed` is false when the deadline cut the construction short, in
    /// which case missing customers are blamed on the time limit rather than
    /// on vehicle capacities.
    pub fn extract(problem: &RoutingProblem, assignment: &Assignment, completed: bool) -> Solution {
        let mut routes: Vec<VehicleRoute> = (0..problem.num_vehicles())
            .map(|vehicle| VehicleRoute {
                vehicle_id: vehicle,
                node_sequence: vec![DEPOT, DEPOT],
                distance: 0,
            })
            .collect();

        for route in &assignment.routes {
            let node_sequence = route.node_sequence();
            let distance = problem.matrix().path_length(&node_sequence);
            info!(
                "Vehicle {}: Route {:?}, Distance: {}m",
                route.vehicle, node_sequence, distance
            );
            routes[route.vehicle] = VehicleRoute {
                vehicle_id: route.vehicle,
                node_sequence,
                distance,
            };
        }

        let total_distance = routes.iter().map(|route| route.distance).sum();

        let mut visited = vec![false; problem.num_nodes()];
        for route in &routes {
            for &node in &route.node_sequence {
                visited[node] = true;
            }
        }
        let unvisited_nodes: Vec<usize> = problem.customers().filter(|&node| !visited[node]).collect();

        info!("Total distance: {}m", total_distance);
        let message = if unvisited_nodes.is_empty() {
            SUCCESS_MESSAGE.to_string()
        } else {
            warn!("Unvisited nodes: {:?}", unvisited_nodes);
            unvisited_message(problem, unvisited_nodes.len(), completed)
        };

        Solution {
            routes,
            total_distance,
            unvisited_nodes,
            success: true,
            message,
        }
    }

    /// A failed solution: no routes and every customer unvisited.
    pub fn failure(problem: &RoutingProblem, message: impl Into<String>) -> Solution {
        let message = message.into();
        warn!("No solution found: {}", message);

        Solution {
            routes: Vec::new(),
            total_distance: 0,
            unvisited_nodes: problem.customers().collect(),
            success: false,
            message,
        }
    }
}

fn unvisited_message(problem: &RoutingProblem, count: usize, completed: bool) -> String {
    if !completed {
        format!(
            "Time limit reached before {} location(s) could be assigned; they are reported as unvisited",
            count
        )
    } else if problem.capacity().is_capacitated() {
        format!(
            "Optimization completed with {} unvisited location(s) that could not be assigned within vehicle capacities",
            count
        )
    } else {
        format!("Optimization completed with {} unvisited location(s)", count)
    }
}
