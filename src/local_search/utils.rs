//! Utility functions for local search operations.

use crate::problem::RoutingProblem;
use crate::solution::Assignment;

/// Generate the list of nearest customers for a customer based on granularity.
pub fn get_neighbors(customer: usize, problem: &RoutingProblem, granularity: usize) -> Vec<usize> {
    problem
        .matrix()
        .nearest_customers(customer, problem.depot(), granularity)
}

/// Neighbor lists for every node, indexed by node; the depot's list is empty.
pub fn neighbor_lists(problem: &RoutingProblem, granularity: usize) -> Vec<Vec<usize>> {
    let mut lists = vec![Vec::new(); problem.num_nodes()];
    for customer in problem.customers() {
        lists[customer] = get_neighbors(customer, problem, granularity);
    }
    lists
}

/// Map each assigned customer to its (route, position).
pub fn index_positions(assignment: &Assignment, num_nodes: usize) -> Vec<Option<(usize, usize)>> {
    let mut positions = vec![None; num_nodes];
    for (route_idx, route) in assignment.routes.iter().enumerate() {
        for (pos, &customer) in route.customers.iter().enumerate() {
            positions[customer] = Some((route_idx, pos));
        }
    }
    positions
}
