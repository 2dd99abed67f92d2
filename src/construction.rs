//! Cheapest-insertion construction of the initial assignment.

use crate::context::SolveContext;
use crate::problem::{RoutingProblem, DEPOT};
use crate::solution::{Assignment, Route};
use log::{debug, warn};

/// Result of the construction phase.
#[derive(Debug, Clone)]
pub struct Construction {
    pub assignment: Assignment,
    /// Number of customers placed on a route
    pub inserted: usize,
    /// False when the deadline interrupted the construction
    pub completed: bool,
}

/// Cheapest position to insert `node` into `route`, as (added distance, index
/// into `route.customers`). `None` when the vehicle cannot carry the demand.
/// Ties go to the lowest position.
pub fn best_insertion(problem: &RoutingProblem, route: &Route, node: usize) -> Option<(i64, usize)> {
    let load = route.load + problem.capacity().demand(node);
    if !problem.capacity().admits(route.vehicle, load) {
        return None;
    }

    let mut best: Option<(i64, usize)> = None;
    for pos in 0..=route.customers.len() {
        let prev = route.predecessor(pos);
        let next = route.customers.get(pos).copied().unwrap_or(DEPOT);
        let added = problem.distance(prev, node) + problem.distance(node, next)
            - problem.distance(prev, next);

        if best.map_or(true, |(cost, _)| added < cost) {
            best = Some((added, pos));
        }
    }

    best
}

/// Insert `node` at `pos` of the route at `route_idx` and refresh the affected metrics.
pub fn insert(assignment: &mut Assignment, problem: &RoutingProblem, route_idx: usize, pos: usize, node: usize) {
    let route = &mut assignment.routes[route_idx];
    route.customers.insert(pos, node);
    route.update(problem);

    if let Ok(idx) = assignment.unassigned.binary_search(&node) {
        assignment.unassigned.remove(idx);
    }
    assignment.refresh_distance();
}

/// Greedy construction that always performs the globally cheapest feasible insertion.
pub struct CheapestInsertion;

impl CheapestInsertion {
    /// Build an initial assignment, leaving customers that fit no vehicle unassigned.
    ///
    /// Among equal-cost insertions the lowest node index wins, then the lowest
    /// vehicle index, then the lowest position.
    pub fn construct(problem: &RoutingProblem, ctx: &SolveContext) -> Construction {
        let mut assignment = Assignment::empty(problem);
        let num_nodes = problem.num_nodes();
        let num_routes = assignment.routes.len();

        // best[node][route], refreshed per route after each insertion
        let mut best: Vec<Vec<Option<(i64, usize)>>> = vec![vec![None; num_routes]; num_nodes];
        for node in problem.customers() {
            for (route_idx, route) in assignment.routes.iter().enumerate() {
                best[node][route_idx] = best_insertion(problem, route, node);
            }
        }

        let mut inserted = 0;
        let mut completed = true;

        while !assignment.unassigned.is_empty() {
            if ctx.expired() {
                warn!(
                    "Time limit reached during construction with {} customers pending",
                    assignment.unassigned.len()
                );
                completed = false;
                break;
            }

            let mut choice: Option<(i64, usize, usize, usize)> = None;
            for &node in &assignment.unassigned {
                for (route_idx, candidate) in best[node].iter().enumerate() {
                    if let Some((cost, pos)) = *candidate {
                        if choice.map_or(true, |(best_cost, ..)| cost < best_cost) {
                            choice = Some((cost, node, route_idx, pos));
                        }
                    }
                }
            }

            let Some((_, node, route_idx, pos)) = choice else {
                break;
            };

            insert(&mut assignment, problem, route_idx, pos, node);
            inserted += 1;

            for &other in &assignment.unassigned {
                best[other][route_idx] = best_insertion(problem, &assignment.routes[route_idx], other);
            }
        }

        debug!(
            "Construction placed {} customers, distance {}m, {} unassigned",
            inserted,
            assignment.distance,
            assignment.unassigned.len()
        );

        Construction {
            assignment,
            inserted,
            completed,
        }
    }
}
