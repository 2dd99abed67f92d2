//! Guided local search over the working assignment.
//!
//! Each iteration scans the granular neighborhoods (relocate, swap, 2-opt and
//! 2-opt*) and applies the best feasible move under the augmented objective
//! `distance + λ · Σ penalty(edge)`. When no move improves that objective the
//! current assignment is a local optimum: the edges with the highest utility
//! `d(e) / (1 + penalty(e))` get penalized, pushing the search elsewhere.
//! The best assignment by true distance is kept as the incumbent.

pub mod penalties;
pub mod relocate;
pub mod swap;
pub mod two_opt;
pub mod two_opt_star;
pub mod utils;

use crate::config::Config;
use crate::construction::{best_insertion, insert};
use crate::context::SolveContext;
use crate::problem::RoutingProblem;
use crate::solution::Assignment;
use itertools::Itertools;
use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use self::penalties::EdgePenalties;

/// Deltas above this threshold are not considered improving.
pub const EPSILON: f64 = 1e-6;

/// A neighborhood move, addressed by route and position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Move one customer to `to_pos` of `to_route` (positions before removal).
    Relocate {
        from_route: usize,
        from_pos: usize,
        to_route: usize,
        to_pos: usize,
    },
    /// Exchange two customers on different routes.
    Swap {
        route1: usize,
        pos1: usize,
        route2: usize,
        pos2: usize,
    },
    /// Reverse `customers[start..=end]` of one route.
    TwoOpt { route: usize, start: usize, end: usize },
    /// Exchange the tails following `pos1` and `pos2` of two routes.
    TwoOptStar {
        route1: usize,
        pos1: usize,
        route2: usize,
        pos2: usize,
    },
}

/// A move together with its change of the guided objective.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub delta: f64,
    pub mv: Move,
}

/// Tracks the best move seen during one neighborhood scan.
#[derive(Debug, Default)]
pub struct MoveScan {
    pub best: Option<Candidate>,
    /// Number of feasible moves evaluated
    pub evaluated: usize,
}

impl MoveScan {
    /// Record a feasible move, keeping it if it beats the current best.
    pub fn consider(&mut self, delta: f64, mv: Move) {
        self.evaluated += 1;
        if self.best.map_or(true, |best| delta < best.delta) {
            self.best = Some(Candidate { delta, mv });
        }
    }

    /// The best move if it improves the objective.
    pub fn improving(&self) -> Option<Candidate> {
        self.best.filter(|candidate| candidate.delta < -EPSILON)
    }
}

/// Manages the guided local search phase.
pub struct LocalSearch {
    pub granularity: usize,
    pub penalty_factor: f64,
    pub max_iterations_without_improvement: u32,
    /// Weight of the penalty term, fixed at the first local optimum
    lambda: Option<f64>,
    penalties: EdgePenalties,
    /// Preprocessed neighbors for each customer
    customer_neighbors: Vec<Vec<usize>>,
    /// (route, position) of each assigned customer
    positions: Vec<Option<(usize, usize)>>,
    rng: ChaCha8Rng,
    /// Number of scans performed
    pub iterations: u64,
    /// Number of local optima penalized
    pub local_optima: u64,
}

impl LocalSearch {
    /// Create a new local search instance for `problem`.
    pub fn new(problem: &RoutingProblem, config: &Config) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        LocalSearch {
            granularity: config.granularity,
            penalty_factor: config.penalty_factor,
            max_iterations_without_improvement: config.max_iterations_without_improvement,
            lambda: None,
            penalties: EdgePenalties::new(),
            customer_neighbors: utils::neighbor_lists(problem, config.granularity),
            positions: vec![None; problem.num_nodes()],
            rng,
            iterations: 0,
            local_optima: 0,
        }
    }

    /// Current weight of the penalty term (zero before the first local optimum).
    pub fn lambda(&self) -> f64 {
        self.lambda.unwrap_or(0.0)
    }

    pub fn penalties(&self) -> &EdgePenalties {
        &self.penalties
    }

    /// Cost of traversing edge (a, b) under the guided objective.
    #[inline]
    pub fn arc(&self, problem: &RoutingProblem, a: usize, b: usize) -> f64 {
        let distance = problem.distance(a, b) as f64;
        match self.lambda {
            Some(lambda) => distance + lambda * f64::from(self.penalties.get(a, b)),
            None => distance,
        }
    }

    /// Guided objective of a whole assignment.
    pub fn augmented_cost(&self, assignment: &Assignment, problem: &RoutingProblem) -> f64 {
        assignment
            .routes
            .iter()
            .filter(|route| !route.is_empty())
            .flat_map(|route| route.node_sequence().into_iter().tuple_windows())
            .map(|(a, b)| self.arc(problem, a, b))
            .sum()
    }

    /// Run the guided local search from `initial` until the deadline or
    /// convergence, returning the best assignment seen.
    pub fn improve(
        &mut self,
        initial: Assignment,
        problem: &RoutingProblem,
        ctx: &mut SolveContext,
    ) -> Assignment {
        let mut current = initial;
        let mut best = current.clone();
        let mut without_improvement = 0u32;
        self.index(&current);

        loop {
            if ctx.expired() {
                debug!("Time limit reached after {} iterations", self.iterations);
                break;
            }
            self.iterations += 1;

            let scan = self.scan(&current, problem);
            if let Some(candidate) = scan.improving() {
                trace!("Applying {:?} (delta {:.3})", candidate.mv, candidate.delta);
                self.apply(&mut current, problem, candidate.mv);
                if self.record(&current, &mut best, ctx) {
                    without_improvement = 0;
                }
                continue;
            }

            if self.insert_unassigned(&mut current, problem) {
                if self.record(&current, &mut best, ctx) {
                    without_improvement = 0;
                }
                continue;
            }

            if scan.evaluated == 0 {
                debug!("No feasible move left, stopping after {} iterations", self.iterations);
                break;
            }

            self.local_optima += 1;
            ctx.local_optimum(self.local_optima, current.distance);
            self.penalize(&current, problem);

            without_improvement += 1;
            if without_improvement >= self.max_iterations_without_improvement {
                debug!(
                    "Converged after {} local optima without improvement",
                    without_improvement
                );
                break;
            }
        }

        best
    }

    /// Evaluate every neighborhood and return the best feasible move.
    pub fn scan(&mut self, assignment: &Assignment, problem: &RoutingProblem) -> MoveScan {
        let mut order: Vec<usize> = assignment
            .routes
            .iter()
            .flat_map(|route| route.customers.iter().copied())
            .collect();
        order.shuffle(&mut self.rng);

        let mut scan = MoveScan::default();
        for &customer in &order {
            self.evaluate_relocate(assignment, problem, customer, &mut scan);
            self.evaluate_swap(assignment, problem, customer, &mut scan);
            self.evaluate_two_opt(assignment, problem, customer, &mut scan);
            self.evaluate_two_opt_star(assignment, problem, customer, &mut scan);
        }
        scan
    }

    /// Apply a move and refresh the metrics of the routes it touched.
    pub fn apply(&mut self, assignment: &mut Assignment, problem: &RoutingProblem, mv: Move) {
        let touched = match mv {
            Move::Relocate {
                from_route,
                from_pos,
                to_route,
                to_pos,
            } => {
                self.apply_relocate(assignment, from_route, from_pos, to_route, to_pos);
                [from_route, to_route]
            }
            Move::Swap {
                route1,
                pos1,
                route2,
                pos2,
            } => {
                self.apply_swap(assignment, route1, pos1, route2, pos2);
                [route1, route2]
            }
            Move::TwoOpt { route, start, end } => {
                self.apply_two_opt(assignment, route, start, end);
                [route, route]
            }
            Move::TwoOptStar {
                route1,
                pos1,
                route2,
                pos2,
            } => {
                self.apply_two_opt_star(assignment, route1, pos1, route2, pos2);
                [route1, route2]
            }
        };

        for route_idx in touched.into_iter().unique() {
            assignment.routes[route_idx].update(problem);
            self.reindex_route(assignment, route_idx);
        }
        assignment.refresh_distance();
    }

    /// Rebuild the customer position index for `assignment`.
    pub fn index(&mut self, assignment: &Assignment) {
        self.positions = utils::index_positions(assignment, self.positions.len());
    }

    /// Position of an assigned customer.
    #[inline]
    pub(crate) fn position(&self, customer: usize) -> Option<(usize, usize)> {
        self.positions[customer]
    }

    pub(crate) fn neighbors(&self, customer: usize) -> &[usize] {
        &self.customer_neighbors[customer]
    }

    fn reindex_route(&mut self, assignment: &Assignment, route_idx: usize) {
        for (pos, &customer) in assignment.routes[route_idx].customers.iter().enumerate() {
            self.positions[customer] = Some((route_idx, pos));
        }
    }

    /// Insert unassigned customers wherever a feasible position opened up.
    fn insert_unassigned(&mut self, assignment: &mut Assignment, problem: &RoutingProblem) -> bool {
        let mut inserted = false;

        for node in assignment.unassigned.clone() {
            let choice = assignment
                .routes
                .iter()
                .enumerate()
                .filter_map(|(route_idx, route)| {
                    best_insertion(problem, route, node).map(|(cost, pos)| (cost, route_idx, pos))
                })
                .min();

            if let Some((cost, route_idx, pos)) = choice {
                debug!(
                    "Inserting previously unassigned node {} into vehicle {} (+{}m)",
                    node, assignment.routes[route_idx].vehicle, cost
                );
                insert(assignment, problem, route_idx, pos, node);
                self.reindex_route(assignment, route_idx);
                inserted = true;
            }
        }

        inserted
    }

    /// Penalize the maximum-utility edges of a local optimum.
    fn penalize(&mut self, assignment: &Assignment, problem: &RoutingProblem) {
        let edges: Vec<(usize, usize)> = assignment
            .routes
            .iter()
            .filter(|route| !route.is_empty())
            .flat_map(|route| route.node_sequence().into_iter().tuple_windows())
            .collect();

        if edges.is_empty() {
            return;
        }

        if self.lambda.is_none() {
            let lambda = self.penalty_factor * assignment.distance as f64 / edges.len() as f64;
            debug!("Guided objective weight set to {:.3}", lambda);
            self.lambda = Some(lambda);
        }

        let utility = |(a, b): (usize, usize)| {
            problem.distance(a, b) as f64 / (1.0 + f64::from(self.penalties.get(a, b)))
        };
        let max_utility = edges.iter().copied().map(utility).fold(f64::MIN, f64::max);

        let selected: Vec<(usize, usize)> = edges
            .iter()
            .copied()
            .filter(|&edge| utility(edge) >= max_utility - EPSILON)
            .map(|(a, b)| (a.min(b), a.max(b)))
            .unique()
            .collect();

        for (a, b) in selected {
            self.penalties.increment(a, b);
        }
    }

    /// Promote `current` to incumbent if it beats `best`.
    fn record(&self, current: &Assignment, best: &mut Assignment, ctx: &mut SolveContext) -> bool {
        if !current.is_better_than(best) {
            return false;
        }

        *best = current.clone();
        debug!(
            "New best at iteration {}: {}m, {} unassigned",
            self.iterations,
            best.distance,
            best.unassigned.len()
        );
        ctx.new_best(self.iterations, best.distance, best.unassigned.len());
        true
    }
}
