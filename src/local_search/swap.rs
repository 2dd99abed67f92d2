//! Swap neighborhood for local search.

use crate::problem::RoutingProblem;
use crate::solution::{Assignment, Route};

use super::{LocalSearch, Move, MoveScan};

impl LocalSearch {
    /// Evaluate exchanging `customer` with each neighbor served by another vehicle.
    pub fn evaluate_swap(
        &self,
        assignment: &Assignment,
        problem: &RoutingProblem,
        customer: usize,
        scan: &mut MoveScan,
    ) {
        let Some((r1_idx, c1_pos)) = self.position(customer) else {
            return;
        };
        let r1 = &assignment.routes[r1_idx];
        let capacity = problem.capacity();
        let demand1 = capacity.demand(customer);

        for &neighbor in self.neighbors(customer) {
            let Some((r2_idx, c2_pos)) = self.position(neighbor) else {
                continue;
            };
            if r2_idx == r1_idx {
                continue;
            }
            let r2 = &assignment.routes[r2_idx];
            let demand2 = capacity.demand(neighbor);

            if !capacity.admits(r1.vehicle, r1.load - demand1 + demand2)
                || !capacity.admits(r2.vehicle, r2.load - demand2 + demand1)
            {
                continue;
            }

            let delta = self.replacement_delta(problem, r1, c1_pos, neighbor)
                + self.replacement_delta(problem, r2, c2_pos, customer);

            scan.consider(
                delta,
                Move::Swap {
                    route1: r1_idx,
                    pos1: c1_pos,
                    route2: r2_idx,
                    pos2: c2_pos,
                },
            );
        }
    }

    /// Calculate the cost change when the customer at `pos` is replaced by `new_customer`.
    fn replacement_delta(
        &self,
        problem: &RoutingProblem,
        route: &Route,
        pos: usize,
        new_customer: usize,
    ) -> f64 {
        let prev = route.predecessor(pos);
        let curr = route.customers[pos];
        let next = route.successor(pos);

        let old_cost = self.arc(problem, prev, curr) + self.arc(problem, curr, next);
        let new_cost = self.arc(problem, prev, new_customer) + self.arc(problem, new_customer, next);

        new_cost - old_cost
    }

    /// Apply a Swap move.
    pub(crate) fn apply_swap(
        &mut self,
        assignment: &mut Assignment,
        r1_idx: usize,
        c1_pos: usize,
        r2_idx: usize,
        c2_pos: usize,
    ) {
        let temp = assignment.routes[r1_idx].customers[c1_pos];
        assignment.routes[r1_idx].customers[c1_pos] = assignment.routes[r2_idx].customers[c2_pos];
        assignment.routes[r2_idx].customers[c2_pos] = temp;
    }
}
