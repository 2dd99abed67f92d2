//! 2-Opt* neighborhood for local search (inter-route).

use crate::problem::{RoutingProblem, DEPOT};
use crate::solution::Assignment;

use super::{LocalSearch, Move, MoveScan};

impl LocalSearch {
    /// Evaluate exchanging the tails that follow `customer` and a neighbor on
    /// another route, so that each is followed by the other's old successor.
    pub fn evaluate_two_opt_star(
        &self,
        assignment: &Assignment,
        problem: &RoutingProblem,
        customer: usize,
        scan: &mut MoveScan,
    ) {
        let Some((r1_idx, i)) = self.position(customer) else {
            return;
        };
        let r1 = &assignment.routes[r1_idx];
        let capacity = problem.capacity();
        let next1 = r1.successor(i);

        for &neighbor in self.neighbors(customer) {
            let Some((r2_idx, j)) = self.position(neighbor) else {
                continue;
            };
            if r2_idx == r1_idx {
                continue;
            }
            let r2 = &assignment.routes[r2_idx];
            let next2 = r2.successor(j);

            if next1 == DEPOT && next2 == DEPOT {
                continue;
            }

            let r1_new_load = r1.load_through(i) + r2.load_after(j);
            let r2_new_load = r2.load_through(j) + r1.load_after(i);
            if !capacity.admits(r1.vehicle, r1_new_load) || !capacity.admits(r2.vehicle, r2_new_load) {
                continue;
            }

            let delta = self.arc(problem, customer, next2) + self.arc(problem, neighbor, next1)
                - self.arc(problem, customer, next1)
                - self.arc(problem, neighbor, next2);

            scan.consider(
                delta,
                Move::TwoOptStar {
                    route1: r1_idx,
                    pos1: i,
                    route2: r2_idx,
                    pos2: j,
                },
            );
        }
    }

    /// Apply a 2-Opt* move.
    pub(crate) fn apply_two_opt_star(
        &mut self,
        assignment: &mut Assignment,
        r1_idx: usize,
        i: usize,
        r2_idx: usize,
        j: usize,
    ) {
        let r1_tail: Vec<usize> = assignment.routes[r1_idx].customers.drain(i + 1..).collect();
        let r2_tail: Vec<usize> = assignment.routes[r2_idx].customers.drain(j + 1..).collect();

        assignment.routes[r1_idx].customers.extend(r2_tail);
        assignment.routes[r2_idx].customers.extend(r1_tail);
    }
}
