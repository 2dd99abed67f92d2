//! 2-Opt neighborhood for local search (intra-route).

use crate::problem::RoutingProblem;
use crate::solution::Assignment;

use super::{LocalSearch, Move, MoveScan};

impl LocalSearch {
    /// Evaluate reversing the segment that makes `customer` adjacent to a
    /// neighbor on the same route.
    pub fn evaluate_two_opt(
        &self,
        assignment: &Assignment,
        problem: &RoutingProblem,
        customer: usize,
        scan: &mut MoveScan,
    ) {
        let Some((r_idx, u_pos)) = self.position(customer) else {
            return;
        };
        let route = &assignment.routes[r_idx];

        for &neighbor in self.neighbors(customer) {
            let Some((n_route, v_pos)) = self.position(neighbor) else {
                continue;
            };
            if n_route != r_idx {
                continue;
            }

            if u_pos < v_pos {
                // ... u | s_u ... v | s_v ...  ->  ... u v ... s_u s_v ...
                if v_pos == u_pos + 1 {
                    continue;
                }
                let s_u = route.customers[u_pos + 1];
                let s_v = route.successor(v_pos);
                let delta = self.arc(problem, customer, neighbor) + self.arc(problem, s_u, s_v)
                    - self.arc(problem, customer, s_u)
                    - self.arc(problem, neighbor, s_v);

                scan.consider(
                    delta,
                    Move::TwoOpt {
                        route: r_idx,
                        start: u_pos + 1,
                        end: v_pos,
                    },
                );
            } else {
                // ... p_v | v ... p_u | u ...  ->  ... p_v p_u ... v u ...
                if u_pos == v_pos + 1 {
                    continue;
                }
                let p_v = route.predecessor(v_pos);
                let p_u = route.customers[u_pos - 1];
                let delta = self.arc(problem, p_v, p_u) + self.arc(problem, neighbor, customer)
                    - self.arc(problem, p_v, neighbor)
                    - self.arc(problem, p_u, customer);

                scan.consider(
                    delta,
                    Move::TwoOpt {
                        route: r_idx,
                        start: v_pos,
                        end: u_pos - 1,
                    },
                );
            }
        }
    }

    /// Apply a 2-Opt move.
    pub(crate) fn apply_two_opt(&mut self, assignment: &mut Assignment, r_idx: usize, start: usize, end: usize) {
        assignment.routes[r_idx].customers[start..=end].reverse();
    }
}
