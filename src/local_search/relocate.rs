//! Relocate neighborhood for local search.

use crate::problem::{RoutingProblem, DEPOT};
use crate::solution::Assignment;

use super::{LocalSearch, Move, MoveScan};

impl LocalSearch {
    /// Evaluate moving `customer` next to each of its neighbors (before or
    /// after, on any route) or into an idle vehicle.
    pub fn evaluate_relocate(
        &self,
        assignment: &Assignment,
        problem: &RoutingProblem,
        customer: usize,
        scan: &mut MoveScan,
    ) {
        let Some((r1_idx, c_pos)) = self.position(customer) else {
            return;
        };
        let r1 = &assignment.routes[r1_idx];
        let demand = problem.capacity().demand(customer);

        // Change of the objective when `customer` leaves r1
        let prev = r1.predecessor(c_pos);
        let next = r1.successor(c_pos);
        let removal = self.arc(problem, prev, next)
            - self.arc(problem, prev, customer)
            - self.arc(problem, customer, next);

        for &neighbor in self.neighbors(customer) {
            let Some((r2_idx, n_pos)) = self.position(neighbor) else {
                continue;
            };
            let r2 = &assignment.routes[r2_idx];

            if r2_idx != r1_idx && !problem.capacity().admits(r2.vehicle, r2.load + demand) {
                continue;
            }

            // Insert before the neighbor, then after it
            let slots = [
                (r2.predecessor(n_pos), neighbor, n_pos),
                (neighbor, r2.successor(n_pos), n_pos + 1),
            ];
            for (x, y, to_pos) in slots {
                if x == customer || y == customer {
                    // Reinserting between the old neighbors is a no-op
                    continue;
                }
                let insertion = self.arc(problem, x, customer) + self.arc(problem, customer, y)
                    - self.arc(problem, x, y);

                scan.consider(
                    removal + insertion,
                    Move::Relocate {
                        from_route: r1_idx,
                        from_pos: c_pos,
                        to_route: r2_idx,
                        to_pos,
                    },
                );
            }
        }

        for (r2_idx, r2) in assignment.routes.iter().enumerate() {
            if r2_idx == r1_idx || !r2.is_empty() || !problem.capacity().admits(r2.vehicle, demand) {
                continue;
            }
            let insertion = self.arc(problem, DEPOT, customer) + self.arc(problem, customer, DEPOT)
                - self.arc(problem, DEPOT, DEPOT);

            scan.consider(
                removal + insertion,
                Move::Relocate {
                    from_route: r1_idx,
                    from_pos: c_pos,
                    to_route: r2_idx,
                    to_pos: 0,
                },
            );
        }
    }

    /// Apply a Relocate move.
    pub(crate) fn apply_relocate(
        &mut self,
        assignment: &mut Assignment,
        r1_idx: usize,
        c_pos: usize,
        r2_idx: usize,
        insert_pos: usize,
    ) {
        let customer = assignment.routes[r1_idx].customers.remove(c_pos);

        // Within one route the target shifts left once the customer is gone
        let insert_pos = if r1_idx == r2_idx && insert_pos > c_pos {
            insert_pos - 1
        } else {
            insert_pos
        };

        assignment.routes[r2_idx].customers.insert(insert_pos, customer);
    }
}
