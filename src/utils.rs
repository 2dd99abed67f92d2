//! Reporting helpers for solutions and search runs.

use std::io::{self, Write};
use std::time::Duration;

use crate::problem::RoutingProblem;
use crate::solution::Solution;

/// Format a duration as hours, minutes, and seconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    let millis = duration.subsec_millis();

    format!("{}h {:02}m {:02}.{:03}s", hours, minutes, seconds, millis)
}

/// Write a human-readable listing of a solution, labelling nodes with `labels`
/// when given (falls back to node indices).
pub fn write_solution<W: Write>(
    writer: &mut W,
    solution: &Solution,
    problem: &RoutingProblem,
    labels: Option<&[String]>,
) -> io::Result<()> {
    let label = |node: usize| -> String {
        labels
            .and_then(|labels| labels.get(node).cloned())
            .unwrap_or_else(|| node.to_string())
    };

    writeln!(writer, "Success: {}", solution.success)?;
    writeln!(writer, "Message: {}", solution.message)?;
    writeln!(writer, "Total Distance: {}m", solution.total_distance)?;
    writeln!(writer, "Number of Routes: {}", solution.routes.len())?;
    writeln!(writer)?;

    for route in &solution.routes {
        write!(writer, "Vehicle #{}: ", route.vehicle_id)?;

        if route.node_sequence.len() <= 2 {
            writeln!(writer, "Idle")?;
            continue;
        }

        let stops: Vec<String> = route.node_sequence.iter().map(|&node| label(node)).collect();
        writeln!(writer, "{}", stops.join(" -> "))?;
        writeln!(writer, "  Distance: {}m", route.distance)?;

        let capacity = problem.capacity();
        if capacity.is_capacitated() {
            let load: u64 = route.node_sequence.iter().map(|&node| capacity.demand(node)).sum();
            writeln!(
                writer,
                "  Load: {} / {}",
                load,
                capacity.capacity(route.vehicle_id)
            )?;
        }
    }

    if !solution.unvisited_nodes.is_empty() {
        let unvisited: Vec<String> = solution.unvisited_nodes.iter().map(|&node| label(node)).collect();
        writeln!(writer)?;
        writeln!(writer, "Unvisited: {}", unvisited.join(", "))?;
    }

    Ok(())
}

/// Statistics about one solve.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStatistics {
    pub iterations: u64,
    pub local_optima: u64,
    pub runtime: Duration,
    pub construction_distance: i64,
    pub best_distance: i64,
    pub unassigned: usize,
    pub penalized_edges: usize,
}

impl SearchStatistics {
    /// Relative improvement of the best distance over the construction baseline.
    pub fn improvement_ratio(&self) -> f64 {
        if self.construction_distance == 0 {
            0.0
        } else {
            (self.construction_distance - self.best_distance) as f64 / self.construction_distance as f64
        }
    }

    /// Format the statistics as a string.
    pub fn format(&self) -> String {
        format!(
            "Search Statistics:
- Iterations: {}
- Local Optima: {}
- Runtime: {}
- Construction Distance: {}m
- Best Distance: {}m ({:.2}% better)
- Unassigned: {}
- Penalized Edges: {}",
            self.iterations,
            self.local_optima,
            format_duration(self.runtime),
            self.construction_distance,
            self.best_distance,
            100.0 * self.improvement_ratio(),
            self.unassigned,
            self.penalized_edges
        )
    }
}
