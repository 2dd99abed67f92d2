//! Edge penalty memory for the guided objective.

use petgraph::graphmap::UnGraphMap;

/// How often each undirected edge has been penalized at a local optimum.
#[derive(Debug, Clone, Default)]
pub struct EdgePenalties {
    graph: UnGraphMap<usize, u32>,
}

impl EdgePenalties {
    pub fn new() -> Self {
        EdgePenalties {
            graph: UnGraphMap::new(),
        }
    }

    /// Penalty count of edge (a, b); zero for edges never penalized.
    #[inline]
    pub fn get(&self, a: usize, b: usize) -> u32 {
        self.graph.edge_weight(a, b).copied().unwrap_or(0)
    }

    /// Add one penalty to edge (a, b).
    pub fn increment(&mut self, a: usize, b: usize) {
        match self.graph.edge_weight_mut(a, b) {
            Some(weight) => *weight += 1,
            None => {
                self.graph.add_edge(a, b, 1);
            }
        }
    }

    /// Number of distinct edges carrying a penalty.
    pub fn penalized_edges(&self) -> usize {
        self.graph.edge_count()
    }

    /// Sum of all penalty counts.
    pub fn total(&self) -> u64 {
        self.graph.all_edges().map(|(_, _, &w)| u64::from(w)).sum()
    }
}
