//! Configuration parameters for the guided local search.

use crate::distance::DEFAULT_PARALLEL_THRESHOLD;
use serde::{Deserialize, Serialize};

/// Configuration settings for the solver.
///
/// The time budget belongs to the problem itself; these knobs only shape how
/// the search spends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of nearest customers considered as move partners for each customer
    pub granularity: usize,
    /// Coefficient scaling the edge penalties in the guided objective
    pub penalty_factor: f64,
    /// Maximum number of local optima visited without a new incumbent
    pub max_iterations_without_improvement: u32,
    /// Seed for the scan order of the neighborhoods (entropy when absent)
    pub seed: Option<u64>,
    /// Location count from which the distance matrix is built in parallel
    pub parallel_matrix_threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            granularity: 20,
            penalty_factor: 0.1,
            max_iterations_without_improvement: 2000,
            seed: None,
            parallel_matrix_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Set the granularity parameter.
    pub fn with_granularity(mut self, g: usize) -> Self {
        self.granularity = g;
        self
    }

    /// Set the penalty coefficient of the guided objective.
    pub fn with_penalty_factor(mut self, factor: f64) -> Self {
        self.penalty_factor = factor;
        self
    }

    /// Set the maximum local optima without improvement.
    pub fn with_max_iterations_without_improvement(mut self, iterations: u32) -> Self {
        self.max_iterations_without_improvement = iterations;
        self
    }

    /// Fix the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the parallel matrix threshold.
    pub fn with_parallel_matrix_threshold(mut self, threshold: usize) -> Self {
        self.parallel_matrix_threshold = threshold;
        self
    }
}
