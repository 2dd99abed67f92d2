//! Dense integer distance matrix built from geographic coordinates.

use crate::error::ValidationError;
use crate::problem::{validate_locations, Location};
use itertools::Itertools;
use log::debug;
use rayon::prelude::*;

/// Number of locations above which rows are computed on the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// A symmetric N×N matrix of distances in whole meters, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMatrix {
    data: Vec<i64>,
    size: usize,
}

impl DistanceMatrix {
    /// Build the great-circle matrix for `locations` (depot first).
    pub fn from_locations(locations: &[Location]) -> Result<Self, ValidationError> {
        Self::build(locations, DEFAULT_PARALLEL_THRESHOLD)
    }

    /// Build the great-circle matrix, switching to parallel row computation
    /// once `locations.len()` reaches `parallel_threshold`.
    ///
    /// Every coordinate is validated before any distance is computed.
    pub fn build(locations: &[Location], parallel_threshold: usize) -> Result<Self, ValidationError> {
        validate_locations(locations)?;

        let n = locations.len();
        let upper_row = |i: usize| -> Vec<i64> {
            ((i + 1)..n)
                .map(|j| locations[i].distance_to(&locations[j]).round() as i64)
                .collect()
        };

        let upper: Vec<Vec<i64>> = if n >= parallel_threshold {
            (0..n).into_par_iter().map(upper_row).collect()
        } else {
            (0..n).map(upper_row).collect()
        };

        let mut data = vec![0; n * n];
        for (i, row) in upper.into_iter().enumerate() {
            for (offset, d) in row.into_iter().enumerate() {
                let j = i + 1 + offset;
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }

        debug!("Calculated distance matrix for {} locations", n);
        Ok(DistanceMatrix { data, size: n })
    }

    /// Wrap an explicit matrix, checking that it is square, symmetric,
    /// non-negative and has a zero diagonal.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self, ValidationError> {
        let n = rows.len();
        if n < 2 {
            return Err(ValidationError::TooFewLocations(n));
        }

        for (row, values) in rows.iter().enumerate() {
            if values.len() != n {
                return Err(ValidationError::MatrixNotSquare {
                    row,
                    expected: n,
                    got: values.len(),
                });
            }
        }

        for (i, j) in (0..n).cartesian_product(0..n) {
            let reason = if rows[i][j] < 0 {
                Some("negative distance")
            } else if i == j && rows[i][j] != 0 {
                Some("non-zero diagonal")
            } else if rows[i][j] != rows[j][i] {
                Some("asymmetric distance")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(ValidationError::InvalidMatrixEntry { from: i, to: j, reason });
            }
        }

        Ok(DistanceMatrix {
            data: rows.into_iter().flatten().collect(),
            size: n,
        })
    }

    /// Distance in meters from `from` to `to`.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> i64 {
        self.data[from * self.size + to]
    }

    /// Number of locations covered by the matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Sum of consecutive lookups along `path`.
    pub fn path_length(&self, path: &[usize]) -> i64 {
        path.iter()
            .tuple_windows()
            .map(|(&from, &to)| self.get(from, to))
            .sum()
    }

    /// The `count` nearest customers to `node`, excluding the depot and the node itself.
    /// Ties are ordered by node index.
    pub fn nearest_customers(&self, node: usize, depot: usize, count: usize) -> Vec<usize> {
        (0..self.size)
            .filter(|&other| other != node && other != depot)
            .sorted_by_key(|&other| (self.get(node, other), other))
            .take(count)
            .collect()
    }
}
