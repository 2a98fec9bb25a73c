//! Input matrix validation
//!
//! The tree builder assumes an undirected simple graph: zero diagonal,
//! symmetric weights and no negative capacities. These checks run before
//! construction unless disabled in the configuration.

use crate::algorithm::traits::AlgorithmError;
use crate::data_structures::graph::Capacity;
use crate::data_structures::matrix::CapacityMatrix;

/// Upper bound on the summed weight of all edges.
///
/// Merged capacities and flow values never exceed the total, and a residual
/// record can hold up to twice its edge's capacity, so half the range keeps
/// every intermediate value representable.
pub const MAX_TOTAL_CAPACITY: Capacity = Capacity::MAX / 2;

/// Checks that `matrix` describes an undirected graph without self-loops or
/// negative weights, and that its total capacity stays within
/// [`MAX_TOTAL_CAPACITY`].
///
/// Rows are scanned in order; for row `j` the diagonal is checked first,
/// then symmetry and sign of every entry `(i, j)` with `i < j`. The first
/// violation found is returned.
pub fn validate_matrix(matrix: &CapacityMatrix) -> Result<(), AlgorithmError> {
    let n = matrix.size();
    for j in 0..n {
        let diagonal = entry(matrix, j, j);
        if diagonal != 0 {
            return Err(AlgorithmError::NonZeroDiagonal {
                node: j,
                weight: diagonal,
            });
        }
        for i in 0..j {
            let weight = entry(matrix, i, j);
            if weight != entry(matrix, j, i) {
                return Err(AlgorithmError::Asymmetric { i, j });
            }
            if weight < 0 {
                return Err(AlgorithmError::NegativeCapacity { i, j, weight });
            }
        }
    }
    check_total_capacity(matrix)
}

/// Checks only the [`MAX_TOTAL_CAPACITY`] bound over the upper triangle.
///
/// The builder runs this even when full validation is disabled.
pub fn check_total_capacity(matrix: &CapacityMatrix) -> Result<(), AlgorithmError> {
    let mut total: Capacity = 0;
    for (i, j, weight) in matrix.non_zero_pairs() {
        total = total
            .checked_add(weight.saturating_abs())
            .filter(|&sum| sum <= MAX_TOTAL_CAPACITY)
            .ok_or(AlgorithmError::CapacityOverflow {
                i,
                j,
                limit: MAX_TOTAL_CAPACITY,
            })?;
    }
    Ok(())
}

/// Convenience wrapper over [`validate_matrix`]
pub fn is_valid(matrix: &CapacityMatrix) -> bool {
    validate_matrix(matrix).is_ok()
}

#[inline]
fn entry(matrix: &CapacityMatrix, i: usize, j: usize) -> Capacity {
    matrix.get(i, j).unwrap_or(0)
}
