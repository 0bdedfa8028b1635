//! Explicit damped transition operator.
//!
//! The iteration never forms this matrix; it is provided for inspection
//! and for checking the iteration against a plain matrix-vector product.

use crate::config::PowerIterationConfig;
use stochrank_core::{
    matrix::TransitionMatrix,
    types::{DMatrix, Scalar},
};

/// Builds `G[j][i] = alpha · A[j][i] + e`, `e` being the configured escape mass.
///
/// For a probability vector `π` (entries summing to one), one round of the
/// approximator maps `π` to `Gᵀπ`. Every row of `G` sums to `alpha + n · e`,
/// which is one for the default parameters and `alpha + (1 - alpha) · 0.1`
/// with [`EscapeTerm::DampingScaled`].
///
/// [`EscapeTerm::DampingScaled`]: crate::config::EscapeTerm::DampingScaled
pub fn damped_operator<T: Scalar>(
    matrix: &TransitionMatrix<T>,
    config: &PowerIterationConfig<T>,
) -> DMatrix<T> {
    let escape = config.escape_mass(matrix.dimension());
    let damping = config.damping;
    matrix.as_matrix().map(|a| damping * a + escape)
}
