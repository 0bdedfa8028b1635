//! Row-stochastic transition matrices.
//!
//! A [`TransitionMatrix`] is an `n × n` matrix with non-negative entries
//! whose rows each sum to one. Once constructed it is immutable: every
//! constructor validates the data, so downstream consumers can rely on the
//! invariant without re-checking it.

use crate::{
    error::{Result, StochasticError},
    types::{DMatrix, DVector, Scalar},
};
use num_traits::Float;
use std::fmt;
use std::str::FromStr;

/// An immutable, validated row-stochastic matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix<T: Scalar> {
    matrix: DMatrix<T>,
}

impl<T: Scalar> TransitionMatrix<T> {
    /// Wraps a matrix after checking that it is square, non-empty and
    /// row-stochastic within [`Scalar::STOCHASTIC_TOLERANCE`].
    ///
    /// For very long rows the tolerance is widened to `n · EPSILON` to
    /// absorb summation rounding.
    pub fn from_matrix(matrix: DMatrix<T>) -> Result<Self> {
        Self::from_matrix_with_tolerance(matrix, T::STOCHASTIC_TOLERANCE)
    }

    /// Same as [`from_matrix`](Self::from_matrix) with an explicit row-sum tolerance.
    pub fn from_matrix_with_tolerance(matrix: DMatrix<T>, tolerance: T) -> Result<Self> {
        if matrix.nrows() == 0 || matrix.ncols() == 0 {
            return Err(StochasticError::invalid_input(
                "transition matrix must have at least one node",
            ));
        }
        if matrix.nrows() != matrix.ncols() {
            return Err(StochasticError::dimension_mismatch(
                "square matrix",
                format!("{}x{}", matrix.nrows(), matrix.ncols()),
            ));
        }
        validate_rows(&matrix, tolerance)?;
        Ok(Self { matrix })
    }

    /// Builds a matrix from row vectors.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self> {
        let n = rows.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(StochasticError::dimension_mismatch(
                format!("{n} entries in row {i}"),
                row.len(),
            ));
        }
        let matrix = DMatrix::from_row_iterator(n, n, rows.iter().flatten().copied());
        Self::from_matrix(matrix)
    }

    /// Parses whitespace-separated entries in row-major order.
    ///
    /// Line breaks carry no meaning; the number of entries must be a
    /// perfect square `n²`.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with_tolerance(text, T::STOCHASTIC_TOLERANCE)
    }

    /// Same as [`parse`](Self::parse) with an explicit row-sum tolerance.
    pub fn parse_with_tolerance(text: &str, tolerance: T) -> Result<Self> {
        let values = text
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<f64>()
                    .map(<T as Scalar>::from_f64)
                    .map_err(|e| StochasticError::parse(token, e))
            })
            .collect::<Result<Vec<T>>>()?;

        if values.is_empty() {
            return Err(StochasticError::invalid_input("matrix text contains no entries"));
        }

        let n = (values.len() as f64).sqrt().round() as usize;
        if n * n != values.len() {
            return Err(StochasticError::dimension_mismatch(
                "a perfect square number of entries",
                values.len(),
            ));
        }

        let matrix = DMatrix::from_row_iterator(n, n, values);
        Self::from_matrix_with_tolerance(matrix, tolerance)
    }

    /// Wraps a matrix the generator built; rows are stochastic by construction.
    pub(crate) fn from_generated(matrix: DMatrix<T>) -> Self {
        debug_assert!(validate_rows(&matrix, T::STOCHASTIC_TOLERANCE).is_ok());
        Self { matrix }
    }

    /// Number of nodes (rows and columns).
    pub fn dimension(&self) -> usize {
        self.matrix.nrows()
    }

    /// Borrows the underlying matrix.
    pub fn as_matrix(&self) -> &DMatrix<T> {
        &self.matrix
    }

    /// Consumes the wrapper and returns the underlying matrix.
    pub fn into_inner(self) -> DMatrix<T> {
        self.matrix
    }

    /// Transition probability from `row` to `col`.
    pub fn get(&self, row: usize, col: usize) -> T {
        self.matrix[(row, col)]
    }

    /// Sum of every row.
    pub fn row_sums(&self) -> DVector<T> {
        DVector::from_iterator(self.dimension(), self.matrix.row_iter().map(|row| row.sum()))
    }

    /// Number of non-zero entries in `row`.
    pub fn nonzero_count(&self, row: usize) -> usize {
        self.matrix.row(row).iter().filter(|&&x| x != T::zero()).count()
    }

    /// Rows as plain vectors, for serialization and printing.
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.matrix
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect()
    }
}

/// Row-sum tolerance actually applied to rows of length `n`.
///
/// Summing `n` entries loses up to `n · EPSILON / 2`, so the requested
/// tolerance is raised to `n · EPSILON` when that is larger.
pub(crate) fn row_sum_tolerance<T: Scalar>(tolerance: T, n: usize) -> T {
    let rounding = <T as Scalar>::from_usize(n) * T::EPSILON;
    Float::max(tolerance, rounding)
}

fn validate_rows<T: Scalar>(matrix: &DMatrix<T>, tolerance: T) -> Result<()> {
    let tolerance = row_sum_tolerance(tolerance, matrix.ncols());
    for (i, row) in matrix.row_iter().enumerate() {
        let mut sum = T::zero();
        for (j, &value) in row.iter().enumerate() {
            if !Float::is_finite(value) {
                return Err(StochasticError::not_stochastic(
                    i,
                    format!("entry in column {j} is not finite"),
                ));
            }
            if value < T::zero() {
                return Err(StochasticError::not_stochastic(
                    i,
                    format!("entry in column {j} is negative ({value})"),
                ));
            }
            sum += value;
        }
        if Float::abs(sum - T::one()) > tolerance {
            return Err(StochasticError::not_stochastic(
                i,
                format!("row sums to {sum}, expected 1"),
            ));
        }
    }
    Ok(())
}

impl<T: Scalar> FromStr for TransitionMatrix<T> {
    type Err = StochasticError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Tab-separated rows, one per line.
impl<T: Scalar> fmt::Display for TransitionMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.matrix.row_iter() {
            let mut first = true;
            for value in row.iter() {
                if !first {
                    f.write_str("\t")?;
                }
                write!(f, "{value}")?;
                first = false;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
