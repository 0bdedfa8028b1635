//! Error types for stochastic matrix construction and power iteration.
//!
//! Every failure is a validation failure: it is raised before any
//! computation starts and aborts the whole run. There are no retries and
//! no partial results.

use thiserror::Error;

/// Errors that can occur while building or consuming transition matrices.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StochasticError {
    /// Input is not usable at all.
    ///
    /// Raised for a non-positive node count or empty matrix data.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of why the input is invalid
        reason: String,
    },

    /// Dimension mismatch between a matrix and the declared node count.
    ///
    /// Also raised for non-square matrices.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// A row is not a probability distribution.
    #[error("Row {row} is not stochastic: {reason}")]
    NotStochastic {
        /// Index of the offending row
        row: usize,
        /// Description of the violation
        reason: String,
    },

    /// A token of matrix text could not be parsed as a number.
    #[error("Cannot parse '{token}' as a matrix entry: {reason}")]
    Parse {
        /// The offending token
        token: String,
        /// Parser message
        reason: String,
    },

    /// Invalid approximator or generator configuration.
    #[error("Invalid configuration for {parameter} = {value}: {reason}")]
    InvalidConfiguration {
        /// Description of the configuration error
        reason: String,
        /// Name of the invalid parameter
        parameter: String,
        /// Value that was invalid
        value: String,
    },
}

impl StochasticError {
    /// Create an InvalidInput error with a custom reason.
    pub fn invalid_input<S: Into<String>>(reason: S) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a NotStochastic error for a given row.
    pub fn not_stochastic<S: Into<String>>(row: usize, reason: S) -> Self {
        Self::NotStochastic {
            row,
            reason: reason.into(),
        }
    }

    /// Create a Parse error for a token.
    pub fn parse<S1, S2>(token: S1, reason: S2) -> Self
    where
        S1: Into<String>,
        S2: std::fmt::Display,
    {
        Self::Parse {
            token: token.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an InvalidConfiguration error.
    pub fn invalid_configuration<S1, S2, S3>(reason: S1, parameter: S2, value: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: std::fmt::Display,
    {
        Self::InvalidConfiguration {
            reason: reason.into(),
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }
}

/// Result type alias for operations that can produce StochasticError.
pub type Result<T> = std::result::Result<T, StochasticError>;
