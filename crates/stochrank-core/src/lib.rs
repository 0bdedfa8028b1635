//! Core types for approximating stationary distributions of Markov chains.
//!
//! This crate provides the data model shared by the rest of the workspace:
//! validated row-stochastic transition matrices, the random matrix
//! generator, and the error taxonomy.
//!
//! # Modules
//!
//! - [`error`]: Error types for validation failures
//! - [`generator`]: Random row-stochastic matrix synthesis
//! - [`matrix`]: The immutable [`TransitionMatrix`](matrix::TransitionMatrix)
//! - [`types`]: Scalar trait and type aliases

pub mod error;
pub mod generator;
pub mod matrix;
pub mod types;

// Re-export commonly used items at the crate root
pub use error::{Result, StochasticError};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use stochrank_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Result, StochasticError};
    pub use crate::generator::{ColumnSampling, GeneratedMatrix, MatrixGenerator};
    pub use crate::matrix::TransitionMatrix;
    pub use crate::types::{DMatrix, DVector, Scalar};
}
