//! Approximate stationary distributions of random Markov chains.
//!
//! This crate ties the workspace together: it re-exports the data model
//! from `stochrank-core` and the power iteration from `stochrank-solver`,
//! and hosts the command-line front end.
//!
//! # Example
//!
//! ```
//! use stochrank::prelude::*;
//!
//! let p = MatrixGenerator::new(8).unwrap().generate_seeded::<f64>(42);
//! let result = StationaryApproximator::default().approximate(8, &p).unwrap();
//! assert_eq!(result.iterations, 50);
//! assert!((result.sum() - 1.0).abs() < 1e-9);
//! ```

pub mod cli;
pub mod report;

pub use nalgebra;
pub use stochrank_core as core;
pub use stochrank_solver as solver;

pub use stochrank_core::{Result, StochasticError};

use stochrank_core::{generator::MatrixGenerator, matrix::TransitionMatrix};
use stochrank_solver::{ApproximationResult, PowerIterationConfig, StationaryApproximator};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use stochrank_core::prelude::*;
    pub use stochrank_solver::{
        damped_operator, ApproximationResult, EscapeTerm, NoOpCallback, PowerIterationConfig,
        RoundCallback, RoundCounter, RoundInfo, StationaryApproximator, StoppingCriterion,
        SumHistory, TerminationReason, TracingCallback,
    };
}

/// Generates a seeded random chain on `nodes` states and approximates its
/// stationary vector.
pub fn approximate_random_chain(
    nodes: usize,
    seed: u64,
    config: PowerIterationConfig<f64>,
) -> Result<(TransitionMatrix<f64>, ApproximationResult<f64>)> {
    let solver = StationaryApproximator::new(config)?;
    let matrix = MatrixGenerator::new(nodes)?.generate_seeded::<f64>(seed);
    let result = solver.approximate(nodes, &matrix)?;
    Ok((matrix, result))
}
