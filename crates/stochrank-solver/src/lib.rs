//! Stationary distribution approximation by damped power iteration.
//!
//! This crate consumes the row-stochastic matrices of `stochrank-core` and
//! runs a fixed-budget, PageRank-style power iteration over them.
//!
//! # Available Components
//!
//! - **StationaryApproximator**: the damped power iteration
//! - **PowerIterationConfig**: damping, escape mass, round budget
//! - **RoundCallback**: per-round observation hooks
//! - **damped_operator**: the explicit damped matrix, for inspection

pub mod callback;
pub mod config;
pub mod operator;
pub mod power_iteration;

pub use callback::{
    NoOpCallback, RoundCallback, RoundCounter, RoundInfo, SumHistory, TracingCallback,
};
pub use config::{EscapeTerm, PowerIterationConfig, StoppingCriterion, DEFAULT_ROUNDS};
pub use operator::damped_operator;
pub use power_iteration::{ApproximationResult, StationaryApproximator, TerminationReason};
