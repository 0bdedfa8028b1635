//! Configuration for the damped power iteration.
//!
//! The defaults reproduce the classic fixed-budget scheme: damping `0.9`,
//! escape factor `0.1` added flat to every entry, and exactly 50 rounds with
//! no convergence test.

use num_traits::Float;
use stochrank_core::{
    error::{Result, StochasticError},
    types::Scalar,
};

/// Number of rounds performed when no other budget is configured.
pub const DEFAULT_ROUNDS: usize = 50;

/// Default damping factor.
pub const DEFAULT_DAMPING: f64 = 0.9;

/// Default escape factor; the per-entry escape mass is `factor / n`.
pub const DEFAULT_ESCAPE_FACTOR: f64 = 0.1;

/// How the escape mass enters each round.
///
/// With `E = escape_factor / n`:
/// - `Additive`: `π'[i] = alpha · (Aᵀπ)[i] + E`
/// - `DampingScaled`: `π'[i] = alpha · (Aᵀπ)[i] + (1 - alpha) · E`
///
/// `Additive` is the default. With the default damping and escape factor
/// it keeps the vector sum at one (up to rounding) because `n · E = 1 - alpha`;
/// `DampingScaled` is the textbook PageRank shape and is opt-in only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EscapeTerm {
    /// Add the escape mass unchanged.
    #[default]
    Additive,

    /// Scale the escape mass by `1 - alpha` before adding it.
    DampingScaled,
}

impl EscapeTerm {
    /// Per-entry additive term for a chain with `nodes` states.
    pub fn per_entry<T: Scalar>(self, nodes: usize, damping: T, escape_factor: T) -> T {
        let base = escape_factor / <T as Scalar>::from_usize(nodes);
        match self {
            Self::Additive => base,
            Self::DampingScaled => (T::one() - damping) * base,
        }
    }
}

/// Stopping criteria for the power iteration.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StoppingCriterion<T>
where
    T: Scalar,
{
    /// Number of rounds to run (upper bound when a tolerance is set)
    pub max_iterations: usize,

    /// L1 change below which iteration stops early (None = fixed budget)
    pub tolerance: Option<T>,
}

impl<T> Default for StoppingCriterion<T>
where
    T: Scalar,
{
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_ROUNDS,
            tolerance: None,
        }
    }
}

impl<T> StoppingCriterion<T>
where
    T: Scalar,
{
    /// Creates a new stopping criterion with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of rounds.
    pub fn with_max_iterations(mut self, max_iter: usize) -> Self {
        self.max_iterations = max_iter;
        self
    }

    /// Enables early termination once the L1 change drops below `tol`.
    pub fn with_tolerance(mut self, tol: T) -> Self {
        self.tolerance = Some(tol);
        self
    }
}

/// Configuration for the stationary approximator.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerIterationConfig<T>
where
    T: Scalar,
{
    /// Fraction of mass propagated along the matrix each round
    pub damping: T,

    /// Escape factor; the per-entry escape mass is `escape_factor / n`
    pub escape_factor: T,

    /// How the escape mass enters each round
    pub escape_term: EscapeTerm,

    /// When to stop
    pub stopping: StoppingCriterion<T>,

    /// Node count from which rounds are computed column-parallel.
    ///
    /// Ignored without the `parallel` feature.
    pub parallel_threshold: usize,
}

impl<T> Default for PowerIterationConfig<T>
where
    T: Scalar,
{
    fn default() -> Self {
        Self {
            damping: <T as Scalar>::from_f64(DEFAULT_DAMPING),
            escape_factor: <T as Scalar>::from_f64(DEFAULT_ESCAPE_FACTOR),
            escape_term: EscapeTerm::default(),
            stopping: StoppingCriterion::default(),
            parallel_threshold: 512,
        }
    }
}

impl<T> PowerIterationConfig<T>
where
    T: Scalar,
{
    /// Creates a new configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the damping factor.
    pub fn with_damping(mut self, damping: T) -> Self {
        self.damping = damping;
        self
    }

    /// Sets the escape factor.
    pub fn with_escape_factor(mut self, factor: T) -> Self {
        self.escape_factor = factor;
        self
    }

    /// Sets how the escape mass enters each round.
    pub fn with_escape_term(mut self, term: EscapeTerm) -> Self {
        self.escape_term = term;
        self
    }

    /// Sets the number of rounds.
    pub fn with_max_iterations(mut self, max_iter: usize) -> Self {
        self.stopping.max_iterations = max_iter;
        self
    }

    /// Enables early termination on an L1 change tolerance.
    pub fn with_tolerance(mut self, tol: T) -> Self {
        self.stopping.tolerance = Some(tol);
        self
    }

    /// Sets the full stopping criterion.
    pub fn with_stopping(mut self, stopping: StoppingCriterion<T>) -> Self {
        self.stopping = stopping;
        self
    }

    /// Sets the node count from which rounds run in parallel.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Per-entry escape mass added each round for `nodes` states.
    pub fn escape_mass(&self, nodes: usize) -> T {
        self.escape_term
            .per_entry(nodes, self.damping, self.escape_factor)
    }

    /// Checks every parameter.
    pub fn validate(&self) -> Result<()> {
        if !Float::is_finite(self.damping) || self.damping < T::zero() || self.damping > T::one() {
            return Err(StochasticError::invalid_configuration(
                "must lie in [0, 1]",
                "damping",
                self.damping,
            ));
        }
        if !Float::is_finite(self.escape_factor) || self.escape_factor < T::zero() {
            return Err(StochasticError::invalid_configuration(
                "must be finite and non-negative",
                "escape_factor",
                self.escape_factor,
            ));
        }
        if self.stopping.max_iterations == 0 {
            return Err(StochasticError::invalid_configuration(
                "at least one round is required",
                "max_iterations",
                self.stopping.max_iterations,
            ));
        }
        if let Some(tol) = self.stopping.tolerance {
            if !Float::is_finite(tol) || tol <= T::zero() {
                return Err(StochasticError::invalid_configuration(
                    "must be finite and positive",
                    "tolerance",
                    tol,
                ));
            }
        }
        Ok(())
    }
}
