//! Damped power iteration for approximate stationary distributions.
//!
//! # Algorithm Overview
//!
//! Starting from the uniform vector `π = 1/n`, every round computes a new
//! vector
//!
//! ```text
//! π'[i] = alpha · Σ_j π[j] · A[j][i] + e
//! ```
//!
//! where `e` is the per-entry escape mass (see [`EscapeTerm`]). The new
//! vector is built in a separate buffer and swapped in once the round is
//! complete, so a round only ever reads the previous round's values.
//!
//! By default exactly [`DEFAULT_ROUNDS`](crate::config::DEFAULT_ROUNDS)
//! rounds run with no convergence test, and the final vector is returned
//! as-is. It is not renormalised: its sum follows
//! `s' = alpha · s + n · e` and only stays at one when `n · e = 1 - alpha`.
//!
//! [`EscapeTerm`]: crate::config::EscapeTerm

use crate::{
    callback::{NoOpCallback, RoundCallback, RoundInfo},
    config::PowerIterationConfig,
};
use num_traits::Float;
use std::fmt;
use std::time::{Duration, Instant};
use stochrank_core::{
    error::{Result, StochasticError},
    matrix::TransitionMatrix,
    types::{DMatrix, DVector, Scalar},
};
use tracing::info;

/// Reason for termination of the power iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum TerminationReason {
    /// The L1 change between two rounds fell below the tolerance
    Converged,
    /// The round budget was used up
    MaxIterations,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Converged => f.write_str("converged"),
            Self::MaxIterations => f.write_str("max-iterations"),
        }
    }
}

/// Result of a power iteration run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ApproximationResult<T>
where
    T: Scalar,
{
    /// The approximate stationary vector (not renormalised)
    pub vector: DVector<T>,

    /// Number of rounds performed
    pub iterations: usize,

    /// L1 change produced by the last round
    pub last_change: T,

    /// Wall-clock time spent iterating
    pub duration: Duration,

    /// Reason for termination
    pub termination_reason: TerminationReason,
}

impl<T> ApproximationResult<T>
where
    T: Scalar,
{
    /// Sum of the vector entries.
    pub fn sum(&self) -> T {
        self.vector.sum()
    }

    /// Whether the run stopped on the tolerance rather than the budget.
    pub fn converged(&self) -> bool {
        self.termination_reason == TerminationReason::Converged
    }
}

/// Approximates the stationary distribution of a damped transition matrix.
///
/// # Examples
///
/// ```rust
/// use stochrank_core::generator::MatrixGenerator;
/// use stochrank_solver::{PowerIterationConfig, StationaryApproximator};
///
/// let p = MatrixGenerator::new(5).unwrap().generate_seeded::<f64>(1);
/// let solver = StationaryApproximator::new(PowerIterationConfig::default()).unwrap();
/// let result = solver.approximate(5, &p).unwrap();
/// assert_eq!(result.iterations, 50);
/// ```
#[derive(Debug, Clone)]
pub struct StationaryApproximator<T>
where
    T: Scalar,
{
    config: PowerIterationConfig<T>,
}

impl<T> Default for StationaryApproximator<T>
where
    T: Scalar,
{
    fn default() -> Self {
        Self {
            config: PowerIterationConfig::default(),
        }
    }
}

impl<T> StationaryApproximator<T>
where
    T: Scalar,
{
    /// Creates an approximator after validating the configuration.
    pub fn new(config: PowerIterationConfig<T>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PowerIterationConfig<T> {
        &self.config
    }

    /// Runs the iteration on `matrix`, which must be `nodes × nodes`.
    pub fn approximate(
        &self,
        nodes: usize,
        matrix: &TransitionMatrix<T>,
    ) -> Result<ApproximationResult<T>> {
        self.approximate_with_callback(nodes, matrix, &mut NoOpCallback)
    }

    /// Same as [`approximate`](Self::approximate), reporting every round to `callback`.
    pub fn approximate_with_callback<C>(
        &self,
        nodes: usize,
        matrix: &TransitionMatrix<T>,
        callback: &mut C,
    ) -> Result<ApproximationResult<T>>
    where
        C: RoundCallback<T> + ?Sized,
    {
        check_dimensions(nodes, matrix)?;

        let start = Instant::now();
        let a = matrix.as_matrix();
        let damping = self.config.damping;
        let escape = self.config.escape_mass(nodes);
        let stopping = &self.config.stopping;

        let mut current = DVector::from_element(nodes, T::one() / <T as Scalar>::from_usize(nodes));
        let mut next = DVector::zeros(nodes);
        let mut iterations = 0;
        let mut last_change = T::zero();
        let mut termination_reason = TerminationReason::MaxIterations;

        callback.on_start(nodes)?;

        while iterations < stopping.max_iterations {
            self.round(a, &current, &mut next, damping, escape);
            last_change = l1_distance(&current, &next);
            std::mem::swap(&mut current, &mut next);
            iterations += 1;

            callback.on_round_end(&RoundInfo {
                round: iterations,
                vector: &current,
                change: last_change,
            })?;

            if stopping.tolerance.is_some_and(|tol| last_change < tol) {
                termination_reason = TerminationReason::Converged;
                break;
            }
        }

        let result = ApproximationResult {
            vector: current,
            iterations,
            last_change,
            duration: start.elapsed(),
            termination_reason,
        };
        callback.on_finish(&result)?;

        info!(
            nodes,
            iterations,
            sum = <T as Scalar>::to_f64(result.sum()),
            elapsed_ms = result.duration.as_secs_f64() * 1e3,
            "stationary approximation finished"
        );
        Ok(result)
    }

    /// One full round: `next[i] = damping · ⟨A[:, i], current⟩ + escape`.
    fn round(
        &self,
        a: &DMatrix<T>,
        current: &DVector<T>,
        next: &mut DVector<T>,
        damping: T,
        escape: T,
    ) {
        if self.runs_parallel(a.nrows()) {
            parallel_round(a, current, next, damping, escape);
        } else {
            sequential_round(a, current, next, damping, escape);
        }
    }

    #[cfg(feature = "parallel")]
    fn runs_parallel(&self, nodes: usize) -> bool {
        nodes >= self.config.parallel_threshold
    }

    #[cfg(not(feature = "parallel"))]
    fn runs_parallel(&self, _nodes: usize) -> bool {
        false
    }
}

#[cfg(feature = "parallel")]
fn parallel_round<T: Scalar>(
    a: &DMatrix<T>,
    current: &DVector<T>,
    next: &mut DVector<T>,
    damping: T,
    escape: T,
) {
    use rayon::prelude::*;

    next.as_mut_slice()
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, out)| {
            *out = damping * a.column(i).dot(current) + escape;
        });
}

#[cfg(not(feature = "parallel"))]
fn parallel_round<T: Scalar>(
    a: &DMatrix<T>,
    current: &DVector<T>,
    next: &mut DVector<T>,
    damping: T,
    escape: T,
) {
    sequential_round(a, current, next, damping, escape);
}

fn sequential_round<T: Scalar>(
    a: &DMatrix<T>,
    current: &DVector<T>,
    next: &mut DVector<T>,
    damping: T,
    escape: T,
) {
    for (i, out) in next.iter_mut().enumerate() {
        *out = damping * a.column(i).dot(current) + escape;
    }
}

fn check_dimensions<T: Scalar>(nodes: usize, matrix: &TransitionMatrix<T>) -> Result<()> {
    if nodes == 0 {
        return Err(StochasticError::invalid_input(
            "number of nodes must be a positive integer",
        ));
    }
    let dim = matrix.dimension();
    if dim != nodes {
        return Err(StochasticError::dimension_mismatch(
            format!("{nodes}x{nodes}"),
            format!("{dim}x{dim}"),
        ));
    }
    Ok(())
}

fn l1_distance<T: Scalar>(a: &DVector<T>, b: &DVector<T>) -> T {
    a.iter()
        .zip(b.iter())
        .fold(T::zero(), |acc, (&x, &y)| acc + Float::abs(x - y))
}
