//! Callback support for the power iteration.
//!
//! Callbacks observe the iteration; they cannot change the vector or stop
//! the run early, but an error returned from any hook aborts it.

use crate::power_iteration::ApproximationResult;
use stochrank_core::{
    error::Result,
    types::{DVector, Scalar},
};
use tracing::debug;

/// Information passed to callbacks after each round.
#[derive(Debug)]
pub struct RoundInfo<'a, T: Scalar> {
    /// One-based index of the round that just finished
    pub round: usize,

    /// Vector produced by this round
    pub vector: &'a DVector<T>,

    /// L1 distance between this round's vector and the previous one
    pub change: T,
}

/// Trait for power iteration callbacks.
pub trait RoundCallback<T: Scalar> {
    /// Called once before the first round.
    fn on_start(&mut self, nodes: usize) -> Result<()> {
        let _ = nodes;
        Ok(())
    }

    /// Called at the end of each round.
    fn on_round_end(&mut self, info: &RoundInfo<'_, T>) -> Result<()> {
        let _ = info;
        Ok(())
    }

    /// Called once with the final result.
    fn on_finish(&mut self, result: &ApproximationResult<T>) -> Result<()> {
        let _ = result;
        Ok(())
    }
}

/// A no-op callback that does nothing.
pub struct NoOpCallback;

impl<T: Scalar> RoundCallback<T> for NoOpCallback {}

/// Counts the rounds actually performed.
#[derive(Debug, Default, Clone)]
pub struct RoundCounter {
    rounds: usize,
}

impl RoundCounter {
    /// Creates a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rounds observed during the last run.
    pub fn rounds(&self) -> usize {
        self.rounds
    }
}

impl<T: Scalar> RoundCallback<T> for RoundCounter {
    fn on_start(&mut self, _nodes: usize) -> Result<()> {
        self.rounds = 0;
        Ok(())
    }

    fn on_round_end(&mut self, _info: &RoundInfo<'_, T>) -> Result<()> {
        self.rounds += 1;
        Ok(())
    }
}

/// Records the vector sum after every round.
#[derive(Debug, Clone)]
pub struct SumHistory<T: Scalar> {
    sums: Vec<T>,
}

impl<T: Scalar> Default for SumHistory<T> {
    fn default() -> Self {
        Self { sums: Vec::new() }
    }
}

impl<T: Scalar> SumHistory<T> {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of the vector after each round, in order.
    pub fn sums(&self) -> &[T] {
        &self.sums
    }
}

impl<T: Scalar> RoundCallback<T> for SumHistory<T> {
    fn on_start(&mut self, _nodes: usize) -> Result<()> {
        self.sums.clear();
        Ok(())
    }

    fn on_round_end(&mut self, info: &RoundInfo<'_, T>) -> Result<()> {
        self.sums.push(info.vector.sum());
        Ok(())
    }
}

/// Emits a `tracing` debug event every `every` rounds.
pub struct TracingCallback {
    every: usize,
}

impl TracingCallback {
    /// Create a new progress callback; `every` is clamped to at least one.
    pub fn new(every: usize) -> Self {
        Self { every: every.max(1) }
    }
}

impl<T: Scalar> RoundCallback<T> for TracingCallback {
    fn on_start(&mut self, nodes: usize) -> Result<()> {
        debug!(nodes, "starting power iteration");
        Ok(())
    }

    fn on_round_end(&mut self, info: &RoundInfo<'_, T>) -> Result<()> {
        if info.round % self.every == 0 {
            debug!(
                round = info.round,
                change = <T as Scalar>::to_f64(info.change),
                sum = <T as Scalar>::to_f64(info.vector.sum()),
                "power iteration round"
            );
        }
        Ok(())
    }

    fn on_finish(&mut self, result: &ApproximationResult<T>) -> Result<()> {
        debug!(
            rounds = result.iterations,
            reason = %result.termination_reason,
            "power iteration complete"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_counter_resets_on_start() {
        let mut counter = RoundCounter::new();
        let v = DVector::from_element(2, 0.5_f64);
        let info = RoundInfo {
            round: 1,
            vector: &v,
            change: 0.0,
        };

        RoundCallback::<f64>::on_start(&mut counter, 2).unwrap();
        counter.on_round_end(&info).unwrap();
        counter.on_round_end(&info).unwrap();
        assert_eq!(counter.rounds(), 2);

        RoundCallback::<f64>::on_start(&mut counter, 2).unwrap();
        assert_eq!(counter.rounds(), 0);
    }

    #[test]
    fn test_sum_history_records_each_round() {
        let mut history = SumHistory::<f64>::new();
        let a = DVector::from_vec(vec![0.25, 0.25]);
        let b = DVector::from_vec(vec![0.5, 0.5]);

        history.on_start(2).unwrap();
        for (round, vector) in [(1, &a), (2, &b)] {
            history
                .on_round_end(&RoundInfo {
                    round,
                    vector,
                    change: 0.5,
                })
                .unwrap();
        }
        assert_eq!(history.sums(), &[0.5, 1.0]);
    }
}
