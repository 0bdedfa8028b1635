//! Tests for power iteration properties.
//!
//! This test module verifies the behaviour of the approximator on
//! generated and hand-written matrices: round count, determinism,
//! non-negativity, the unnormalised sum recurrence and agreement with the
//! exact fixed point.

use approx::assert_relative_eq;
use nalgebra::DMatrix;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use stochrank_core::prelude::*;
use stochrank_solver::{
    damped_operator, EscapeTerm, PowerIterationConfig, RoundCounter, StationaryApproximator,
    SumHistory, TerminationReason,
};

fn test_matrix_6() -> TransitionMatrix<f64> {
    let sixth = 1.0 / 6.0;
    let third = 1.0 / 3.0;
    TransitionMatrix::from_rows(&[
        vec![0.0, 0.5, 0.5, 0.0, 0.0, 0.0],
        vec![sixth, sixth, sixth, sixth, sixth, sixth],
        vec![third, third, 0.0, 0.0, third, 0.0],
        vec![0.0, 0.0, 0.0, 0.0, 0.5, 0.5],
        vec![0.0, 0.0, 0.0, 0.5, 0.0, 0.5],
        vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    ])
    .unwrap()
}

/// Closed form of `s' = alpha · s + c` after `k` rounds from `s = 1`.
fn expected_sum(alpha: f64, c: f64, k: usize) -> f64 {
    let ak = alpha.powi(k as i32);
    ak + c * (1.0 - ak) / (1.0 - alpha)
}

#[test]
fn test_runs_exactly_fifty_rounds() {
    for n in [1, 2, 7, 30] {
        let p = MatrixGenerator::new(n).unwrap().generate_seeded::<f64>(n as u64);
        let mut counter = RoundCounter::new();
        let result = StationaryApproximator::default()
            .approximate_with_callback(n, &p, &mut counter)
            .unwrap();

        assert_eq!(counter.rounds(), 50);
        assert_eq!(result.iterations, 50);
        assert_eq!(result.termination_reason, TerminationReason::MaxIterations);
        assert!(!result.converged());
    }
}

#[test]
fn test_single_node_fixed_point() {
    let p = TransitionMatrix::<f64>::from_rows(&[vec![1.0]]).unwrap();
    let result = StationaryApproximator::default().approximate(1, &p).unwrap();
    assert_relative_eq!(result.vector[0], 1.0, epsilon = 1e-9);
}

#[test]
fn test_repeated_runs_are_identical() {
    let p = test_matrix_6();
    let solver = StationaryApproximator::default();
    let first = solver.approximate(6, &p).unwrap();
    let second = solver.approximate(6, &p).unwrap();
    assert_eq!(first.vector, second.vector);
}

#[test]
fn test_parallel_and_sequential_rounds_agree() {
    let n = 64;
    let p = MatrixGenerator::new(n).unwrap().generate_seeded::<f64>(5);
    let sequential = StationaryApproximator::new(
        PowerIterationConfig::new().with_parallel_threshold(usize::MAX),
    )
    .unwrap()
    .approximate(n, &p)
    .unwrap();
    let parallel =
        StationaryApproximator::new(PowerIterationConfig::new().with_parallel_threshold(0))
            .unwrap()
            .approximate(n, &p)
            .unwrap();

    assert_eq!(sequential.vector, parallel.vector);
}

#[test]
fn test_default_sum_stays_near_one() {
    let p = test_matrix_6();
    let mut history = SumHistory::<f64>::new();
    let result = StationaryApproximator::default()
        .approximate_with_callback(6, &p, &mut history)
        .unwrap();

    // n · E = 0.1 = 1 - alpha, so only rounding moves the sum.
    assert_eq!(history.sums().len(), 50);
    for sum in history.sums() {
        assert_relative_eq!(*sum, 1.0, epsilon = 1e-9);
    }
    assert_relative_eq!(result.sum(), 1.0, epsilon = 1e-9);
}

#[test]
fn test_sum_drifts_with_other_damping() {
    let p = test_matrix_6();
    let alpha = 0.5;
    let mut history = SumHistory::<f64>::new();
    let result = StationaryApproximator::new(PowerIterationConfig::new().with_damping(alpha))
        .unwrap()
        .approximate_with_callback(6, &p, &mut history)
        .unwrap();

    for (k, sum) in history.sums().iter().enumerate() {
        assert_relative_eq!(*sum, expected_sum(alpha, 0.1, k + 1), epsilon = 1e-12);
    }
    // The additive escape mass pulls the sum to 0.1 / (1 - alpha), not to one.
    assert_relative_eq!(result.sum(), 0.2, epsilon = 1e-9);
    assert!((result.sum() - 1.0).abs() > 0.5);
}

#[test]
fn test_scaled_escape_is_opt_in() {
    let p = test_matrix_6();
    let default = StationaryApproximator::default().approximate(6, &p).unwrap();
    let scaled = StationaryApproximator::new(
        PowerIterationConfig::new().with_escape_term(EscapeTerm::DampingScaled),
    )
    .unwrap()
    .approximate(6, &p)
    .unwrap();

    assert_relative_eq!(default.sum(), 1.0, epsilon = 1e-9);
    assert_relative_eq!(scaled.sum(), expected_sum(0.9, 0.01, 50), epsilon = 1e-9);
    assert!(scaled.sum() < 0.2);
}

#[test]
fn test_converges_to_exact_fixed_point() {
    let p = TransitionMatrix::from_rows(&[
        vec![0.05, 0.9, 0.05],
        vec![7.0 / 15.0, 4.0 / 15.0, 4.0 / 15.0],
        vec![11.0 / 12.0, 1.0 / 24.0, 1.0 / 24.0],
    ])
    .unwrap();
    let config = PowerIterationConfig::new()
        .with_max_iterations(1000)
        .with_tolerance(1e-13);
    let result = StationaryApproximator::new(config).unwrap().approximate(3, &p).unwrap();

    assert!(result.converged());
    assert!(result.iterations < 1000);

    // π = 0.9 · Aᵀπ + E  ⇔  (I - 0.9 · Aᵀ) π = E · 1
    let system = DMatrix::<f64>::identity(3, 3) - p.as_matrix().transpose() * 0.9;
    let rhs = nalgebra::DVector::from_element(3, 0.1 / 3.0);
    let exact = system.lu().solve(&rhs).unwrap();
    for i in 0..3 {
        assert_relative_eq!(result.vector[i], exact[i], epsilon = 1e-10);
    }
}

#[test]
fn test_one_round_matches_damped_operator() {
    let p = test_matrix_6();
    let config = PowerIterationConfig::new().with_max_iterations(1);
    let result = StationaryApproximator::new(config.clone())
        .unwrap()
        .approximate(6, &p)
        .unwrap();

    let g = damped_operator(&p, &config);
    let uniform = nalgebra::DVector::from_element(6, 1.0 / 6.0);
    let expected = g.tr_mul(&uniform);
    for i in 0..6 {
        assert_relative_eq!(result.vector[i], expected[i], epsilon = 1e-14);
    }
}

#[test]
fn test_dimension_mismatch_fails_fast() {
    let p = test_matrix_6();
    let mut counter = RoundCounter::new();
    let err = StationaryApproximator::default()
        .approximate_with_callback(5, &p, &mut counter)
        .unwrap_err();

    assert!(matches!(err, StochasticError::DimensionMismatch { .. }));
    assert_eq!(counter.rounds(), 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn output_is_non_negative(n in 1usize..25, seed in any::<u64>(), alpha in 0.0f64..=1.0) {
        let p = MatrixGenerator::new(n).unwrap().generate_seeded::<f64>(seed);
        let result = StationaryApproximator::new(PowerIterationConfig::new().with_damping(alpha))
            .unwrap()
            .approximate(n, &p)
            .unwrap();

        prop_assert_eq!(result.vector.len(), n);
        for value in result.vector.iter() {
            prop_assert!(*value >= 0.0);
        }
    }

    #[test]
    fn sum_follows_recurrence(n in 1usize..25, seed in any::<u64>(), alpha in 0.0f64..0.99) {
        let p = MatrixGenerator::new(n).unwrap().generate_seeded::<f64>(seed);
        let result = StationaryApproximator::new(PowerIterationConfig::new().with_damping(alpha))
            .unwrap()
            .approximate(n, &p)
            .unwrap();

        let expected = expected_sum(alpha, 0.1, 50);
        prop_assert!(
            (result.sum() - expected).abs() < 1e-9,
            "sum {} vs {}",
            result.sum(),
            expected
        );
    }
}
