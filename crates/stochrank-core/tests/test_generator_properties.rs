//! Property-based tests for random matrix generation.
//!
//! These tests verify invariants that should hold for any generated matrix:
//! - Every row sums to one
//! - Non-zero count per row equals the drawn dominance (or `n` for zero)
//! - Seeded generation is reproducible
//! - Both column sampling strategies honour the same contract

use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use stochrank_core::prelude::*;

fn arb_sampling() -> impl Strategy<Value = ColumnSampling> {
    prop_oneof![
        Just(ColumnSampling::PartialShuffle),
        Just(ColumnSampling::Rejection),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn rows_are_stochastic(n in 1usize..40, seed in any::<u64>(), sampling in arb_sampling()) {
        let generator = MatrixGenerator::new(n).unwrap().with_sampling(sampling);
        let p = generator.generate_seeded::<f64>(seed);

        prop_assert_eq!(p.dimension(), n);
        for (i, sum) in p.row_sums().iter().enumerate() {
            prop_assert!((sum - 1.0).abs() < 1e-9, "row {} sums to {}", i, sum);
        }
        for value in p.as_matrix().iter() {
            prop_assert!(*value >= 0.0);
        }
    }

    #[test]
    fn sparsity_matches_dominance(
        n in 1usize..40,
        seed in any::<u64>(),
        sampling in arb_sampling(),
    ) {
        let generator = MatrixGenerator::new(n).unwrap().with_sampling(sampling);
        let mut rng = StdRng::seed_from_u64(seed);
        let generated = generator.generate_with_dominance::<f64, _>(&mut rng);

        for (i, &dominant) in generated.dominance.iter().enumerate() {
            prop_assert!(dominant <= n / 2);
            let expected = if dominant == 0 { n } else { dominant };
            prop_assert_eq!(generated.matrix.nonzero_count(i), expected);
        }
    }

    #[test]
    fn seeded_generation_is_deterministic(n in 1usize..30, seed in any::<u64>()) {
        let generator = MatrixGenerator::new(n).unwrap();
        let a = generator.generate_seeded::<f64>(seed);
        let b = generator.generate_seeded::<f64>(seed);
        prop_assert_eq!(a, b);
    }
}

#[test]
fn test_every_dominance_value_is_reachable() {
    let generator = MatrixGenerator::new(6).unwrap();
    let mut rng = StdRng::seed_from_u64(99);
    let mut seen = [false; 4];

    for _ in 0..200 {
        let generated = generator.generate_with_dominance::<f64, _>(&mut rng);
        for k in generated.dominance {
            seen[k] = true;
        }
    }

    assert!(seen.iter().all(|&s| s), "dominance values seen: {seen:?}");
}

#[test]
fn test_generated_matrix_reparses() {
    let p = MatrixGenerator::new(5).unwrap().generate_seeded::<f64>(1);
    let reparsed: TransitionMatrix<f64> = p.to_string().parse().unwrap();

    for i in 0..5 {
        for j in 0..5 {
            assert!((p.get(i, j) - reparsed.get(i, j)).abs() < 1e-15);
        }
    }
}
