//! Random row-stochastic matrix synthesis.
//!
//! # Algorithm
//!
//! For every row `i` of an `n × n` matrix:
//! 1. Draw a dominance count `k` uniformly from `{0, …, ⌊n/2⌋}`
//! 2. If `k = 0`, fill the row with `1/n`
//! 3. Otherwise pick `k` distinct columns uniformly at random, give each
//!    of them `1/k` and leave the others at zero
//!
//! The zero-dominance branch keeps every row a probability distribution;
//! an all-zero row is never produced.
//!
//! Randomness is always injected, so a seeded generator reproduces the
//! same matrix.

use crate::{
    error::{Result, StochasticError},
    matrix::TransitionMatrix,
    types::{DMatrix, Scalar},
};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use tracing::debug;

/// How the distinct non-zero columns of a row are picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnSampling {
    /// Partial Fisher-Yates shuffle of the column indices.
    #[default]
    PartialShuffle,

    /// Draw a column, redraw on collision.
    ///
    /// Always terminates since at most half of the columns are requested.
    Rejection,
}

/// A generated matrix together with the dominance drawn for each row.
#[derive(Debug, Clone)]
pub struct GeneratedMatrix<T: Scalar> {
    /// The row-stochastic matrix
    pub matrix: TransitionMatrix<T>,
    /// Dominance count drawn for each row (0 means uniform row)
    pub dominance: Vec<usize>,
}

/// Generator of random `n × n` row-stochastic matrices.
///
/// # Examples
///
/// ```rust
/// use stochrank_core::generator::MatrixGenerator;
///
/// let generator = MatrixGenerator::new(6).unwrap();
/// let p = generator.generate_seeded::<f64>(42);
/// assert_eq!(p.dimension(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct MatrixGenerator {
    nodes: usize,
    sampling: ColumnSampling,
}

impl MatrixGenerator {
    /// Creates a generator for `nodes × nodes` matrices.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `nodes` is zero.
    pub fn new(nodes: usize) -> Result<Self> {
        if nodes == 0 {
            return Err(StochasticError::invalid_input(
                "number of nodes must be a positive integer",
            ));
        }
        Ok(Self {
            nodes,
            sampling: ColumnSampling::default(),
        })
    }

    /// Sets the column sampling strategy.
    pub fn with_sampling(mut self, sampling: ColumnSampling) -> Self {
        self.sampling = sampling;
        self
    }

    /// Number of nodes.
    pub fn nodes(&self) -> usize {
        self.nodes
    }

    /// Column sampling strategy in use.
    pub fn sampling(&self) -> ColumnSampling {
        self.sampling
    }

    /// Largest dominance count a row can draw (`⌊n/2⌋`).
    pub fn max_dominance(&self) -> usize {
        self.nodes / 2
    }

    /// Generates a matrix from the given random source.
    pub fn generate<T, R>(&self, rng: &mut R) -> TransitionMatrix<T>
    where
        T: Scalar,
        R: Rng + ?Sized,
    {
        self.generate_with_dominance(rng).matrix
    }

    /// Generates a matrix from a `StdRng` seeded with `seed`.
    pub fn generate_seeded<T: Scalar>(&self, seed: u64) -> TransitionMatrix<T> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.generate(&mut rng)
    }

    /// Generates a matrix and reports the dominance drawn for each row.
    pub fn generate_with_dominance<T, R>(&self, rng: &mut R) -> GeneratedMatrix<T>
    where
        T: Scalar,
        R: Rng + ?Sized,
    {
        let n = self.nodes;
        let uniform = T::one() / <T as Scalar>::from_usize(n);
        let mut matrix = DMatrix::<T>::zeros(n, n);
        let mut dominance = Vec::with_capacity(n);
        let mut columns: Vec<usize> = (0..n).collect();

        for i in 0..n {
            let dominant = rng.gen_range(0..=self.max_dominance());
            debug!(row = i, dominant, "drew row dominance");

            if dominant == 0 {
                matrix.row_mut(i).fill(uniform);
            } else {
                let weight = T::one() / <T as Scalar>::from_usize(dominant);
                for column in self.choose_columns(rng, dominant, &mut columns) {
                    matrix[(i, column)] = weight;
                }
            }
            dominance.push(dominant);
        }

        GeneratedMatrix {
            matrix: TransitionMatrix::from_generated(matrix),
            dominance,
        }
    }

    /// Picks `count` distinct column indices.
    fn choose_columns<R>(&self, rng: &mut R, count: usize, columns: &mut [usize]) -> Vec<usize>
    where
        R: Rng + ?Sized,
    {
        match self.sampling {
            ColumnSampling::PartialShuffle => {
                let (chosen, _) = columns.partial_shuffle(rng, count);
                chosen.to_vec()
            }
            ColumnSampling::Rejection => {
                let mut taken = vec![false; self.nodes];
                let mut chosen = Vec::with_capacity(count);
                while chosen.len() < count {
                    let column = rng.gen_range(0..self.nodes);
                    if !taken[column] {
                        taken[column] = true;
                        chosen.push(column);
                    }
                }
                chosen
            }
        }
    }
}
