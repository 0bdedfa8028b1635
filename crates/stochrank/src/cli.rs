use clap::{Parser, ValueEnum, ValueHint};
use std::path::PathBuf;
use stochrank_core::error::{Result, StochasticError};
use stochrank_solver::{EscapeTerm, PowerIterationConfig, DEFAULT_ROUNDS};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Number of nodes; asked for on stdin when omitted
    #[arg(short, long, allow_hyphen_values = true, conflicts_with = "matrix")]
    pub nodes: Option<String>,

    /// Read the transition matrix from a whitespace-separated file instead of generating one
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub matrix: Option<PathBuf>,

    /// Seed for matrix generation (random when omitted)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Damping factor
    #[arg(long, default_value_t = 0.9)]
    pub alpha: f64,

    /// Escape factor; each round adds escape_factor / n to every entry
    #[arg(long, default_value_t = 0.1)]
    pub escape_factor: f64,

    /// Multiply the escape mass by (1 - alpha)
    #[arg(long)]
    pub scaled_escape: bool,

    /// Number of rounds (upper bound when --tolerance is set)
    #[arg(long, default_value_t = DEFAULT_ROUNDS)]
    pub iterations: usize,

    /// Stop early once the L1 change between rounds drops below this value
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Allowed deviation of a row sum from one for --matrix input
    #[arg(long, default_value_t = 1e-9)]
    pub row_tolerance: f64,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Set the logging level
    #[arg(long, default_value = "warn")]
    pub log_level: tracing::Level,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    /// Approximator configuration described by the flags.
    pub fn power_iteration_config(&self) -> PowerIterationConfig<f64> {
        let escape_term = if self.scaled_escape {
            EscapeTerm::DampingScaled
        } else {
            EscapeTerm::Additive
        };
        let mut config = PowerIterationConfig::new()
            .with_damping(self.alpha)
            .with_escape_factor(self.escape_factor)
            .with_escape_term(escape_term)
            .with_max_iterations(self.iterations);
        if let Some(tol) = self.tolerance {
            config = config.with_tolerance(tol);
        }
        config
    }

    /// The `--row-tolerance` value, rejected unless finite and non-negative.
    pub fn row_tolerance(&self) -> Result<f64> {
        if !self.row_tolerance.is_finite() || self.row_tolerance < 0.0 {
            return Err(StochasticError::invalid_configuration(
                "must be finite and non-negative",
                "row_tolerance",
                self.row_tolerance,
            ));
        }
        Ok(self.row_tolerance)
    }
}

/// Parses a user-supplied node count.
pub fn parse_nodes(input: &str) -> Result<usize> {
    let trimmed = input.trim();
    let nodes: i64 = trimmed.parse().map_err(|_| {
        StochasticError::invalid_input(format!("'{trimmed}' is not an integer"))
    })?;
    if nodes <= 0 {
        return Err(StochasticError::invalid_input(format!(
            "number of nodes must be a positive integer, got {nodes}"
        )));
    }
    usize::try_from(nodes)
        .ok()
        .filter(|n| n.checked_mul(*n).is_some())
        .ok_or_else(|| {
            StochasticError::invalid_input(format!(
                "{nodes} nodes are too many for an {nodes}x{nodes} matrix"
            ))
        })
}
