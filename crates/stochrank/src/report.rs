//! Rendering of a finished run.

use serde::Serialize;
use std::io::{self, Write};
use stochrank_core::matrix::TransitionMatrix;
use stochrank_solver::{ApproximationResult, TerminationReason};

/// Everything printed at the end of a run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Number of nodes
    pub nodes: usize,
    /// Seed used for generation (None for matrices read from a file)
    pub seed: Option<u64>,
    /// Transition matrix rows
    pub matrix: Vec<Vec<f64>>,
    /// Approximate stationary vector
    pub stationary: Vec<f64>,
    /// Sum of the stationary vector entries
    pub sum: f64,
    /// Rounds performed
    pub iterations: usize,
    /// Why the iteration stopped
    pub termination: TerminationReason,
}

impl Report {
    pub fn new(
        matrix: &TransitionMatrix<f64>,
        result: &ApproximationResult<f64>,
        seed: Option<u64>,
    ) -> Self {
        Self {
            nodes: matrix.dimension(),
            seed,
            matrix: matrix.to_rows(),
            stationary: result.vector.iter().copied().collect(),
            sum: result.sum(),
            iterations: result.iterations,
            termination: result.termination_reason,
        }
    }

    /// Matrix rows tab-separated, then the vector one value per line, then the sum.
    pub fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for row in &self.matrix {
            let line: Vec<String> = row.iter().map(f64::to_string).collect();
            writeln!(out, "{}", line.join("\t"))?;
        }
        writeln!(out, "Stationary vector:")?;
        for value in &self.stationary {
            writeln!(out, "{value}")?;
        }
        writeln!(out, "Sum= {}", self.sum)
    }

    pub fn write_json<W: Write>(&self, out: &mut W) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use stochrank_solver::StationaryApproximator;

    fn swap_report() -> Report {
        let p = TransitionMatrix::from_rows(&[vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        let result = StationaryApproximator::default().approximate(2, &p).unwrap();
        Report::new(&p, &result, Some(3))
    }

    #[test]
    fn test_text_layout() {
        let report = swap_report();
        let mut out = Vec::new();
        report.write_text(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "0\t1");
        assert_eq!(lines[1], "1\t0");
        assert_eq!(lines[2], "Stationary vector:");
        assert_eq!(lines.len(), 6);
        assert!(lines[5].starts_with("Sum= "));
    }

    #[test]
    fn test_json_fields() {
        let report = swap_report();
        let mut out = Vec::new();
        report.write_json(&mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["nodes"], 2);
        assert_eq!(value["seed"], 3);
        assert_eq!(value["iterations"], 50);
        assert_eq!(value["termination"], "max-iterations");
        assert_eq!(value["stationary"].as_array().unwrap().len(), 2);
    }
}
