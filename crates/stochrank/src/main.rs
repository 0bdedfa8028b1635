use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use stochrank::cli::{parse_nodes, Cli, OutputFormat};
use stochrank::report::Report;
use stochrank_core::{generator::MatrixGenerator, matrix::TransitionMatrix};
use stochrank_solver::{StationaryApproximator, TracingCallback};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Error: setting default subscriber failed: {err}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let solver = StationaryApproximator::new(cli.power_iteration_config())
        .context("invalid approximation settings")?;

    let (matrix, seed) = match &cli.matrix {
        Some(path) => {
            let tolerance = cli.row_tolerance()?;
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read matrix file {}", path.display()))?;
            let matrix = TransitionMatrix::<f64>::parse_with_tolerance(&text, tolerance)
                .with_context(|| format!("invalid matrix in {}", path.display()))?;
            info!(path = %path.display(), nodes = matrix.dimension(), "loaded matrix");
            (matrix, None)
        }
        None => {
            let nodes = match &cli.nodes {
                Some(raw) => parse_nodes(raw)?,
                None => prompt_nodes()?,
            };
            let seed = cli.seed.unwrap_or_else(rand::random);
            let matrix = MatrixGenerator::new(nodes)?.generate_seeded::<f64>(seed);
            info!(nodes, seed, "generated matrix");
            (matrix, Some(seed))
        }
    };

    let mut callback = TracingCallback::new(10);
    let result = solver.approximate_with_callback(matrix.dimension(), &matrix, &mut callback)?;
    let report = Report::new(&matrix, &result, seed);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        OutputFormat::Text => report.write_text(&mut out)?,
        OutputFormat::Json => report.write_json(&mut out)?,
    }
    out.flush()?;
    Ok(())
}

fn prompt_nodes() -> Result<usize> {
    eprint!("Give the number of nodes: ");
    io::stderr().flush()?;

    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read the number of nodes")?;
    anyhow::ensure!(read > 0, "no number of nodes given on stdin");
    Ok(parse_nodes(&line)?)
}
