#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the Tokyo batch solvers.
//!
//! Every solver reads its whole input first, so a malformed case aborts the
//! run before any answer is printed. Answers go to stdout and logs to stderr.

mod input;

use std::{
    fmt::Write as _,
    fs,
    io::{self, Read as _, Write as _},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tokyo_core::{Outcome, Terminal};
use tokyo_system_simulation::simulate;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Batch solvers for the Tokyo puzzle set.
#[derive(Debug, Parser)]
#[command(name = "tokyo", version, long_about = None)]
struct Cli {
    /// Raises log verbosity; repeat for trace output.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    solver: Solver,
}

#[derive(Debug, Subcommand)]
enum Solver {
    /// Counts the buildings destroyed before an evader is caught.
    Tokyo {
        #[command(flatten)]
        source: Source,

        /// Output format for each case.
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Decides whether advertising pays for itself.
    Ads {
        #[command(flatten)]
        source: Source,
    },
    /// Estimates how much distance a periodic GPS sampler misses.
    Gps {
        #[command(flatten)]
        source: Source,
    },
}

#[derive(Debug, Args)]
struct Source {
    /// Reads the batch from this file instead of stdin.
    #[arg(long)]
    input: Option<PathBuf>,
}

impl Source {
    fn read(&self) -> Result<String> {
        match &self.input {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display())),
            None => {
                let mut text = String::new();
                let _ = io::stdin()
                    .read_to_string(&mut text)
                    .context("failed to read stdin")?;
                Ok(text)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Bare destroyed count per line.
    Text,
    /// One JSON object per line.
    Json,
}

/// JSON record emitted per simulated case.
#[derive(Debug, Serialize)]
struct CaseReport {
    case: usize,
    destroyed: u32,
    ticks: u64,
    terminal: Terminal,
}

impl CaseReport {
    fn new(case: usize, outcome: Outcome) -> Self {
        Self {
            case,
            destroyed: outcome.destroyed,
            ticks: outcome.ticks,
            terminal: outcome.terminal,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let output = run(&cli.solver)?;
    io::stdout()
        .lock()
        .write_all(output.as_bytes())
        .context("failed to write answers")
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install log subscriber")
}

fn run(solver: &Solver) -> Result<String> {
    match solver {
        Solver::Tokyo { source, format } => tokyo(&source.read()?, *format),
        Solver::Ads { source } => ads(&source.read()?),
        Solver::Gps { source } => gps(&source.read()?),
    }
}

fn tokyo(text: &str, format: Format) -> Result<String> {
    let layouts = input::layouts(text)?;
    info!(cases = layouts.len(), "running tokyo batch");

    let mut output = String::new();
    for (index, layout) in layouts.iter().enumerate() {
        let outcome = simulate(layout);
        match format {
            Format::Text => writeln!(output, "{}", outcome.destroyed)?,
            Format::Json => {
                let report = CaseReport::new(index + 1, outcome);
                let line = serde_json::to_string(&report)
                    .with_context(|| format!("failed to encode case {}", index + 1))?;
                writeln!(output, "{line}")?;
            }
        }
    }
    Ok(output)
}

fn ads(text: &str) -> Result<String> {
    let campaigns = input::campaigns(text)?;
    info!(cases = campaigns.len(), "running advertising batch");

    let mut output = String::new();
    for campaign in &campaigns {
        writeln!(output, "{}", campaign.decide())?;
    }
    Ok(output)
}

fn gps(text: &str) -> Result<String> {
    let route = input::route(text)?;
    info!("running gps estimate");

    let error = route
        .distance_error()
        .context("cannot estimate the distance error")?;
    Ok(format!("{error}\n"))
}
