//! Command-line front end: load settings, solve, print the report.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use u_craftsolve::{solve, Settings};

/// Crafting rotation optimizer
#[derive(Parser)]
#[command(name = "u-craftsolve")]
#[command(about = "Search for the best crafting action sequence", long_about = None)]
#[command(version)]
struct Cli {
    /// Settings file (TOML)
    #[arg(short, long, env = "CRAFTSOLVE_CONFIG")]
    config: PathBuf,

    /// Random seed for the solver and the Monte Carlo batch
    #[arg(long)]
    seed: Option<u64>,

    /// Number of generations
    #[arg(short, long)]
    generations: Option<usize>,

    /// Total population size
    #[arg(short, long)]
    population: Option<usize>,

    /// Monte Carlo replays of the best sequence
    #[arg(long)]
    runs: Option<usize>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let text = std::fs::read_to_string(&cli.config)
        .with_context(|| format!("reading {}", cli.config.display()))?;
    let mut settings = Settings::from_toml_str(&text)?;

    // Override with CLI args
    if let Some(seed) = cli.seed {
        settings.solver.seed = Some(seed);
    }
    if let Some(generations) = cli.generations {
        settings.solver.generations = generations;
    }
    if let Some(population) = cli.population {
        settings.solver.population_size = population;
    }
    if let Some(runs) = cli.runs {
        settings.monte_carlo_runs = runs;
    }

    // Initialize tracing
    let filter = if cli.verbose || settings.debug {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let report = solve(&settings).context("solve failed")?;
    print!("{report}");
    Ok(())
}
