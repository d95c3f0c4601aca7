//! CLI entrypoint: run a Monte-Carlo batch of Krinsky trials and print the summary.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use krinsky::{run_monte_carlo, MonteCarloConfig, StochasticEnvironment, TrialConfig};

/// Estimate convergence accuracy and best delay of the Krinsky automaton.
#[derive(Debug, Parser)]
#[command(name = "krinsky", version)]
#[command(about = "Monte-Carlo simulation of a Krinsky learning automaton")]
struct Cli {
    /// Number of independent trials.
    #[arg(long, default_value_t = 100)]
    trials: u64,
    /// Steps per trial.
    #[arg(long, default_value_t = 10_000)]
    batch_size: u64,
    /// Trailing steps used to measure stability (must be < batch size).
    #[arg(long, default_value_t = 1_000)]
    cutoff: u64,
    /// Run seed. Random when omitted; the chosen seed is logged.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or_else(rand::random);
    info!(seed, "using run seed");

    let cfg = MonteCarloConfig {
        trials: cli.trials,
        trial: TrialConfig::new(cli.batch_size, cli.cutoff)?,
        seed,
    };
    let env = StochasticEnvironment::reference()?;
    let summary = run_monte_carlo(&env, cfg)?;
    print!("{summary}");
    Ok(())
}
