use std::path::PathBuf;
use std::time::Duration;

use auction_runner::{SimulationConfig, TradingSimulation, load_config, load_default_config};
use clap::Parser;

/// Run robot traders through a double auction session
#[derive(Parser, Debug)]
#[command(name = "double-auction-sim", version)]
struct Args {
    /// Session configuration (JSON). Uses the embedded default when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Quote attempts per robot
    #[arg(short, long, default_value_t = 200)]
    rounds: usize,

    /// Pause between quotes of one robot, in milliseconds
    #[arg(long, default_value_t = 0)]
    interval_ms: u64,

    /// Seed for reservation values and robot quotes
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut session = match &args.config {
        Some(path) => load_config(path)?,
        None => load_default_config()?,
    };
    if args.seed.is_some() {
        session.seed = args.seed;
    }

    log::info!(
        "Starting {} with {} participants",
        session.display_name,
        session.num_participants
    );

    let sim = TradingSimulation::with_config(SimulationConfig {
        session,
        rounds: args.rounds,
        quote_interval: Duration::from_millis(args.interval_ms),
    })?;
    let results = sim.run().await?;

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
