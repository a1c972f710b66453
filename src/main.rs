//! Builds the PrizePicks id → ESPN headshot map for the Pulse mock players.
//!
//! Players come from the mock cassettes; headshots come from SportsData.io
//! (when `SPORTSDATA_API_KEY` is set) and Sleeper's ESPN ids. Either source
//! may be unreachable: the artifact is still written, with fallbacks.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use espn_headshots::cassettes::load_corpus_players;
use espn_headshots::config::{DEFAULT_OUTPUT, RunConfig};
use espn_headshots::headshots::{build_headshot_map, write_headshot_map};
use espn_headshots::sleeper::load_sleeper_index;
use espn_headshots::sportsdata::load_sportsdata_index;

#[derive(Parser)]
#[command(name = "generate_espn_headshots")]
#[command(about = "Generate ESPN headshot mapping for Pulse mock players", long_about = None)]
struct Cli {
    /// Destination JSON file
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    init_tracing(cli.verbose);
    let cfg = RunConfig::from_env(cli.output);
    run(&cfg)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn run(cfg: &RunConfig) -> Result<()> {
    let players = load_corpus_players(&cfg.corpus_dir)?;
    info!("Loaded {} PrizePicks players from Pulse mock", players.len());

    let sleeper = load_sleeper_index(&cfg.sleeper);
    let sportsdata = load_sportsdata_index(&cfg.sportsdata);

    let map = build_headshot_map(&players, &sleeper, &sportsdata);
    for (confidence, count) in map.confidence_breakdown() {
        debug!("{confidence}: {count}");
    }

    write_headshot_map(&map, &cfg.output)
        .with_context(|| format!("unable to write {}", cfg.output.display()))
}
