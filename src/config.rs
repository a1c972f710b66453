use std::env;
use std::path::PathBuf;

use crate::sleeper::SleeperConfig;
use crate::sportsdata::SportsDataConfig;

pub const DEFAULT_OUTPUT: &str = "data/espn-headshots.json";
pub const DEFAULT_CASSETTE_DIR: &str = "pulse-mock/pulse_mock/cassettes";

/// Everything one run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub corpus_dir: PathBuf,
    pub output: PathBuf,
    pub sleeper: SleeperConfig,
    pub sportsdata: SportsDataConfig,
}

impl RunConfig {
    pub fn from_env(output: PathBuf) -> Self {
        Self::from_lookup(output, |key| env::var(key).ok())
    }

    pub fn from_lookup(output: PathBuf, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let corpus_dir = lookup("PULSE_CASSETTE_DIR")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CASSETTE_DIR));
        Self {
            corpus_dir,
            output,
            sleeper: SleeperConfig::from_lookup(&lookup),
            sportsdata: SportsDataConfig::from_lookup(&lookup),
        }
    }
}
