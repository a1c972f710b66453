use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::cassettes::LocalPlayer;
use crate::matcher::{Confidence, match_player};
use crate::sleeper::SleeperIndex;
use crate::sportsdata::SportsDataIndex;

/// Key under which [`RunStats`] is written next to the player entries.
pub const STATS_KEY: &str = "_stats";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadshotEntry {
    pub full_name: String,
    pub team: Option<String>,
    pub position: Option<String>,
    pub espn_id: Option<String>,
    pub headshot: String,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub total_players: usize,
    pub matched: usize,
    pub fallback: usize,
}

#[derive(Debug, Clone, Default)]
pub struct HeadshotMap {
    pub players: BTreeMap<String, HeadshotEntry>,
    pub stats: RunStats,
}

impl HeadshotMap {
    /// Player count per confidence label; every label is present, unused ones at zero.
    pub fn confidence_breakdown(&self) -> BTreeMap<Confidence, usize> {
        let mut counts: BTreeMap<Confidence, usize> =
            Confidence::ALL.iter().map(|c| (*c, 0)).collect();
        for entry in self.players.values() {
            *counts.entry(entry.confidence).or_insert(0) += 1;
        }
        counts
    }

    /// Flat JSON object: one key per player id plus [`STATS_KEY`].
    pub fn to_json(&self) -> Result<Value> {
        let mut root = Map::new();
        for (id, entry) in &self.players {
            let value = serde_json::to_value(entry)
                .with_context(|| format!("serialize headshot entry {id}"))?;
            root.insert(id.clone(), value);
        }
        root.insert(
            STATS_KEY.to_string(),
            serde_json::to_value(self.stats).context("serialize run stats")?,
        );
        Ok(Value::Object(root))
    }
}

pub fn build_headshot_map(
    players: &[LocalPlayer],
    sleeper: &SleeperIndex,
    sportsdata: &SportsDataIndex,
) -> HeadshotMap {
    let mut map = HeadshotMap::default();

    for player in players {
        if player.id.is_empty() {
            continue;
        }
        if player.id == STATS_KEY {
            warn!(
                "Dropping player {STATS_KEY:?} ({}) from the artifact: id collides with the stats key",
                player.full_name
            );
            continue;
        }

        map.stats.total_players += 1;
        let result = match_player(player, sleeper, sportsdata);
        if result.confidence.is_match() {
            map.stats.matched += 1;
        } else {
            map.stats.fallback += 1;
        }

        map.players.insert(
            player.id.clone(),
            HeadshotEntry {
                full_name: player.full_name.clone(),
                team: player.team.clone(),
                position: player.position.clone(),
                espn_id: result.espn_id,
                headshot: result.headshot,
                confidence: result.confidence,
            },
        );
    }

    info!(
        "Matched {}/{} players (fallback for {})",
        map.stats.matched, map.stats.total_players, map.stats.fallback
    );
    map
}

/// Writes the map as pretty-printed JSON with sorted keys, creating parent
/// directories as needed.
pub fn write_headshot_map(map: &HeadshotMap, destination: &Path) -> Result<()> {
    if let Some(dir) = destination.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(&map.to_json()?).context("serialize headshot map")?;
    fs::write(destination, json)
        .with_context(|| format!("failed to write {}", destination.display()))?;
    info!("Wrote {}", destination.display());
    Ok(())
}
