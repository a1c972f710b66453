use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;
use tracing::{debug, warn};

use crate::names::join_name;

const CASSETTE_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// A player as recorded in the Pulse mock cassettes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalPlayer {
    pub id: String,
    pub full_name: String,
    pub team: Option<String>,
    pub position: Option<String>,
}

/// Insertion-ordered, id-keyed player set. Re-inserting an id replaces the
/// earlier record in place.
#[derive(Debug, Default)]
struct PlayerSet {
    players: Vec<LocalPlayer>,
    by_id: HashMap<String, usize>,
}

impl PlayerSet {
    fn upsert(&mut self, player: LocalPlayer) {
        match self.by_id.get(&player.id) {
            Some(&idx) => self.players[idx] = player,
            None => {
                self.by_id.insert(player.id.clone(), self.players.len());
                self.players.push(player);
            }
        }
    }

    fn into_players(self) -> Vec<LocalPlayer> {
        self.players
    }
}

/// Loads every player row from the cassettes in `dir`, deduplicated by id.
///
/// `.yml` files are read before `.yaml` files, each group in path order; a
/// later record for the same id overwrites the earlier one. A cassette that
/// cannot be read or parsed is skipped with a warning. Only a missing
/// directory is an error.
pub fn load_corpus_players(dir: &Path) -> Result<Vec<LocalPlayer>> {
    if !dir.is_dir() {
        return Err(anyhow!("Cassette directory not found: {}", dir.display()));
    }

    let mut set = PlayerSet::default();
    for path in cassette_paths(dir)? {
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("Skipping {} (unreadable): {err}", file_label(&path));
                continue;
            }
        };
        match parse_cassette(&raw) {
            Ok(rows) => {
                debug!("{}: {} player rows", file_label(&path), rows.len());
                for player in rows {
                    set.upsert(player);
                }
            }
            Err(err) => {
                warn!("Skipping {} due to YAML error: {err:#}", file_label(&path));
            }
        }
    }
    Ok(set.into_players())
}

fn cassette_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to list cassette directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect::<Vec<_>>();

    let mut ordered = Vec::with_capacity(entries.len());
    for ext in CASSETTE_EXTENSIONS {
        let mut group = entries
            .iter()
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(ext))
            .cloned()
            .collect::<Vec<_>>();
        group.sort();
        ordered.extend(group);
    }
    Ok(ordered)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Extracts player rows from a single cassette document, in recorded order.
pub fn parse_cassette(raw: &str) -> Result<Vec<LocalPlayer>> {
    let doc: YamlValue = serde_yaml::from_str(raw).context("invalid cassette yaml")?;
    let Some(interactions) = doc.get("interactions").and_then(|v| v.as_sequence()) else {
        return Ok(Vec::new());
    };

    let mut out = Vec::new();
    for interaction in interactions {
        let Some(body) = response_body(interaction) else {
            continue;
        };
        let payload: JsonValue = match serde_json::from_str(body) {
            Ok(payload) => payload,
            Err(err) => {
                debug!("skipping non-json response body: {err}");
                continue;
            }
        };
        match &payload {
            JsonValue::Array(rows) => out.extend(rows.iter().filter_map(player_from_row)),
            JsonValue::Object(_) => out.extend(player_from_row(&payload)),
            _ => {}
        }
    }
    Ok(out)
}

fn response_body(interaction: &YamlValue) -> Option<&str> {
    let body = interaction.get("response")?.get("body")?;
    match body {
        YamlValue::String(s) => Some(s.as_str()),
        YamlValue::Mapping(_) => body.get("string")?.as_str(),
        _ => None,
    }
}

fn player_from_row(row: &JsonValue) -> Option<LocalPlayer> {
    let id = row.get("id")?.as_str()?;
    if id.is_empty() {
        return None;
    }
    let first = row.get("first_name").and_then(JsonValue::as_str).unwrap_or("");
    let last = row.get("last_name").and_then(JsonValue::as_str).unwrap_or("");
    if first.is_empty() && last.is_empty() {
        return None;
    }

    Some(LocalPlayer {
        id: id.to_string(),
        full_name: join_name(first, last),
        team: row.get("team").and_then(team_label),
        position: row
            .get("position")
            .and_then(JsonValue::as_str)
            .map(str::to_string),
    })
}

fn team_label(team: &JsonValue) -> Option<String> {
    let team = team.as_object()?;
    ["abbreviation", "name", "market"]
        .iter()
        .filter_map(|key| team.get(*key).and_then(JsonValue::as_str))
        .find(|value| !value.is_empty())
        .map(str::to_string)
}
