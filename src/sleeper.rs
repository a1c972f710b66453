use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::http_client::fetch_text;
use crate::json_fields::{first_truthy, id_string, json_kind, str_field};
use crate::names::{join_name, name_key};

pub const SLEEPER_PLAYERS_URL: &str = "https://api.sleeper.app/v1/players/nfl";
pub const ESPN_HEADSHOT_URL: &str = "https://a.espncdn.com/i/headshots/nfl/players/full/";
pub const ESPN_CFB_HEADSHOT_URL: &str =
    "https://a.espncdn.com/i/headshots/college-football/players/full/";

/// Sleeper roster keyed by [`name_key`].
pub type SleeperIndex = HashMap<String, SleeperRecord>;

#[derive(Debug, Clone)]
pub struct SleeperConfig {
    pub url: String,
}

impl SleeperConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let url = lookup("SLEEPER_PLAYERS_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| SLEEPER_PLAYERS_URL.to_string());
        Self { url }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SleeperRecord {
    pub espn_id: Option<String>,
    pub full_name: String,
    pub team: Option<String>,
    pub position: Option<String>,
    /// College prospect with no NFL team yet; their headshots live under the
    /// college-football path.
    pub is_college: bool,
}

impl SleeperRecord {
    pub fn from_value(payload: &Value) -> Self {
        let full_name = match str_field(payload, "full_name") {
            Some(name) => name.to_string(),
            None => join_name(
                str_field(payload, "first_name").unwrap_or(""),
                str_field(payload, "last_name").unwrap_or(""),
            ),
        };
        // The first truthy id field is authoritative, even if it turns out blank.
        let espn_id = first_truthy(payload, &["espn_id", "espn_player_id"]).and_then(id_string);
        let team = str_field(payload, "team").map(str::to_string);
        let is_college = str_field(payload, "college").is_some() && team.is_none();

        Self {
            espn_id,
            full_name,
            team,
            position: str_field(payload, "position").map(str::to_string),
            is_college,
        }
    }

    pub fn headshot_url(&self) -> Option<String> {
        let espn_id = self.espn_id.as_deref()?;
        let base = if self.is_college {
            ESPN_CFB_HEADSHOT_URL
        } else {
            ESPN_HEADSHOT_URL
        };
        Some(format!("{base}{espn_id}.png"))
    }
}

/// Fetches the Sleeper roster. Any failure is logged and yields an empty
/// index so the run can continue on fallbacks.
pub fn load_sleeper_index(cfg: &SleeperConfig) -> SleeperIndex {
    info!("Fetching Sleeper NFL player dataset …");
    match fetch_sleeper_index(cfg) {
        Ok(index) => {
            info!("Loaded {} Sleeper records", index.len());
            index
        }
        Err(err) => {
            error!("Failed to fetch Sleeper dataset: {err:#}");
            SleeperIndex::new()
        }
    }
}

fn fetch_sleeper_index(cfg: &SleeperConfig) -> Result<SleeperIndex> {
    let body = fetch_text(&cfg.url, &[]).context("sleeper request failed")?;
    parse_sleeper_json(&body)
}

/// Builds the name-keyed index from a `/players/nfl` payload. The first
/// record seen for a name key wins.
pub fn parse_sleeper_json(raw: &str) -> Result<SleeperIndex> {
    let root: Value = serde_json::from_str(raw.trim()).context("invalid sleeper json")?;
    let Some(players) = root.as_object() else {
        return Err(anyhow!(
            "unexpected Sleeper payload structure; got {}",
            json_kind(&root)
        ));
    };

    let mut index = SleeperIndex::new();
    for value in players.values() {
        if !value.is_object() {
            continue;
        }
        let record = SleeperRecord::from_value(value);
        if record.full_name.is_empty() {
            debug!("skipping sleeper record without a name");
            continue;
        }
        index.entry(name_key(&record.full_name)).or_insert(record);
    }
    Ok(index)
}
