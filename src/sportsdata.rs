use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::http_client::fetch_text;
use crate::names::{join_name, name_key};
use crate::json_fields::{json_kind, str_field};

pub const SPORTSDATA_PLAYERS_URL: &str = "https://api.sportsdata.io/v3/nfl/scores/json/Players";
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// SportsData.io roster keyed by [`name_key`].
pub type SportsDataIndex = HashMap<String, SportsDataRecord>;

#[derive(Debug, Clone)]
pub struct SportsDataConfig {
    pub api_key: Option<String>,
    pub url: String,
}

impl SportsDataConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = lookup("SPORTSDATA_API_KEY")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let url = lookup("SPORTSDATA_PLAYERS_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| SPORTSDATA_PLAYERS_URL.to_string());
        Self { api_key, url }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SportsDataRecord {
    pub full_name: String,
    pub team: Option<String>,
    pub position: Option<String>,
    pub photo_url: String,
}

impl SportsDataRecord {
    /// `None` unless the row has both a name and a photo URL.
    pub fn from_value(row: &Value) -> Option<Self> {
        let full_name = join_name(
            str_field(row, "FirstName").unwrap_or(""),
            str_field(row, "LastName").unwrap_or(""),
        );
        if full_name.is_empty() {
            return None;
        }
        let photo_url = str_field(row, "PhotoUrl")?.trim();
        if photo_url.is_empty() {
            return None;
        }
        Some(Self {
            full_name,
            team: str_field(row, "Team").map(str::to_string),
            position: str_field(row, "Position").map(str::to_string),
            photo_url: photo_url.to_string(),
        })
    }
}

/// Fetches the SportsData.io roster. Skipped without an API key; any other
/// failure is logged and yields an empty index.
pub fn load_sportsdata_index(cfg: &SportsDataConfig) -> SportsDataIndex {
    let Some(api_key) = cfg.api_key.as_deref() else {
        warn!("SPORTSDATA_API_KEY not set; skipping SportsData.io enrichment");
        return SportsDataIndex::new();
    };

    info!("Fetching SportsData.io NFL player dataset …");
    match fetch_sportsdata_index(&cfg.url, api_key) {
        Ok(index) => {
            info!("Loaded {} SportsData.io records", index.len());
            index
        }
        Err(err) => {
            error!("Failed to fetch SportsData.io dataset: {err:#}");
            SportsDataIndex::new()
        }
    }
}

fn fetch_sportsdata_index(url: &str, api_key: &str) -> Result<SportsDataIndex> {
    let body = fetch_text(url, &[(SUBSCRIPTION_KEY_HEADER, api_key)])
        .context("sportsdata request failed")?;
    parse_sportsdata_json(&body)
}

/// Builds the name-keyed index from a `Players` payload. The first row seen
/// for a name key wins.
pub fn parse_sportsdata_json(raw: &str) -> Result<SportsDataIndex> {
    let root: Value = serde_json::from_str(raw.trim()).context("invalid sportsdata json")?;
    let Some(rows) = root.as_array() else {
        return Err(anyhow!(
            "unexpected SportsData.io payload structure; got {}",
            json_kind(&root)
        ));
    };

    let mut index = SportsDataIndex::new();
    for record in rows.iter().filter_map(SportsDataRecord::from_value) {
        index.entry(name_key(&record.full_name)).or_insert(record);
    }
    Ok(index)
}
