use std::fmt;

use serde::Serialize;

use crate::cassettes::LocalPlayer;
use crate::names::{name_key, strip_suffixes};
use crate::sleeper::{SleeperIndex, SleeperRecord};
use crate::sportsdata::SportsDataIndex;

pub const FALLBACK_HEADSHOT: &str = "https://a.espncdn.com/i/headshots/nfl/players/full/default.png";

/// Which rule produced a headshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Confidence {
    Sportsdata,
    ExactName,
    SportsdataSuffixStripped,
    NameWithSuffixStripped,
    Fallback,
}

impl Confidence {
    pub const ALL: [Confidence; 5] = [
        Confidence::Sportsdata,
        Confidence::ExactName,
        Confidence::SportsdataSuffixStripped,
        Confidence::NameWithSuffixStripped,
        Confidence::Fallback,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Confidence::Sportsdata => "sportsdata",
            Confidence::ExactName => "exact-name",
            Confidence::SportsdataSuffixStripped => "sportsdata-suffix-stripped",
            Confidence::NameWithSuffixStripped => "name-with-suffix-stripped",
            Confidence::Fallback => "fallback",
        }
    }

    pub fn is_match(self) -> bool {
        self != Confidence::Fallback
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub espn_id: Option<String>,
    /// Never empty.
    pub headshot: String,
    pub confidence: Confidence,
}

impl MatchResult {
    fn fallback() -> Self {
        Self {
            espn_id: None,
            headshot: FALLBACK_HEADSHOT.to_string(),
            confidence: Confidence::Fallback,
        }
    }

    fn from_photo(photo_url: &str, confidence: Confidence) -> Self {
        Self {
            espn_id: None,
            headshot: photo_url.to_string(),
            confidence,
        }
    }

    fn from_sleeper(record: &SleeperRecord, confidence: Confidence) -> Option<Self> {
        let espn_id = record.espn_id.clone()?;
        let headshot = record
            .headshot_url()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| FALLBACK_HEADSHOT.to_string());
        Some(Self {
            espn_id: Some(espn_id),
            headshot,
            confidence,
        })
    }
}

/// Resolves a headshot for one player.
///
/// Rules are tried in a fixed order and the first hit wins: SportsData.io by
/// exact name, Sleeper by exact name, then both again with generational
/// suffixes stripped. Anything left gets [`FALLBACK_HEADSHOT`].
pub fn match_player(
    player: &LocalPlayer,
    sleeper: &SleeperIndex,
    sportsdata: &SportsDataIndex,
) -> MatchResult {
    let key = name_key(&player.full_name);

    if let Some(record) = sportsdata.get(&key) {
        return MatchResult::from_photo(&record.photo_url, Confidence::Sportsdata);
    }

    if let Some(result) = sleeper
        .get(&key)
        .and_then(|record| MatchResult::from_sleeper(record, Confidence::ExactName))
    {
        return result;
    }

    let stripped = strip_suffixes(&key);

    if let Some(record) = sportsdata.get(&stripped) {
        return MatchResult::from_photo(&record.photo_url, Confidence::SportsdataSuffixStripped);
    }

    if !stripped.is_empty() && stripped != key {
        if let Some(result) = sleeper
            .get(&stripped)
            .and_then(|record| MatchResult::from_sleeper(record, Confidence::NameWithSuffixStripped))
        {
            return result;
        }
    }

    MatchResult::fallback()
}

#[cfg(test)]
mod tests {
    use super::{Confidence, FALLBACK_HEADSHOT, match_player};
    use crate::cassettes::LocalPlayer;
    use crate::sleeper::{SleeperIndex, SleeperRecord};
    use crate::sportsdata::{SportsDataIndex, SportsDataRecord};

    fn player(id: &str, name: &str) -> LocalPlayer {
        LocalPlayer {
            id: id.to_string(),
            full_name: name.to_string(),
            team: None,
            position: None,
        }
    }

    fn sleeper(entries: &[(&str, Option<&str>)]) -> SleeperIndex {
        entries
            .iter()
            .map(|(key, espn_id)| {
                (
                    key.to_string(),
                    SleeperRecord {
                        espn_id: espn_id.map(str::to_string),
                        full_name: key.to_string(),
                        team: None,
                        position: None,
                        is_college: false,
                    },
                )
            })
            .collect()
    }

    fn sportsdata(entries: &[(&str, &str)]) -> SportsDataIndex {
        entries
            .iter()
            .map(|(key, photo)| {
                (
                    key.to_string(),
                    SportsDataRecord {
                        full_name: key.to_string(),
                        team: None,
                        position: None,
                        photo_url: photo.to_string(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn exact_sleeper_match_builds_espn_url() {
        let result = match_player(
            &player("p1", "Justin Jefferson"),
            &sleeper(&[("justin jefferson", Some("4262921"))]),
            &SportsDataIndex::new(),
        );
        assert_eq!(result.confidence, Confidence::ExactName);
        assert_eq!(result.espn_id.as_deref(), Some("4262921"));
        assert_eq!(
            result.headshot,
            "https://a.espncdn.com/i/headshots/nfl/players/full/4262921.png"
        );
    }

    #[test]
    fn sportsdata_wins_over_sleeper() {
        let result = match_player(
            &player("p1", "Justin  JEFFERSON"),
            &sleeper(&[("justin jefferson", Some("4262921"))]),
            &sportsdata(&[("justin jefferson", "https://img/jj.png")]),
        );
        assert_eq!(result.confidence, Confidence::Sportsdata);
        assert_eq!(result.espn_id, None);
        assert_eq!(result.headshot, "https://img/jj.png");
    }

    #[test]
    fn suffix_stripped_sleeper_match() {
        let result = match_player(
            &player("p2", "Odell Beckham Jr."),
            &sleeper(&[("odell beckham", Some("16733"))]),
            &SportsDataIndex::new(),
        );
        assert_eq!(result.confidence, Confidence::NameWithSuffixStripped);
        assert_eq!(result.espn_id.as_deref(), Some("16733"));
    }

    #[test]
    fn suffix_stripped_sportsdata_beats_suffix_stripped_sleeper() {
        let result = match_player(
            &player("p2", "Marvin Harrison Jr"),
            &sleeper(&[("marvin harrison", Some("1"))]),
            &sportsdata(&[("marvin harrison", "https://img/mh.png")]),
        );
        assert_eq!(result.confidence, Confidence::SportsdataSuffixStripped);
        assert_eq!(result.headshot, "https://img/mh.png");
    }

    #[test]
    fn exact_matches_beat_suffix_stripped_ones() {
        let result = match_player(
            &player("p2", "Marvin Harrison Jr"),
            &sleeper(&[("marvin harrison jr", Some("2"))]),
            &sportsdata(&[("marvin harrison", "https://img/mh.png")]),
        );
        assert_eq!(result.confidence, Confidence::ExactName);
        assert_eq!(result.espn_id.as_deref(), Some("2"));
    }

    #[test]
    fn sleeper_match_without_espn_id_falls_through() {
        let result = match_player(
            &player("p3", "Practice Squad"),
            &sleeper(&[("practice squad", None)]),
            &SportsDataIndex::new(),
        );
        assert_eq!(result.confidence, Confidence::Fallback);
        assert_eq!(result.headshot, FALLBACK_HEADSHOT);
    }

    #[test]
    fn unchanged_key_does_not_retry_sleeper() {
        // Nothing to strip, so the only candidate is the exact key, which has
        // no espn id; a different player's key must not be picked up.
        let result = match_player(
            &player("p4", "Tom Brady"),
            &sleeper(&[("tom brady", None), ("tom brady jr", Some("9"))]),
            &SportsDataIndex::new(),
        );
        assert_eq!(result.confidence, Confidence::Fallback);
        assert_eq!(result.espn_id, None);
    }

    #[test]
    fn empty_indexes_always_fall_back() {
        for name in ["", "Solo", "A B C III"] {
            let result = match_player(&player("p", name), &SleeperIndex::new(), &SportsDataIndex::new());
            assert_eq!(result.confidence, Confidence::Fallback);
            assert!(!result.headshot.is_empty());
        }
    }

    #[test]
    fn labels_match_serialized_form() {
        for confidence in Confidence::ALL {
            let json = serde_json::to_value(confidence).expect("serializable");
            assert_eq!(json, serde_json::Value::String(confidence.label().to_string()));
        }
    }
}
