//! Match record model.
//!
//! Typed view over the match-v5 payload. Only the fields the aggregation
//! needs are mapped; the raw upstream JSON is what gets persisted, so
//! unknown fields survive on disk even though this view ignores them.

use serde::{Deserialize, Serialize};

/// One completed game, as returned by match-v5 and cached on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    #[serde(default)]
    pub metadata: MatchMetadata,

    #[serde(default)]
    pub info: MatchInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchMetadata {
    pub match_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchInfo {
    /// Game length in seconds.
    pub game_duration: u64,

    pub queue_id: u32,

    pub participants: Vec<Participant>,
}

/// Per-player entry inside a match record.
///
/// Numeric fields default to zero: the upstream omits counters that did
/// not apply to the game mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Participant {
    pub puuid: String,

    pub champion_name: String,

    pub kills: u32,

    pub deaths: u32,

    pub assists: u32,

    pub total_minions_killed: u32,

    pub neutral_minions_killed: u32,

    pub win: bool,
}

impl MatchRecord {
    /// Find the participant entry for a given PUUID, if present.
    pub fn participant(&self, puuid: &str) -> Option<&Participant> {
        self.info.participants.iter().find(|p| p.puuid == puuid)
    }
}
