//! League standing model.

use serde::{Deserialize, Serialize};

/// One entry of the league-v4 by-puuid response.
///
/// A player has one entry per ranked queue; callers select the entry
/// matching the tracked queue type. Tier and rank arrive as upstream
/// strings (`"GOLD"`, `"II"`) and are scored by `calculate::elo_score`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeagueEntryDto {
    pub queue_type: String,

    pub tier: String,

    /// Division within the tier (I–IV).
    pub rank: String,

    pub league_points: u32,

    pub wins: u32,

    pub losses: u32,
}
