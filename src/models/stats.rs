//! Derived statistics and snapshot payload models.
//!
//! Everything here is recomputed wholesale on each refresh cycle; none of
//! these types carry identity beyond the roster keys they embed.

use serde::{Deserialize, Serialize, Serializer};

/// Aggregated base stats for one player, with identity fields attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    /// Roster key, used by the dashboard for avatar lookup.
    pub id: String,

    pub name: String,

    pub games: u32,

    pub kills: u32,

    pub deaths: u32,

    pub assists: u32,

    /// (kills + assists) / deaths, saturating at kills + assists when
    /// deaths is zero. Rounded to two decimals.
    pub kda: f64,

    /// Minions (regular + neutral) per minute. Rounded to two decimals.
    pub cs_min: f64,
}

/// Most-played champion for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopChampion {
    pub name: String,

    pub games: u32,

    /// Wins / games, as a percentage.
    pub win_rate: f64,
}

/// Top-5 roster orderings per metric. Insertion order is rank order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboards {
    pub kda: Vec<PlayerStats>,
    pub kills: Vec<PlayerStats>,
    pub deaths: Vec<PlayerStats>,
    pub assists: Vec<PlayerStats>,
    pub cs_min: Vec<PlayerStats>,
}

/// One roster member's ranked standing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingEntry {
    pub id: String,

    pub name: String,

    /// Upstream tier string, `"UNRANKED"` when no entry exists.
    pub tier: String,

    /// Division within the tier, empty when unranked.
    pub division: String,

    pub lp: u32,

    /// Human-readable rank, e.g. `"GOLD II"` or `"Unranked"`.
    pub queue_rank_text: String,

    pub wins: u32,

    pub losses: u32,

    pub games: u32,

    pub win_rate: f64,

    pub top_champions: Vec<TopChampion>,
}

/// Payload of the performance snapshot endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsPayload {
    /// Unix milliseconds at compute time.
    pub generated_at: i64,

    pub sample_per_player: u32,

    pub players: Vec<PlayerStats>,

    pub leaderboards: Leaderboards,

    pub queue_id: u32,

    pub match_from_unix: u64,
}

/// Payload of the standings snapshot endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsPayload {
    pub generated_at: i64,

    /// Sorted descending by composite rank score.
    pub players: Vec<StandingEntry>,

    pub queue_id: u32,

    pub match_from_unix: u64,
}

/// How a served payload relates to the snapshot cache.
///
/// Serialized the way the dashboard expects: a TTL hit is `true`, a
/// rate-limit fallback is `"stale"`, and a fresh compute omits the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTag {
    Hit,
    Stale,
}

impl Serialize for CacheTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CacheTag::Hit => serializer.serialize_bool(true),
            CacheTag::Stale => serializer.serialize_str("stale"),
        }
    }
}

/// Envelope adding the optional cache tag to a snapshot payload.
#[derive(Debug, Serialize)]
pub struct SnapshotResponse<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached: Option<CacheTag>,

    #[serde(flatten)]
    pub payload: T,
}
