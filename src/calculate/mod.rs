//! Aggregation and ranking logic.
//!
//! Pure functions that fold cached match records into per-player
//! performance stats, build the per-metric leaderboards, and order ranked
//! standings. Everything here is deterministic in its inputs; ties always
//! resolve to roster order via stable sorts.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{Leaderboards, MatchRecord, PlayerStats, TopChampion};

/// How many entries a leaderboard or top-champions list may hold.
const TOP_N: usize = 5;

/// Round to two decimals, the dashboard's wire precision.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Base performance stats for one player over a match sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BaseStats {
    pub games: u32,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub kda: f64,
    pub cs_min: f64,
}

/// Accumulate kills/deaths/assists, CS and duration over the matches the
/// player actually appears in.
///
/// Zero-death players get `kda = kills + assists` (saturating convention,
/// not a limit); zero matching matches yield an all-zero record.
pub fn compute_base_stats(matches: &[MatchRecord], puuid: &str) -> BaseStats {
    let mut games = 0u32;
    let mut kills = 0u32;
    let mut deaths = 0u32;
    let mut assists = 0u32;
    let mut total_cs = 0u64;
    let mut total_min = 0f64;

    for m in matches {
        let Some(p) = m.participant(puuid) else {
            continue;
        };

        games += 1;
        kills += p.kills;
        deaths += p.deaths;
        assists += p.assists;
        total_cs += (p.total_minions_killed + p.neutral_minions_killed) as u64;
        total_min += m.info.game_duration as f64 / 60.0;
    }

    let kda = if deaths == 0 {
        (kills + assists) as f64
    } else {
        (kills + assists) as f64 / deaths as f64
    };
    let cs_min = if total_min > 0.0 {
        total_cs as f64 / total_min
    } else {
        0.0
    };

    BaseStats {
        games,
        kills,
        deaths,
        assists,
        kda: round2(kda),
        cs_min: round2(cs_min),
    }
}

/// Group the player's matches by champion and rank by games played.
///
/// Ties keep first-appearance order (stable sort); at most five entries.
pub fn compute_top_champions(matches: &[MatchRecord], puuid: &str) -> Vec<TopChampion> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, (u32, u32)> = HashMap::new();

    for m in matches {
        let Some(p) = m.participant(puuid) else {
            continue;
        };

        let name = if p.champion_name.is_empty() {
            "Unknown".to_string()
        } else {
            p.champion_name.clone()
        };

        let entry = counts.entry(name.clone()).or_insert_with(|| {
            order.push(name);
            (0, 0)
        });
        entry.0 += 1;
        if p.win {
            entry.1 += 1;
        }
    }

    let mut champions: Vec<TopChampion> = order
        .into_iter()
        .map(|name| {
            let (games, wins) = counts[&name];
            let win_rate = if games > 0 {
                round2(wins as f64 / games as f64 * 100.0)
            } else {
                0.0
            };
            TopChampion {
                name,
                games,
                win_rate,
            }
        })
        .collect();

    champions.sort_by(|a, b| b.games.cmp(&a.games));
    champions.truncate(TOP_N);
    champions
}

fn top_by<F: Fn(&PlayerStats) -> f64>(players: &[PlayerStats], key: F) -> Vec<PlayerStats> {
    let mut sorted = players.to_vec();
    sorted.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));
    sorted.truncate(TOP_N);
    sorted
}

/// Top-5 of the roster per metric, descending, roster-order ties.
pub fn build_leaderboards(players: &[PlayerStats]) -> Leaderboards {
    Leaderboards {
        kda: top_by(players, |p| p.kda),
        kills: top_by(players, |p| p.kills as f64),
        deaths: top_by(players, |p| p.deaths as f64),
        assists: top_by(players, |p| p.assists as f64),
        cs_min: top_by(players, |p| p.cs_min),
    }
}

/// Ascending tier ladder; index is the tier's rank.
const TIER_LADDER: [&str; 11] = [
    "UNRANKED",
    "IRON",
    "BRONZE",
    "SILVER",
    "GOLD",
    "PLATINUM",
    "EMERALD",
    "DIAMOND",
    "MASTER",
    "GRANDMASTER",
    "CHALLENGER",
];

fn tier_rank(tier: &str) -> i64 {
    TIER_LADDER
        .iter()
        .position(|t| tier.eq_ignore_ascii_case(t))
        .map(|i| i as i64)
        .unwrap_or(0)
}

fn division_rank(division: &str) -> i64 {
    match division {
        "IV" => 1,
        "III" => 2,
        "II" => 3,
        "I" => 4,
        _ => 0,
    }
}

/// Composite rank score: tier dominates division dominates league points.
///
/// A single LP never outweighs a division, a full division range never
/// outweighs a tier. Unknown tier or division rank as 0.
pub fn elo_score(tier: &str, division: &str, league_points: u32) -> i64 {
    tier_rank(tier) * 100_000 + division_rank(division) * 1_000 + league_points as i64
}
