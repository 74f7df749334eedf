//! The refresh pipeline.
//!
//! One refresh cycle walks the fixed roster strictly sequentially — one
//! player fully resolved, fetched and aggregated before the next begins —
//! to bound concurrent load on the rate-limited upstream. The only
//! suspension points are upstream calls (paced inside the client) and the
//! persistent-cache reads. A cycle either completes for the whole roster
//! or fails; there is no partial-roster payload.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info};

use crate::calculate;
use crate::config::{RosterPlayer, TrackingConfig};
use crate::models::{
    MatchRecord, PlayerStats, StandingEntry, StandingsPayload, StatsPayload,
};
use crate::riot::{LeagueApi, MatchIdsQuery, RiotError};
use crate::store::identity::IdentityStore;
use crate::store::matches::MatchStore;
use crate::store::StoreError;

/// Failure of a refresh cycle. The snapshot layer matches
/// `Upstream(RateLimited)` structurally to decide on stale fallback;
/// everything else is a hard failure.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Upstream(#[from] RiotError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Owns the stores and upstream handle and produces the two payloads.
pub struct Pipeline {
    api: Arc<dyn LeagueApi>,
    identities: IdentityStore,
    matches: MatchStore,
    tracking: TrackingConfig,
    roster: Vec<RosterPlayer>,
}

impl Pipeline {
    pub fn new(
        api: Arc<dyn LeagueApi>,
        identities: IdentityStore,
        matches: MatchStore,
        tracking: TrackingConfig,
        roster: Vec<RosterPlayer>,
    ) -> Self {
        Self {
            api,
            identities,
            matches,
            tracking,
            roster,
        }
    }

    /// Resolve every roster member once. Warms the identity cache.
    pub async fn resolve_roster(&self) -> Result<Vec<(String, String)>, RefreshError> {
        let mut resolved = Vec::with_capacity(self.roster.len());
        for member in &self.roster {
            let puuid = self
                .identities
                .resolve(self.api.as_ref(), &member.game_name, &member.tag_line)
                .await?;
            resolved.push((member.key.clone(), puuid));
        }
        Ok(resolved)
    }

    /// Most-recent match records for a player: discovery query, then
    /// cache-or-fetch per id.
    async fn fetch_matches(
        &self,
        puuid: &str,
        count: u32,
    ) -> Result<Vec<MatchRecord>, RefreshError> {
        let query = MatchIdsQuery {
            queue: self.tracking.queue_id,
            count,
            start_time: self.tracking.start_time(),
        };
        let ids = self.api.match_ids_by_puuid(puuid, &query).await?;

        let mut records = Vec::with_capacity(ids.len());
        for id in &ids {
            records.push(self.matches.get(self.api.as_ref(), id).await?);
        }
        Ok(records)
    }

    /// Full refresh of the performance snapshot.
    pub async fn stats_snapshot(&self) -> Result<StatsPayload, RefreshError> {
        let sample = self.tracking.sample_per_player;
        let mut players = Vec::with_capacity(self.roster.len());

        for member in &self.roster {
            let puuid = self
                .identities
                .resolve(self.api.as_ref(), &member.game_name, &member.tag_line)
                .await?;
            let records = self.fetch_matches(&puuid, sample).await?;
            let base = calculate::compute_base_stats(&records, &puuid);
            debug!(player = %member.key, games = base.games, "aggregated base stats");

            players.push(PlayerStats {
                id: member.key.clone(),
                name: member.display.clone(),
                games: base.games,
                kills: base.kills,
                deaths: base.deaths,
                assists: base.assists,
                kda: base.kda,
                cs_min: base.cs_min,
            });
        }

        let leaderboards = calculate::build_leaderboards(&players);
        info!("performance snapshot refreshed ({} players)", players.len());

        Ok(StatsPayload {
            generated_at: Utc::now().timestamp_millis(),
            sample_per_player: sample,
            players,
            leaderboards,
            queue_id: self.tracking.queue_id,
            match_from_unix: self.tracking.match_from_unix,
        })
    }

    /// Full refresh of the standings snapshot.
    pub async fn standings_snapshot(&self) -> Result<StandingsPayload, RefreshError> {
        let queue_type = self.tracking.league_queue_type();
        let mut standings = Vec::with_capacity(self.roster.len());

        for member in &self.roster {
            let puuid = self
                .identities
                .resolve(self.api.as_ref(), &member.game_name, &member.tag_line)
                .await?;

            let entries = self.api.league_entries_by_puuid(&puuid).await?;
            let entry = entries.iter().find(|e| e.queue_type == queue_type);

            let (tier, division, lp, wins, losses) = match entry {
                Some(e) => (
                    e.tier.clone(),
                    e.rank.clone(),
                    e.league_points,
                    e.wins,
                    e.losses,
                ),
                None => ("UNRANKED".to_string(), String::new(), 0, 0, 0),
            };
            let games = wins + losses;
            let win_rate = if games > 0 {
                calculate::round2(wins as f64 / games as f64 * 100.0)
            } else {
                0.0
            };
            let queue_rank_text = match entry {
                Some(_) => format!("{} {}", tier, division),
                None => "Unranked".to_string(),
            };

            let records = self
                .fetch_matches(&puuid, self.tracking.top_champions_sample)
                .await?;
            let top_champions = calculate::compute_top_champions(&records, &puuid);

            standings.push(StandingEntry {
                id: member.key.clone(),
                name: member.display.clone(),
                tier,
                division,
                lp,
                queue_rank_text,
                wins,
                losses,
                games,
                win_rate,
                top_champions,
            });
        }

        // Stable sort: identical tier/division/lp keeps roster order.
        standings.sort_by(|a, b| {
            calculate::elo_score(&b.tier, &b.division, b.lp)
                .cmp(&calculate::elo_score(&a.tier, &a.division, a.lp))
        });
        info!("standings snapshot refreshed ({} players)", standings.len());

        Ok(StandingsPayload {
            generated_at: Utc::now().timestamp_millis(),
            players: standings,
            queue_id: self.tracking.queue_id,
            match_from_unix: self.tracking.match_from_unix,
        })
    }
}
