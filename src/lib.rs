//! # SoloQ Tracker
//!
//! Backend for a small League of Legends dashboard tracking a fixed
//! roster of players: ingests ranked match history from the Riot API,
//! aggregates it into leaderboards and rank standings, and serves the
//! results as JSON.
//!
//! ## Architecture
//!
//! - **models**: wire DTOs and snapshot payload types
//! - **riot**: rate-limited Riot API client
//! - **store**: persistent identity and match caches
//! - **calculate**: aggregation and ranking logic
//! - **snapshot**: in-memory TTL caches for the served payloads
//! - **pipeline**: the sequential roster refresh loop
//! - **api**: REST API endpoints
//! - **config**: configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod riot;
pub mod snapshot;
pub mod store;

pub use models::*;

use std::time::Duration;

/// Parse a human-friendly duration string (e.g., "6h", "30m", "90s").
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('h') {
        (n, 3600)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1)
    } else {
        // Default to seconds
        (s, 1)
    };

    let num: u64 = num_str.parse().ok()?;
    Some(Duration::from_secs(num * multiplier))
}
