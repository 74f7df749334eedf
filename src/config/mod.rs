//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::parse_duration;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// One tracked player. The roster is fixed at configuration time; the
/// pipeline never discovers or removes members at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterPlayer {
    /// Stable key used by the dashboard (avatar filenames, etc).
    pub key: String,

    /// Riot ID game name.
    pub game_name: String,

    /// Riot ID tag line.
    pub tag_line: String,

    /// Display name shown on the dashboard.
    pub display: String,
}

/// Riot API routing and client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiotConfig {
    /// Platform host for league-v4 (e.g. "euw1").
    #[serde(default = "default_platform")]
    pub platform: String,

    /// Regional host for account-v1 and match-v5 (e.g. "europe").
    #[serde(default = "default_regional")]
    pub regional: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Max retries against 429 responses
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Minimum gap between consecutive upstream calls
    #[serde(default = "default_request_gap")]
    pub request_gap_ms: u64,
}

fn default_platform() -> String {
    "euw1".to_string()
}

fn default_regional() -> String {
    "europe".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_request_gap() -> u64 {
    50
}

impl Default for RiotConfig {
    fn default() -> Self {
        Self {
            platform: default_platform(),
            regional: default_regional(),
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            request_gap_ms: default_request_gap(),
        }
    }
}

/// What to track and how much of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// 420 = SoloQ, 440 = Flex
    #[serde(default = "default_queue_id")]
    pub queue_id: u32,

    /// Recent-match sample for the performance snapshot
    #[serde(default = "default_sample_per_player")]
    pub sample_per_player: u32,

    /// Recent-match sample for top champions on the standings page
    #[serde(default = "default_top_champions_sample")]
    pub top_champions_sample: u32,

    /// Only count matches starting at this unix timestamp (seconds); 0
    /// disables the filter.
    #[serde(default)]
    pub match_from_unix: u64,

    /// TTL of the performance snapshot (e.g. "10m")
    #[serde(default = "default_stats_ttl")]
    pub stats_ttl: String,

    /// TTL of the standings snapshot (e.g. "2m")
    #[serde(default = "default_standings_ttl")]
    pub standings_ttl: String,
}

fn default_queue_id() -> u32 {
    420
}

fn default_sample_per_player() -> u32 {
    20
}

fn default_top_champions_sample() -> u32 {
    50
}

fn default_stats_ttl() -> String {
    "10m".to_string()
}

fn default_standings_ttl() -> String {
    "2m".to_string()
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            queue_id: default_queue_id(),
            sample_per_player: default_sample_per_player(),
            top_champions_sample: default_top_champions_sample(),
            match_from_unix: 0,
            stats_ttl: default_stats_ttl(),
            standings_ttl: default_standings_ttl(),
        }
    }
}

impl TrackingConfig {
    /// The league-v4 queue type string matching the tracked queue.
    pub fn league_queue_type(&self) -> &'static str {
        if self.queue_id == 440 {
            "RANKED_FLEX_SR"
        } else {
            "RANKED_SOLO_5x5"
        }
    }

    /// Lower bound for match discovery, if configured.
    pub fn start_time(&self) -> Option<u64> {
        (self.match_from_unix > 0).then_some(self.match_from_unix)
    }

    pub fn stats_ttl_duration(&self) -> Duration {
        parse_duration(&self.stats_ttl).unwrap_or_else(|| Duration::from_secs(600))
    }

    pub fn standings_ttl_duration(&self) -> Duration {
        parse_duration(&self.standings_ttl).unwrap_or_else(|| Duration::from_secs(120))
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5174
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub riot: RiotConfig,

    #[serde(default)]
    pub tracking: TrackingConfig,

    #[serde(default)]
    pub roster: Vec<RosterPlayer>,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./.cache")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            log_level: default_log_level(),
            server: ServerConfig::default(),
            riot: RiotConfig::default(),
            tracking: TrackingConfig::default(),
            roster: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.roster.is_empty() {
            return Err(ConfigError::ValidationError(
                "Roster must not be empty".to_string(),
            ));
        }

        let mut keys: Vec<&str> = self.roster.iter().map(|p| p.key.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        if keys.len() != self.roster.len() {
            return Err(ConfigError::ValidationError(
                "Roster keys must be unique".to_string(),
            ));
        }

        if self.tracking.sample_per_player == 0 || self.tracking.top_champions_sample == 0 {
            return Err(ConfigError::ValidationError(
                "Match samples must be greater than 0".to_string(),
            ));
        }

        if parse_duration(&self.tracking.stats_ttl).is_none()
            || parse_duration(&self.tracking.standings_ttl).is_none()
        {
            return Err(ConfigError::ValidationError(
                "Snapshot TTLs must be durations like \"10m\" or \"90s\"".to_string(),
            ));
        }

        if self.riot.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
