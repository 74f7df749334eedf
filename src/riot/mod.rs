//! Riot API client.
//!
//! All upstream traffic goes through [`RiotClient`]: a reqwest wrapper that
//! installs the credential header once, paces every call through a minimum
//! inter-request gap, and retries rate-limited responses with a bounded
//! backoff. Callers depend on the [`LeagueApi`] trait so tests can swap in
//! a scripted upstream.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

use crate::config::RiotConfig;
use crate::models::{AccountDto, LeagueEntryDto};

/// Shortest wait honored after a 429, regardless of the Retry-After header.
const RETRY_WAIT_FLOOR: Duration = Duration::from_millis(1000);

/// Longest wait honored after a 429.
const RETRY_WAIT_CEILING: Duration = Duration::from_millis(3500);

/// Errors surfaced by upstream calls.
#[derive(Debug, Error)]
pub enum RiotError {
    /// Non-2xx, non-429 response. Never retried.
    #[error("upstream returned {status} for {context}: {body}")]
    Status {
        status: u16,
        context: String,
        body: String,
    },

    /// Retries exhausted against 429 responses. Callers may fall back to
    /// stale data on this variant specifically.
    #[error("rate limited by upstream after {attempts} attempts for {context}")]
    RateLimited { context: String, attempts: u32 },

    /// Body did not parse as the expected JSON shape.
    #[error("malformed response for {context}: {source}")]
    Malformed {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("credential is not a valid header value")]
    InvalidCredential,
}

/// Parameters of a match-id discovery query.
///
/// Discovery is a pure upstream query: the most-recent-N window moves over
/// time, so results are never cached.
#[derive(Debug, Clone)]
pub struct MatchIdsQuery {
    pub queue: u32,
    pub count: u32,
    /// Unix-seconds lower bound on game start, if configured.
    pub start_time: Option<u64>,
}

/// The upstream surface the pipeline consumes.
#[async_trait]
pub trait LeagueApi: Send + Sync {
    /// account-v1: resolve a Riot ID to its PUUID.
    async fn account_by_riot_id(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> Result<AccountDto, RiotError>;

    /// match-v5: most-recent match ids for a player, filtered by queue.
    async fn match_ids_by_puuid(
        &self,
        puuid: &str,
        query: &MatchIdsQuery,
    ) -> Result<Vec<String>, RiotError>;

    /// match-v5: one match, as the raw JSON value (persisted untouched).
    async fn match_by_id(&self, match_id: &str) -> Result<serde_json::Value, RiotError>;

    /// league-v4: ranked entries for a player, one per queue.
    async fn league_entries_by_puuid(
        &self,
        puuid: &str,
    ) -> Result<Vec<LeagueEntryDto>, RiotError>;
}

/// Minimum-gap gate that every upstream call passes through.
///
/// Holding the lock across the sleep serializes concurrent callers, so the
/// gap holds across the whole process, not per caller.
pub struct Pacer {
    gap: Duration,
    last: Mutex<Option<Instant>>,
}

impl Pacer {
    pub fn new(gap: Duration) -> Self {
        Self {
            gap,
            last: Mutex::new(None),
        }
    }

    /// Wait until at least `gap` has passed since the previous call.
    pub async fn wait(&self) {
        let mut last = self.last.lock().await;
        if let Some(prev) = *last {
            let ready = prev + self.gap;
            let now = Instant::now();
            if ready > now {
                tokio::time::sleep(ready - now).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Rate-limited Riot API client.
pub struct RiotClient {
    client: Client,
    /// Base for account-v1 and match-v5 (e.g. `europe`).
    regional: Url,
    /// Base for league-v4 (e.g. `euw1`).
    platform: Url,
    pacer: Pacer,
    max_retries: u32,
}

impl RiotClient {
    /// Create a client for the configured routing hosts.
    pub fn new(config: &RiotConfig, api_key: &str) -> Result<Self, RiotError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Riot-Token",
            HeaderValue::from_str(api_key).map_err(|_| RiotError::InvalidCredential)?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()?;

        let regional = Self::host_url(&config.regional)?;
        let platform = Self::host_url(&config.platform)?;

        Ok(Self {
            client,
            regional,
            platform,
            pacer: Pacer::new(Duration::from_millis(config.request_gap_ms)),
            max_retries: config.max_retries,
        })
    }

    fn host_url(subdomain: &str) -> Result<Url, RiotError> {
        Url::parse(&format!("https://{}.api.riotgames.com", subdomain))
            .map_err(|e| RiotError::InvalidUrl(e.to_string()))
    }

    /// Append path segments to a base URL, percent-encoding each segment.
    fn endpoint(base: &Url, segments: &[&str]) -> Url {
        let mut url = base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.extend(segments);
        }
        url
    }

    /// Issue a GET and parse the JSON body, retrying 429s with a clamped
    /// Retry-After wait up to `max_retries` times.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, RiotError> {
        for attempt in 0..=self.max_retries {
            self.pacer.wait().await;

            debug!("GET {} (attempt {})", url, attempt + 1);
            let response = self.client.get(url.clone()).send().await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(1);

                let wait =
                    Duration::from_secs(retry_after).clamp(RETRY_WAIT_FLOOR, RETRY_WAIT_CEILING);
                warn!("429 from {}, waiting {}ms", url, wait.as_millis());
                tokio::time::sleep(wait).await;
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(RiotError::Status {
                    status: status.as_u16(),
                    context: url.to_string(),
                    body,
                });
            }

            let body = response.text().await?;
            return serde_json::from_str(&body).map_err(|source| RiotError::Malformed {
                context: url.to_string(),
                source,
            });
        }

        Err(RiotError::RateLimited {
            context: url.to_string(),
            attempts: self.max_retries + 1,
        })
    }

    #[cfg(test)]
    fn with_base_url(base: Url, max_retries: u32) -> Self {
        Self {
            client: Client::new(),
            regional: base.clone(),
            platform: base,
            pacer: Pacer::new(Duration::from_millis(0)),
            max_retries,
        }
    }
}

#[async_trait]
impl LeagueApi for RiotClient {
    async fn account_by_riot_id(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> Result<AccountDto, RiotError> {
        let url = Self::endpoint(
            &self.regional,
            &[
                "riot",
                "account",
                "v1",
                "accounts",
                "by-riot-id",
                game_name,
                tag_line,
            ],
        );
        self.get_json(url).await
    }

    async fn match_ids_by_puuid(
        &self,
        puuid: &str,
        query: &MatchIdsQuery,
    ) -> Result<Vec<String>, RiotError> {
        let mut url = Self::endpoint(
            &self.regional,
            &["lol", "match", "v5", "matches", "by-puuid", puuid, "ids"],
        );
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("queue", &query.queue.to_string());
            pairs.append_pair("start", "0");
            pairs.append_pair("count", &query.count.to_string());
            if let Some(start_time) = query.start_time {
                pairs.append_pair("startTime", &start_time.to_string());
            }
        }
        self.get_json(url).await
    }

    async fn match_by_id(&self, match_id: &str) -> Result<serde_json::Value, RiotError> {
        let url = Self::endpoint(&self.regional, &["lol", "match", "v5", "matches", match_id]);
        self.get_json(url).await
    }

    async fn league_entries_by_puuid(
        &self,
        puuid: &str,
    ) -> Result<Vec<LeagueEntryDto>, RiotError> {
        let url = Self::endpoint(
            &self.platform,
            &["lol", "league", "v4", "entries", "by-puuid", puuid],
        );
        self.get_json(url).await
    }
}

#[cfg(test)]
pub mod testing {
    //! Scripted in-memory upstream for pipeline and endpoint tests.

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::Value;

    use super::{LeagueApi, MatchIdsQuery, RiotError};
    use crate::models::{AccountDto, LeagueEntryDto};

    /// Canned upstream responses with call counting and a switchable
    /// everything-is-rate-limited failure mode.
    #[derive(Default)]
    pub struct MockApi {
        accounts: Mutex<HashMap<String, String>>,
        match_ids: Mutex<HashMap<String, Vec<String>>>,
        matches: Mutex<HashMap<String, Value>>,
        leagues: Mutex<HashMap<String, Vec<LeagueEntryDto>>>,
        match_calls: AtomicU32,
        rate_limited: AtomicBool,
    }

    impl MockApi {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_account(&self, game_name: &str, tag_line: &str, puuid: &str) {
            self.accounts
                .lock()
                .unwrap()
                .insert(format!("{}#{}", game_name, tag_line), puuid.to_string());
        }

        pub fn add_match_ids(&self, puuid: &str, ids: &[&str]) {
            self.match_ids.lock().unwrap().insert(
                puuid.to_string(),
                ids.iter().map(|s| s.to_string()).collect(),
            );
        }

        pub fn add_match(&self, match_id: &str, raw: Value) {
            self.matches
                .lock()
                .unwrap()
                .insert(match_id.to_string(), raw);
        }

        pub fn add_league(&self, puuid: &str, entries: Vec<LeagueEntryDto>) {
            self.leagues
                .lock()
                .unwrap()
                .insert(puuid.to_string(), entries);
        }

        /// When set, every call fails with `RateLimited`.
        pub fn set_rate_limited(&self, limited: bool) {
            self.rate_limited.store(limited, Ordering::SeqCst);
        }

        /// How many match-detail fetches reached the upstream.
        pub fn match_fetches(&self) -> u32 {
            self.match_calls.load(Ordering::SeqCst)
        }

        fn check_rate_limit(&self, context: &str) -> Result<(), RiotError> {
            if self.rate_limited.load(Ordering::SeqCst) {
                return Err(RiotError::RateLimited {
                    context: context.to_string(),
                    attempts: 4,
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl LeagueApi for MockApi {
        async fn account_by_riot_id(
            &self,
            game_name: &str,
            tag_line: &str,
        ) -> Result<AccountDto, RiotError> {
            let key = format!("{}#{}", game_name, tag_line);
            self.check_rate_limit(&key)?;
            let accounts = self.accounts.lock().unwrap();
            match accounts.get(&key) {
                Some(puuid) => Ok(AccountDto {
                    puuid: puuid.clone(),
                    game_name: game_name.to_string(),
                    tag_line: tag_line.to_string(),
                }),
                None => Err(RiotError::Status {
                    status: 404,
                    context: key.clone(),
                    body: "account not found".to_string(),
                }),
            }
        }

        async fn match_ids_by_puuid(
            &self,
            puuid: &str,
            _query: &MatchIdsQuery,
        ) -> Result<Vec<String>, RiotError> {
            self.check_rate_limit(puuid)?;
            Ok(self
                .match_ids
                .lock()
                .unwrap()
                .get(puuid)
                .cloned()
                .unwrap_or_default())
        }

        async fn match_by_id(&self, match_id: &str) -> Result<Value, RiotError> {
            self.check_rate_limit(match_id)?;
            self.match_calls.fetch_add(1, Ordering::SeqCst);
            let matches = self.matches.lock().unwrap();
            match matches.get(match_id) {
                Some(raw) => Ok(raw.clone()),
                None => Err(RiotError::Status {
                    status: 404,
                    context: match_id.to_string(),
                    body: "match not found".to_string(),
                }),
            }
        }

        async fn league_entries_by_puuid(
            &self,
            puuid: &str,
        ) -> Result<Vec<LeagueEntryDto>, RiotError> {
            self.check_rate_limit(puuid)?;
            Ok(self
                .leagues
                .lock()
                .unwrap()
                .get(puuid)
                .cloned()
                .unwrap_or_default())
        }
    }
}
