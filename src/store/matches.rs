//! Content-addressed persistent cache of immutable match records.
//!
//! One JSON file per match id, written once on first fetch. Match records
//! are historical facts: a hit never goes back to the network, and nothing
//! is ever evicted (the finite roster and sample sizes bound the storage).

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use super::{CacheConfig, StoreError};
use crate::models::MatchRecord;
use crate::pipeline::RefreshError;
use crate::riot::{LeagueApi, RiotError};

pub struct MatchStore {
    dir: PathBuf,
}

impl MatchStore {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            dir: config.match_dir(),
        }
    }

    fn path_for(&self, match_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", match_id))
    }

    /// Whether a match is already cached.
    pub fn contains(&self, match_id: &str) -> bool {
        self.path_for(match_id).exists()
    }

    /// Return the cached record, fetching and persisting it on a miss.
    ///
    /// The raw upstream JSON is written untouched; the typed view is
    /// parsed per read. A cached file that no longer parses is a fatal
    /// `Corrupt` error — re-fetching would mask a persistence bug.
    pub async fn get(
        &self,
        api: &dyn LeagueApi,
        match_id: &str,
    ) -> Result<MatchRecord, RefreshError> {
        let path = self.path_for(match_id);

        if path.exists() {
            let text = fs::read_to_string(&path).map_err(StoreError::from)?;
            let record = serde_json::from_str(&text)
                .map_err(|source| StoreError::Corrupt { path, source })?;
            return Ok(record);
        }

        let raw = api.match_by_id(match_id).await?;
        let record: MatchRecord =
            serde_json::from_value(raw.clone()).map_err(|source| RiotError::Malformed {
                context: match_id.to_string(),
                source,
            })?;

        fs::create_dir_all(&self.dir).map_err(StoreError::from)?;
        let text = serde_json::to_string(&raw).map_err(StoreError::from)?;
        fs::write(&path, text).map_err(StoreError::from)?;
        debug!("cached match {}", match_id);

        Ok(record)
    }
}
