//! Riot-ID-to-PUUID resolution with a never-expiring on-disk cache.
//!
//! Identities are immutable once resolved, so entries are written once and
//! never invalidated. The whole map lives in one JSON file.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{CacheConfig, StoreError};
use crate::pipeline::RefreshError;
use crate::riot::LeagueApi;

fn composite_key(game_name: &str, tag_line: &str) -> String {
    format!("{}#{}", game_name, tag_line)
}

/// Persistent identity resolver.
#[derive(Debug)]
pub struct IdentityStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl IdentityStore {
    /// Load the identity file, or start empty if it does not exist yet.
    pub fn open(config: &CacheConfig) -> Result<Self, StoreError> {
        let path = config.identity_file();
        let entries = if path.exists() {
            let text = fs::read_to_string(&path)?;
            serde_json::from_str(&text).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Resolve a Riot ID to its PUUID, hitting the upstream only on a
    /// cache miss. The mapping is persisted before returning.
    pub async fn resolve(
        &self,
        api: &dyn LeagueApi,
        game_name: &str,
        tag_line: &str,
    ) -> Result<String, RefreshError> {
        let key = composite_key(game_name, tag_line);

        {
            let entries = self.entries.lock().await;
            if let Some(puuid) = entries.get(&key) {
                return Ok(puuid.clone());
            }
        }

        debug!("resolving identity for {}", key);
        let account = api.account_by_riot_id(game_name, tag_line).await?;

        let mut entries = self.entries.lock().await;
        entries.insert(key.clone(), account.puuid.clone());
        self.persist(&entries)?;
        info!("resolved {} ({} identities cached)", key, entries.len());

        Ok(account.puuid)
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Number of cached identities.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
