//! Persistent caches.
//!
//! Two stores survive process restarts:
//! - the identity file, mapping `name#tag` composite keys to PUUIDs
//! - one immutable JSON file per cached match record
//!
//! Neither ever migrates: entries are either absent or fully valid, and a
//! stored entry that fails to parse is a hard error, not a re-fetch.

pub mod identity;
pub mod matches;

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the persistent stores. All are fatal to the current
/// refresh cycle; a broken cache is a correctness risk, not a transient
/// condition.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupt cache entry at {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Filesystem layout of the persistent caches.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub cache_dir: PathBuf,
}

impl CacheConfig {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn identity_file(&self) -> PathBuf {
        self.cache_dir.join("identities.json")
    }

    pub fn match_dir(&self) -> PathBuf {
        self.cache_dir.join("matches")
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./.cache"))
    }
}
