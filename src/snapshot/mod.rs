//! In-memory TTL caches for the served payloads.
//!
//! One cache per endpoint. The slot's async mutex is held across a
//! refresh, so concurrent requests for the same snapshot collapse into a
//! single upstream cycle: the first caller refreshes, the rest wake up to
//! a fresh entry. A refresh that dies on rate-limit exhaustion falls back
//! to the previous payload — whatever its age — instead of failing the
//! request; every other failure propagates.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::models::CacheTag;
use crate::pipeline::RefreshError;
use crate::riot::RiotError;

struct Slot<T> {
    stored_at: DateTime<Utc>,
    payload: T,
}

pub struct SnapshotCache<T> {
    ttl: Duration,
    slot: Mutex<Option<Slot<T>>>,
}

impl<T: Clone> SnapshotCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    fn is_fresh(&self, slot: &Slot<T>) -> bool {
        let age = Utc::now().signed_duration_since(slot.stored_at);
        age.num_milliseconds() < self.ttl.as_millis() as i64
    }

    /// Serve the cached payload while fresh, otherwise refresh.
    ///
    /// Returns the payload and how it relates to the cache: `Hit` for a
    /// TTL hit, `Stale` for a rate-limit fallback, `None` for a fresh
    /// compute.
    pub async fn get_or_refresh<F, Fut>(
        &self,
        refresh: F,
    ) -> Result<(T, Option<CacheTag>), RefreshError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, RefreshError>>,
    {
        let mut slot = self.slot.lock().await;

        if let Some(entry) = slot.as_ref() {
            if self.is_fresh(entry) {
                debug!("snapshot served from cache");
                return Ok((entry.payload.clone(), Some(CacheTag::Hit)));
            }
        }

        match refresh().await {
            Ok(payload) => {
                *slot = Some(Slot {
                    stored_at: Utc::now(),
                    payload: payload.clone(),
                });
                Ok((payload, None))
            }
            Err(err) => {
                if matches!(err, RefreshError::Upstream(RiotError::RateLimited { .. })) {
                    if let Some(entry) = slot.as_ref() {
                        warn!("refresh rate limited, serving stale snapshot");
                        return Ok((entry.payload.clone(), Some(CacheTag::Stale)));
                    }
                }
                Err(err)
            }
        }
    }

    /// Drop the cached entry; the next request performs a full refresh.
    pub async fn clear(&self) {
        *self.slot.lock().await = None;
    }

    /// Plant an entry with a chosen timestamp.
    #[cfg(test)]
    pub(crate) async fn prime(&self, stored_at: DateTime<Utc>, payload: T) {
        *self.slot.lock().await = Some(Slot { stored_at, payload });
    }
}
