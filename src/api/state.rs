use std::sync::Arc;

use crate::models::{StandingsPayload, StatsPayload};
use crate::pipeline::Pipeline;
use crate::snapshot::SnapshotCache;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub stats_cache: Arc<SnapshotCache<StatsPayload>>,
    pub standings_cache: Arc<SnapshotCache<StandingsPayload>>,
}
