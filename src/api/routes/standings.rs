use axum::extract::State;
use axum::Json;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{SnapshotResponse, StandingsPayload};

/// GET /api/elo — the standings snapshot.
///
/// Rank, LP, season win rate and top champions per roster member, sorted
/// descending by the composite rank score.
pub async fn standings(
    State(state): State<AppState>,
) -> Result<Json<SnapshotResponse<StandingsPayload>>, ApiError> {
    let pipeline = state.pipeline.clone();
    let (payload, cached) = state
        .standings_cache
        .get_or_refresh(|| async move { pipeline.standings_snapshot().await })
        .await?;
    Ok(Json(SnapshotResponse { cached, payload }))
}
