use axum::extract::State;
use axum::Json;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{SnapshotResponse, StatsPayload};

/// GET /api/stats — the performance snapshot.
///
/// Serves the cached payload while its TTL holds; otherwise runs a full
/// refresh cycle over the roster. A rate-limited refresh falls back to
/// the previous payload, tagged `"stale"`.
pub async fn stats(
    State(state): State<AppState>,
) -> Result<Json<SnapshotResponse<StatsPayload>>, ApiError> {
    let pipeline = state.pipeline.clone();
    let (payload, cached) = state
        .stats_cache
        .get_or_refresh(|| async move { pipeline.stats_snapshot().await })
        .await?;
    Ok(Json(SnapshotResponse { cached, payload }))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    use crate::api::build_router;
    use crate::api::routes::testing::{get_json, seeded_mock, test_state};

    #[tokio::test]
    async fn test_stats_endpoint_payload() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(&tmp, seeded_mock(), Duration::from_secs(60));

        let (status, body) = get_json(build_router(state), "/api/stats").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.get("cached").is_none());
        assert_eq!(body["samplePerPlayer"], json!(20));
        assert_eq!(body["queueId"], json!(420));
        assert!(body["generatedAt"].as_i64().unwrap() > 0);

        let players = body["players"].as_array().unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0]["id"], "a");
        assert_eq!(players[0]["games"], json!(3));
        assert_eq!(players[0]["kda"], json!(5.0));
        assert_eq!(players[0]["csMin"], json!(6.0));
        assert_eq!(players[1]["games"], json!(0));

        let kda_board = body["leaderboards"]["kda"].as_array().unwrap();
        assert_eq!(kda_board[0]["id"], "a");
        assert!(body["leaderboards"]["csMin"].is_array());
    }

    #[tokio::test]
    async fn test_second_call_within_ttl_is_cached() {
        let tmp = tempfile::tempdir().unwrap();
        let api = seeded_mock();
        let state = test_state(&tmp, api.clone(), Duration::from_secs(60));

        let (_, first) = get_json(build_router(state.clone()), "/api/stats").await;
        let (status, second) = get_json(build_router(state), "/api/stats").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["cached"], Value::Bool(true));
        assert_eq!(second["generatedAt"], first["generatedAt"]);
        assert_eq!(api.match_fetches(), 3);
    }

    #[tokio::test]
    async fn test_rate_limited_refresh_serves_stale() {
        let tmp = tempfile::tempdir().unwrap();
        let api = seeded_mock();
        // Zero TTL: every request re-runs the refresh cycle.
        let state = test_state(&tmp, api.clone(), Duration::from_millis(0));

        let (status, first) = get_json(build_router(state.clone()), "/api/stats").await;
        assert_eq!(status, StatusCode::OK);

        api.set_rate_limited(true);
        let (status, second) = get_json(build_router(state), "/api/stats").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["cached"], Value::String("stale".to_string()));
        assert_eq!(second["generatedAt"], first["generatedAt"]);
        assert_eq!(second["players"], first["players"]);
    }

    #[tokio::test]
    async fn test_rate_limited_without_prior_snapshot_is_503() {
        let tmp = tempfile::tempdir().unwrap();
        let api = seeded_mock();
        api.set_rate_limited(true);
        let state = test_state(&tmp, api, Duration::from_secs(60));

        let (status, body) = get_json(build_router(state), "/api/stats").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "RATE_LIMITED");
    }

    #[tokio::test]
    async fn test_upstream_failure_is_502() {
        let tmp = tempfile::tempdir().unwrap();
        // Empty mock: the first account lookup 404s.
        let api = std::sync::Arc::new(crate::riot::testing::MockApi::new());
        let state = test_state(&tmp, api, Duration::from_secs(60));

        let (status, body) = get_json(build_router(state), "/api/stats").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
    }
}
