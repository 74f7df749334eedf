use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::api::state::AppState;

#[derive(Debug, Serialize)]
pub struct RefreshAck {
    pub ok: bool,
}

/// GET /api/refresh — unconditionally clear both snapshot caches.
///
/// The next request on either endpoint performs a full refresh cycle.
/// The persistent identity and match stores are untouched.
pub async fn refresh(State(state): State<AppState>) -> Json<RefreshAck> {
    state.stats_cache.clear().await;
    state.standings_cache.clear().await;
    info!("snapshot caches cleared");
    Json(RefreshAck { ok: true })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    use crate::api::build_router;
    use crate::api::routes::testing::{get_json, seeded_mock, test_state};

    #[tokio::test]
    async fn test_refresh_acknowledges() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(&tmp, seeded_mock(), Duration::from_secs(60));

        let (status, body) = get_json(build_router(state), "/api/refresh").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], Value::Bool(true));
    }

    #[tokio::test]
    async fn test_refresh_forces_full_recompute() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(&tmp, seeded_mock(), Duration::from_secs(60));

        let (_, first) = get_json(build_router(state.clone()), "/api/stats").await;
        let first_generated = first["generatedAt"].as_i64().unwrap();

        // Within the TTL the entry would normally be served as-is.
        let (_, hit) = get_json(build_router(state.clone()), "/api/stats").await;
        assert_eq!(hit["cached"], Value::Bool(true));

        get_json(build_router(state.clone()), "/api/refresh").await;
        tokio::time::sleep(Duration::from_millis(5)).await;

        let (_, after) = get_json(build_router(state.clone()), "/api/stats").await;
        assert!(after.get("cached").is_none());
        assert!(after["generatedAt"].as_i64().unwrap() > first_generated);

        // Both caches are cleared, not just the one being queried.
        let (_, _) = get_json(build_router(state.clone()), "/api/elo").await;
        let (_, elo_hit) = get_json(build_router(state.clone()), "/api/elo").await;
        assert_eq!(elo_hit["cached"], Value::Bool(true));
        get_json(build_router(state.clone()), "/api/refresh").await;
        let (_, elo_after) = get_json(build_router(state), "/api/elo").await;
        assert!(elo_after.get("cached").is_none());
    }
}
