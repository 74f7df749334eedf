//! REST API endpoints.
//!
//! Axum-based HTTP API serving the two snapshot payloads and the
//! cache-clear operation to dashboard clients.

pub mod routes;
pub mod state;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::pipeline::RefreshError;
use crate::riot::RiotError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Upstream failure: {0}")]
    Upstream(String),

    #[error("Upstream rate limit exhausted: {0}")]
    RateLimited(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RefreshError> for ApiError {
    fn from(err: RefreshError) -> Self {
        match err {
            RefreshError::Upstream(upstream) => match upstream {
                RiotError::RateLimited { .. } => ApiError::RateLimited(upstream.to_string()),
                other => ApiError::Upstream(other.to_string()),
            },
            RefreshError::Store(store) => ApiError::Internal(store.to_string()),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            ApiError::RateLimited(_) => (StatusCode::SERVICE_UNAVAILABLE, "RATE_LIMITED"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/stats", get(routes::stats::stats))
        .route("/api/elo", get(routes::standings::standings))
        .route("/api/refresh", get(routes::refresh::refresh))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[test]
    fn test_rate_limited_maps_to_503() {
        let err: ApiError = RefreshError::Upstream(RiotError::RateLimited {
            context: "x".to_string(),
            attempts: 4,
        })
        .into();
        assert!(matches!(err, ApiError::RateLimited(_)));
    }

    #[test]
    fn test_upstream_status_maps_to_upstream() {
        let err: ApiError = RefreshError::Upstream(RiotError::Status {
            status: 403,
            context: "x".to_string(),
            body: "forbidden".to_string(),
        })
        .into();
        assert!(matches!(err, ApiError::Upstream(_)));
    }

    #[test]
    fn test_store_failure_maps_to_internal() {
        let err: ApiError = RefreshError::Store(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        )))
        .into();
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
