//! Liveness and readiness probe.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use storefront_db::repositories::ThemeRepo;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when the database answers, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Seeded theme presets; new stores copy the first one.
    pub presets: Option<i64>,
}

/// GET /health
///
/// 200 when the database is reachable, 503 otherwise. A zero preset count
/// means migrations have not seeded the templates yet.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let presets = match storefront_db::health_check(&state.pool).await {
        Ok(()) => ThemeRepo::count_presets(&state.pool).await.ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            None
        }
    };
    let db_healthy = presets.is_some();

    let status = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let body = HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        presets,
    };
    (status, Json(body))
}

/// Health routes, mounted at the root rather than under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
