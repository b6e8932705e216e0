//! Health check handlers and response types.

use crate::state::{AppState, DbState};
use axum::extract::State;
use axum::{http::StatusCode, response::IntoResponse, Json};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Run an async check with timeout; returns status string "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(serde::Serialize)]
struct HealthCheckResponse {
    status: String,
    database: String,
    storage: String,
}

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness probe - critical dependencies (database).
pub async fn readiness_check(State(db): State<DbState>) -> impl IntoResponse {
    const TIMEOUT: Duration = Duration::from_secs(5);

    let database = run_check(
        TIMEOUT,
        async { sqlx::query("SELECT 1").execute(&db.pool).await.map(|_| ()) },
        "not_ready",
    )
    .await;

    let ready = database == "healthy";
    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status_code,
        Json(serde_json::json!({
            "status": if ready { "ready" } else { "not_ready" },
            "database": database,
        })),
    )
}

/// Full health check - database plus storage backend.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    const TIMEOUT: Duration = Duration::from_secs(5);

    let database = run_check(
        TIMEOUT,
        async {
            sqlx::query("SELECT 1")
                .execute(&state.db.pool)
                .await
                .map(|_| ())
        },
        "error",
    )
    .await;

    // exists() on a probe key exercises key validation and the backing directory
    let storage = run_check(
        TIMEOUT,
        async {
            state
                .media
                .storage
                .exists("media/.healthcheck")
                .await
                .map(|_| ())
        },
        "error",
    )
    .await;

    let healthy = database == "healthy" && storage == "healthy";
    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status_code,
        Json(HealthCheckResponse {
            status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
            database,
            storage,
        }),
    )
}
