// ABOUTME: Liveness endpoint for the ASB API
// ABOUTME: Reports service name, version, timestamp and whether the draft database answers

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

use super::db::DbState;

pub async fn health_check(State(db): State<DbState>) -> (StatusCode, Json<Value>) {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let database_ok = match sqlx::query("SELECT 1").execute(&db.pool).await {
        Ok(_) => true,
        Err(e) => {
            warn!("Health check database query failed: {}", e);
            false
        }
    };

    let (status, label) = if database_ok {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(json!({
            "status": label,
            "database": if database_ok { "ok" } else { "unavailable" },
            "timestamp": timestamp,
            "version": env!("CARGO_PKG_VERSION"),
            "service": "asb-api"
        })),
    )
}
