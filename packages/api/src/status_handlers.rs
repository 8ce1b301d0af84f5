// ABOUTME: HTTP request handlers for the ASB status table
// ABOUTME: Lists the workflow statuses and resolves single codes (unknown codes fail closed)

use axum::{extract::Path, response::IntoResponse};
use tracing::info;

use asb_core::{status_table, StatusInfo};

use super::response::ok;

/// List all workflow statuses in code order
pub async fn list_statuses() -> impl IntoResponse {
    info!("Listing ASB statuses");
    ok(status_table())
}

/// Resolve a single status code. Codes outside the table answer with the
/// "Unknown" row rather than an error.
pub async fn get_status(Path(code): Path<i64>) -> impl IntoResponse {
    info!("Resolving ASB status: {}", code);
    ok(StatusInfo::for_code(code))
}
