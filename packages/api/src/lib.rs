// ABOUTME: HTTP API layer for the ASB proposal workflow
// ABOUTME: Routes status lookups, proposal evaluation and the draft wizard

use axum::{
    http::Uri,
    routing::{get, post, put},
    Router,
};

pub mod db;
pub mod draft_handlers;
pub mod error;
pub mod health;
pub mod pagination;
pub mod proposal_handlers;
pub mod response;
pub mod status_handlers;

pub use db::DbState;
pub use error::AppError;

/// Creates the status table router
pub fn create_statuses_router() -> Router<DbState> {
    Router::new()
        .route("/", get(status_handlers::list_statuses))
        .route("/{code}", get(status_handlers::get_status))
}

/// Creates the proposal evaluation router
pub fn create_proposals_router() -> Router<DbState> {
    Router::new()
        .route("/evaluate", post(proposal_handlers::evaluate_proposal))
        .route("/summary", post(proposal_handlers::summarize_proposals))
        .route("/filter", post(proposal_handlers::filter_proposals))
}

/// Creates the draft wizard router
pub fn create_drafts_router() -> Router<DbState> {
    Router::new()
        .route(
            "/",
            get(draft_handlers::list_drafts).post(draft_handlers::create_draft),
        )
        .route(
            "/{id}",
            get(draft_handlers::get_draft).delete(draft_handlers::delete_draft),
        )
        .route("/{id}/steps/{step}", put(draft_handlers::save_step))
        .route("/{id}/submit", post(draft_handlers::submit_draft))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Route {}", uri.path()))
}

/// Full API router with its database state applied
pub fn create_router(state: DbState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_check))
        .nest("/api/statuses", create_statuses_router())
        .nest("/api/proposals", create_proposals_router())
        .nest("/api/drafts", create_drafts_router())
        .fallback(not_found)
        .with_state(state)
}
