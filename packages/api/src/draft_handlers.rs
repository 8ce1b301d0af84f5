// ABOUTME: HTTP request handlers for the five-step proposal draft wizard
// ABOUTME: Creates, lists, fills in, submits and deletes drafts stored in SQLite

use axum::{
    extract::{Path, Query, State},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use asb_core::{label_for, Draft, WizardStep};

use super::db::DbState;
use super::error::AppError;
use super::pagination::{PaginatedResponse, PaginationParams};
use super::response::{created, ok};

/// A draft plus the workflow position it corresponds to
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftResponse {
    #[serde(flatten)]
    pub draft: Draft,
    pub status_code: i64,
    pub status_label: &'static str,
    pub progress_percent: u8,
}

impl From<Draft> for DraftResponse {
    fn from(draft: Draft) -> Self {
        let status_code = draft.status_code();
        Self {
            status_label: label_for(status_code),
            progress_percent: draft.progress_percent(),
            status_code,
            draft,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftFilter {
    pub opd_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDraftRequest {
    pub opd_id: i64,
}

/// List drafts, newest first
pub async fn list_drafts(
    State(db): State<DbState>,
    Query(filter): Query<DraftFilter>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Response, AppError> {
    info!(
        "Listing drafts (opd: {:?}, page: {})",
        filter.opd_id,
        pagination.page()
    );

    let (drafts, total) = db
        .draft_storage
        .list_drafts(
            filter.opd_id,
            Some(pagination.limit()),
            Some(pagination.offset()),
        )
        .await?;

    let drafts: Vec<DraftResponse> = drafts.into_iter().map(DraftResponse::from).collect();
    Ok(ok(PaginatedResponse::new(drafts, &pagination, total)))
}

/// Start a new draft for an OPD
pub async fn create_draft(
    State(db): State<DbState>,
    Json(request): Json<CreateDraftRequest>,
) -> Result<Response, AppError> {
    if request.opd_id <= 0 {
        return Err(AppError::Validation(
            "opdId must be a positive integer".to_string(),
        ));
    }

    info!("Creating draft for OPD {}", request.opd_id);
    let draft = db.draft_storage.create_draft(request.opd_id).await?;
    Ok(created(DraftResponse::from(draft)))
}

pub async fn get_draft(
    State(db): State<DbState>,
    Path(draft_id): Path<String>,
) -> Result<Response, AppError> {
    info!("Getting draft: {}", draft_id);
    let draft = db.draft_storage.get_draft(&draft_id).await?;
    Ok(ok(DraftResponse::from(draft)))
}

/// Fill in one wizard step. `step` is a step name or its status code.
pub async fn save_step(
    State(db): State<DbState>,
    Path((draft_id, step)): Path<(String, String)>,
    Json(payload): Json<Value>,
) -> Result<Response, AppError> {
    let step: WizardStep = step.parse()?;

    info!("Saving step {} of draft {}", step, draft_id);
    let draft = db.draft_storage.save_step(&draft_id, step, payload).await?;
    Ok(ok(DraftResponse::from(draft)))
}

/// Hand a complete draft over to verification
pub async fn submit_draft(
    State(db): State<DbState>,
    Path(draft_id): Path<String>,
) -> Result<Response, AppError> {
    info!("Submitting draft: {}", draft_id);
    let draft = db.draft_storage.submit_draft(&draft_id).await?;
    Ok(ok(DraftResponse::from(draft)))
}

pub async fn delete_draft(
    State(db): State<DbState>,
    Path(draft_id): Path<String>,
) -> Result<Response, AppError> {
    info!("Deleting draft: {}", draft_id);
    db.draft_storage.delete_draft(&draft_id).await?;
    Ok(ok(serde_json::json!({ "id": draft_id, "deleted": true })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_draft_response_flattens_draft() {
        let mut draft = Draft::new("draft-abc".to_string(), 4);
        draft
            .complete_step(WizardStep::GeneralDocuments, json!({ "namaAsb": "Gedung" }))
            .unwrap();

        let value = serde_json::to_value(DraftResponse::from(draft)).unwrap();
        assert_eq!(value["id"], "draft-abc");
        assert_eq!(value["opdId"], 4);
        assert_eq!(value["currentStep"], "building-area");
        assert_eq!(value["statusCode"], 2);
        assert_eq!(value["statusLabel"], label_for(2));
        assert_eq!(value["progressPercent"], 20);
    }
}
