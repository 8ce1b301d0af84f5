// ABOUTME: Application error type returned by every handler
// ABOUTME: Maps validation, workflow and storage failures to HTTP status and machine-readable codes

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use asb_core::DraftError;
use asb_storage::StorageError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Wrap storage errors, including rejected draft transitions
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: ErrorDetail,
    request_id: String,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl AppError {
    fn to_status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Storage(storage_error) => match storage_error {
                StorageError::NotFound(_) => (StatusCode::NOT_FOUND, "DRAFT_NOT_FOUND"),
                StorageError::Draft(draft_error) => match draft_error {
                    DraftError::OutOfOrder { .. } => (StatusCode::CONFLICT, "STEP_OUT_OF_ORDER"),
                    DraftError::AlreadySubmitted => (StatusCode::CONFLICT, "DRAFT_SUBMITTED"),
                    DraftError::Incomplete(_) => (StatusCode::CONFLICT, "DRAFT_INCOMPLETE"),
                    DraftError::InvalidPayload(_) => (StatusCode::BAD_REQUEST, "INVALID_PAYLOAD"),
                    DraftError::UnknownStep(_) => (StatusCode::BAD_REQUEST, "UNKNOWN_STEP"),
                },
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            },
        }
    }

    /// Message safe to show to a client
    fn to_user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::NotFound(what) => format!("{} not found", what),
            AppError::Storage(StorageError::NotFound(id)) => format!("Draft {} not found", id),
            AppError::Storage(StorageError::Draft(draft_error)) => draft_error.to_string(),
            AppError::Storage(_) => "Data storage error".to_string(),
        }
    }
}

impl From<DraftError> for AppError {
    fn from(err: DraftError) -> Self {
        AppError::Storage(StorageError::Draft(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.to_status_and_code();
        let request_id = Uuid::new_v4().to_string();

        if status.is_server_error() {
            error!(request_id = %request_id, error = %self, "Request failed");
        } else {
            warn!(request_id = %request_id, code, error = %self, "Request rejected");
        }

        let body = ErrorResponse {
            success: false,
            error: ErrorDetail {
                code,
                message: self.to_user_message(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}
