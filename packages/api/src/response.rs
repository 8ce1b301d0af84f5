// ABOUTME: Shared API response envelope
// ABOUTME: Every successful endpoint answers with { success, data, error }

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// 200 with the data wrapped in the envelope
pub fn ok<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, ResponseJson(ApiResponse::success(data))).into_response()
}

/// 201 with the data wrapped in the envelope
pub fn created<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, ResponseJson(ApiResponse::success(data))).into_response()
}
