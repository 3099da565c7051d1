use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kotoba_core::{LookupError, StoreError};
use serde_json::json;

pub const QUERY_REQUIRED: &str = "Query is required";
pub const NOT_FOUND: &str = "找不到單字";
pub const QUOTA_EXCEEDED: &str = "找不到單字 (且 API 額度已滿，無法翻譯)";

/// Error body `{"error": ...}` with a matching status
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    TooManyRequests(String),
    Internal(String),
}

impl ApiError {
    fn parts(self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::TooManyRequests(msg) => (StatusCode::TOO_MANY_REQUESTS, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.parts();
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<LookupError> for ApiError {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::EmptyQuery => ApiError::BadRequest(QUERY_REQUIRED.to_string()),
            LookupError::NotFound => ApiError::NotFound(NOT_FOUND.to_string()),
            LookupError::QuotaExceeded => ApiError::TooManyRequests(QUOTA_EXCEEDED.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        tracing::error!("Storage error: {}", e);
        ApiError::Internal(e.to_string())
    }
}
