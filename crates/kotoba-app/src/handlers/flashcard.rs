use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use kotoba_types::{ReviewOutcome, SavedWord};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::handlers::{Ack, non_blank};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ReviewRequest {
    word: Option<String>,
    result: Option<Value>,
    reading: Option<String>,
}

/// Falsy values count as missing; anything but "correct" is incorrect
fn outcome_of(result: Option<Value>) -> Option<ReviewOutcome> {
    match result? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) if s == "correct" => Some(ReviewOutcome::Correct),
        _ => Some(ReviewOutcome::Incorrect),
    }
}

pub async fn review(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<Ack<Option<SavedWord>>>, ApiError> {
    let word = non_blank(request.word);
    let (Some(word), Some(outcome)) = (word, outcome_of(request.result)) else {
        return Err(ApiError::BadRequest("Missing word or result".to_string()));
    };
    let reading = non_blank(request.reading);

    let updated = state
        .store
        .review(&word, reading.as_deref(), outcome, Utc::now())
        .await?;

    if updated.is_none() {
        tracing::debug!("No saved record for '{}' to review", word);
    }
    Ok(Json(Ack::ok(updated)))
}
