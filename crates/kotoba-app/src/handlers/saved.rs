use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::Utc;
use kotoba_types::{SavedWord, SavedWordView, WordEntry};
use serde::Deserialize;

use crate::error::ApiError;
use crate::handlers::{Ack, non_blank};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct DeleteParams {
    reading: Option<String>,
}

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<SavedWordView>>, ApiError> {
    Ok(Json(state.store.saved_words().await?))
}

/// Idempotent on (word, reading)
pub async fn save(
    State(state): State<Arc<AppState>>,
    Json(entry): Json<WordEntry>,
) -> Result<Json<Ack<Vec<SavedWord>>>, ApiError> {
    tracing::info!("Saving '{}' ({})", entry.word, entry.reading);
    let saved = state
        .store
        .save_word(SavedWord::from_entry(entry, Utc::now()))
        .await?;
    Ok(Json(Ack::ok(saved)))
}

/// Without a reading every record of the word goes
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(word): Path<String>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<Ack<Vec<SavedWord>>>, ApiError> {
    let reading = non_blank(params.reading);
    tracing::info!("Deleting '{}' (reading: {:?})", word, reading);
    let saved = state.store.delete_saved(&word, reading.as_deref()).await?;
    Ok(Json(Ack::ok(saved)))
}
