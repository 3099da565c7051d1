use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use kotoba_types::{Direction, WordEntry};
use serde::Deserialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::{ApiError, QUERY_REQUIRED};
use crate::handlers::{direction_or, non_blank};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SearchParams {
    q: Option<String>,
    direction: Option<String>,
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<WordEntry>>, ApiError> {
    let Some(query) = non_blank(params.q) else {
        return Err(ApiError::BadRequest(QUERY_REQUIRED.to_string()));
    };
    let direction = direction_or(params.direction.as_deref(), Direction::JaZh);

    let span = tracing::info_span!("search", request_id = %Uuid::new_v4(), %direction);
    async move {
        let results = state
            .processor
            .lookup(&query, direction, state.store.as_ref())
            .await
            .inspect_err(|e| tracing::info!("'{}': {}", query, e))?;

        tracing::info!("'{}': {} result(s)", query, results.len());
        Ok::<_, ApiError>(Json(results))
    }
    .instrument(span)
    .await
}
