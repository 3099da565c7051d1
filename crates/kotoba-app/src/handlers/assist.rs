use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use kotoba_types::{Direction, GrammarPoint, Suggestion};
use serde::Deserialize;

use crate::error::{ApiError, QUERY_REQUIRED};
use crate::handlers::{direction_or, non_blank};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SuggestParams {
    q: Option<String>,
    direction: Option<String>,
}

#[derive(Deserialize)]
pub struct GrammarParams {
    q: Option<String>,
}

/// Related words; any failure is an empty list
pub async fn suggest(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SuggestParams>,
) -> Json<Vec<Suggestion>> {
    let (Some(query), Some(tutor)) = (non_blank(params.q), state.tutor()) else {
        return Json(Vec::new());
    };
    let direction = direction_or(params.direction.as_deref(), Direction::ZhJa);

    match tutor.suggest(query.trim(), direction).await {
        Ok(suggestions) => Json(suggestions),
        Err(e) => {
            tracing::error!("Suggestion error: {}", e);
            Json(Vec::new())
        }
    }
}

pub async fn grammar(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GrammarParams>,
) -> Result<Json<GrammarPoint>, ApiError> {
    let Some(pattern) = non_blank(params.q) else {
        return Err(ApiError::BadRequest(QUERY_REQUIRED.to_string()));
    };
    let Some(tutor) = state.tutor() else {
        return Err(ApiError::Internal("API Key missing".to_string()));
    };

    tutor
        .explain_grammar(pattern.trim())
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Grammar generation error: {}", e);
            ApiError::Internal("Failed to generate grammar explanation".to_string())
        })
}
