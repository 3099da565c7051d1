use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};
use kotoba_types::Direction;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod assist;
pub mod flashcard;
pub mod heartbeat;
pub mod saved;
pub mod search;

/// `{"success": true, "data": ...}`
#[derive(Serialize)]
pub struct Ack<T> {
    pub success: bool,
    pub data: T,
}

impl<T> Ack<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Unknown or missing direction falls back to `default`
pub fn direction_or(raw: Option<&str>, default: Direction) -> Direction {
    match raw {
        Some("ja-zh") => Direction::JaZh,
        Some("zh-ja") => Direction::ZhJa,
        _ => default,
    }
}

/// Blank query parameters count as missing
pub fn non_blank(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty())
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/search", get(search::search))
        .route("/api/suggest", get(assist::suggest))
        .route("/api/grammar", get(assist::grammar))
        .route("/api/saved", get(saved::list))
        .route("/api/save", post(saved::save))
        .route("/api/saved/{word}", delete(saved::remove))
        .route("/api/flashcard/review", post(flashcard::review))
        .route("/api/heartbeat", get(heartbeat::heartbeat))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
