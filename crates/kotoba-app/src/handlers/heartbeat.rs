use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatReply {
    status: &'static str,
    db_status: &'static str,
    db_mode: &'static str,
}

pub async fn heartbeat(State(state): State<Arc<AppState>>) -> Json<HeartbeatReply> {
    state.heartbeat.beat();

    let status = state.store.status();
    Json(HeartbeatReply {
        status: "alive",
        db_status: status.link.as_str(),
        db_mode: status.mode.as_str(),
    })
}
