//! # REST API for Runtime Status

use axum::{extract::State, Json};
use tracing::info;

use crate::storage::Connection;
use crate::AppState;
use shared::StatusResponse;

/// Report liveness and uptime
pub async fn get_status<C: Connection>(State(state): State<AppState<C>>) -> Json<StatusResponse> {
    info!("GET /api/status");
    Json(state.runtime.status())
}
