//! Health check endpoint

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::api::state::ApiState;

/// GET /api/health
///
/// Returns hub health including the broker connection state
pub async fn health_check(State(state): State<ApiState>) -> Json<Value> {
    let connection = *state.connection.borrow();

    Json(json!({
        "status": "ok",
        "connection": connection.as_str(),
        "system_status": state.publisher.system_status().await.as_str(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
