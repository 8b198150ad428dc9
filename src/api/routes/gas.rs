//! Latest-reading endpoint

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::api::state::ApiState;

/// GET /api/gas/latest
///
/// Returns the current reading snapshot
pub async fn latest_reading(State(state): State<ApiState>) -> Json<Value> {
    let reading = state.reading.snapshot().await;

    Json(json!({
        "success": true,
        "data": reading,
    }))
}
