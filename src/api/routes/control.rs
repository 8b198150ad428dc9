//! Control command endpoint

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::{error::ApiResult, state::ApiState};

#[derive(Debug, Deserialize)]
pub struct ControlRequest {
    pub command: String,
}

/// POST /api/control
///
/// Validates the command against the whitelist and publishes it on the
/// control topic. Rejections return 400 with the allowed set enumerated.
pub async fn issue_command(
    State(state): State<ApiState>,
    Json(request): Json<ControlRequest>,
) -> ApiResult<Json<Value>> {
    let command = state.publisher.issue(&request.command).await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Control command '{command}' sent successfully"),
        "command": command.as_str(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}
