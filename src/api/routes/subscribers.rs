//! Subscriber lifecycle endpoints

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::warn;

use crate::api::{error::ApiResult, state::ApiState};
use crate::notify::Notification;

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
}

/// GET /api/subscribers
pub async fn list_subscribers(State(state): State<ApiState>) -> ApiResult<Json<Value>> {
    let subscribers = state.directory.list_all().await?;

    Ok(Json(json!({
        "success": true,
        "data": subscribers,
    })))
}

/// POST /api/subscribers
///
/// Adds a subscriber and fires a best-effort welcome notification. A failed
/// welcome send must not fail the subscription.
pub async fn add_subscriber(
    State(state): State<ApiState>,
    Json(request): Json<SubscribeRequest>,
) -> ApiResult<Json<Value>> {
    let subscriber = state.directory.add(&request.email).await?;

    if let Some(sender) = &state.sender {
        let sender = sender.clone();
        let email = subscriber.email.clone();

        tokio::spawn(async move {
            if let Err(e) = sender.send(&email, &Notification::welcome()).await {
                warn!("failed to send welcome notification to {email}: {e}");
            }
        });
    }

    Ok(Json(json!({
        "success": true,
        "message": "Subscriber added successfully",
        "data": subscriber,
    })))
}

/// DELETE /api/subscribers/{email}
pub async fn remove_subscriber(
    State(state): State<ApiState>,
    Path(email): Path<String>,
) -> ApiResult<Json<Value>> {
    state.directory.remove(&email).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Subscriber removed successfully",
    })))
}
