//! REST API for the hub
//!
//! This module provides the HTTP surface the dashboard and operators use.
//! Routing stays thin: every handler delegates straight into the core
//! (reading store, command publisher, subscriber directory).
//!
//! ## Endpoints
//!
//! - `GET /api/health` - Health check incl. broker connection state
//! - `GET /api/gas/latest` - Current reading snapshot
//! - `POST /api/control` - Publish a whitelisted control command
//! - `GET /api/subscribers` - List subscribers
//! - `POST /api/subscribers` - Add a subscriber
//! - `DELETE /api/subscribers/{email}` - Remove a subscriber

#[cfg(feature = "api")]
pub mod error;
#[cfg(feature = "api")]
pub mod routes;
#[cfg(feature = "api")]
pub mod state;

#[cfg(feature = "api")]
pub use error::{ApiError, ApiResult};
#[cfg(feature = "api")]
pub use state::ApiState;

use std::net::SocketAddr;

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind address (e.g., "0.0.0.0:5000")
    pub bind_addr: SocketAddr,

    /// Enable CORS for the dashboard
    pub enable_cors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".parse().unwrap(),
            enable_cors: true,
        }
    }
}

/// Spawn the API server
///
/// This starts an Axum HTTP server in a background task.
/// Returns the server's local address.
#[cfg(feature = "api")]
pub async fn spawn_api_server(config: ApiConfig, state: ApiState) -> anyhow::Result<SocketAddr> {
    use axum::{
        Router,
        routing::{delete, get, post},
    };
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::trace::TraceLayer;
    use tracing::info;

    info!("starting API server on {}", config.bind_addr);

    let mut app = Router::new()
        .route("/api/health", get(routes::health::health_check))
        .route("/api/gas/latest", get(routes::gas::latest_reading))
        .route("/api/control", post(routes::control::issue_command))
        .route(
            "/api/subscribers",
            get(routes::subscribers::list_subscribers).post(routes::subscribers::add_subscriber),
        )
        .route(
            "/api/subscribers/:email",
            delete(routes::subscribers::remove_subscriber),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let addr = listener.local_addr()?;

    info!("API server listening on {}", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("API server error: {}", e);
        }
    });

    Ok(addr)
}
