//! REST API over a live device registry.
//!
//! Routes:
//! - `GET /devices`, `POST /devices`
//! - `POST /devices/{id}/start`, `/stop`, `/toggle`
//! - `DELETE /devices/{id}`
//! - `POST /undo`
//! - `GET /summary?rate=`
//! - `GET /export`

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};
use tracing::info;

use crate::clock::Clock;
use crate::cost::Tariff;
use crate::registry::SharedRegistry;

/// State shared across all request handlers.
///
/// Every handler reads the time from `clock` and touches the registry only
/// through the `SharedRegistry` lock.
pub struct AppState {
    /// Tracked devices and undo log.
    pub registry: SharedRegistry,
    /// Time source for device timers.
    pub clock: Arc<dyn Clock>,
    /// Tariff used when a summary request gives no `rate`.
    pub tariff: Tariff,
}

impl AppState {
    pub fn new(registry: SharedRegistry, clock: Arc<dyn Clock>, tariff: Tariff) -> Self {
        Self {
            registry,
            clock,
            tariff,
        }
    }
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/devices",
            get(handlers::list_devices).post(handlers::add_device),
        )
        .route("/devices/{id}", delete(handlers::remove_device))
        .route("/devices/{id}/start", post(handlers::start_device))
        .route("/devices/{id}/stop", post(handlers::stop_device))
        .route("/devices/{id}/toggle", post(handlers::toggle_device))
        .route("/undo", post(handlers::undo))
        .route("/summary", get(handlers::summary))
        .route("/export", get(handlers::export))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `addr` - Socket address to bind to
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    eprintln!("API server listening on http://{addr}");
    axum::serve(listener, app).await
}
