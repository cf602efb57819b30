//! # Pitch Server
//!
//! HTTP and WebSocket front end for the tactical board.
//!
//! - `POST /ai/analyze`, `POST /ai/analyze-tactical` - read a board snapshot
//! - `POST /api/chat` - talk to the coach
//! - `GET /ws` - relay marker moves and drawings between boards
//! - `GET /healthz` - liveness
//!
//! Anything else is served from the static directory.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod advisor;
pub mod coach;
pub mod config;
pub mod error;
pub mod handlers;
pub mod protocol;
pub mod relay;

use std::path::Path;
use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use pitch_core::templates::FormationLibrary;

use crate::advisor::Advisor;
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::relay::RelayHub;

/// Shared by every request.
#[derive(Clone)]
pub struct AppState {
    /// Templates used for counter-formations.
    pub library: Arc<FormationLibrary>,
    /// Completion client, `None` when no key is configured.
    pub advisor: Option<Arc<dyn Advisor>>,
    /// Event relay.
    pub hub: Arc<RelayHub>,
}

impl AppState {
    /// Assemble state for the router.
    pub fn new(
        library: FormationLibrary,
        advisor: Option<Arc<dyn Advisor>>,
        relay_capacity: usize,
    ) -> Self {
        Self {
            library: Arc::new(library),
            advisor,
            hub: Arc::new(RelayHub::new(relay_capacity)),
        }
    }
}

/// Build the application router.
///
/// With `static_dir` set, unmatched paths are served from that directory.
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/ai/analyze", post(handlers::analyze_board))
        .route("/ai/analyze-tactical", post(handlers::analyze_board))
        .route("/api/chat", post(handlers::chat))
        .route("/healthz", get(handlers::healthz))
        .route("/ws", get(relay::ws_handler));

    let app = match static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    };

    app.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// Load everything `config` names and open the listening socket.
pub async fn prepare(config: &ServerConfig) -> Result<(TcpListener, Router), ServerError> {
    let library = config.load_library()?;
    let advisor = config.advisor()?;
    if advisor.is_none() {
        tracing::warn!(
            "OPENROUTER_KEY is not set: coach remarks use the default line and chat is disabled"
        );
    }

    let state = AppState::new(library, advisor, config.relay_capacity);
    let app = build_router(state, Some(&config.static_dir));

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    Ok((listener, app))
}
