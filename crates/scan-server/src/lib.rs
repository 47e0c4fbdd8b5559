//! # scan-server
//!
//! axum service for the stack scanner.
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /api/load` | [`handlers::load`] |
//! | `POST /api` | [`handlers::filter`] |
//! | `GET /img/*` | stack directory |
//! | anything else | client bundle |
//!
//! Errors are answered as `{ "message": ... }` with status 400 for invalid
//! input and 500 for everything else.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use std::io;
use std::path::Path;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use config::ServerConfig;
pub use error::ApiError;
pub use state::AppState;

/// Builds the application router.
pub fn router(state: AppState, client_dir: impl AsRef<Path>) -> Router {
    let images = ServeDir::new(state.catalog.root());
    Router::new()
        .route("/api/load", get(handlers::load))
        .route("/api", post(handlers::filter))
        .nest_service("/img", images)
        .fallback_service(ServeDir::new(client_dir.as_ref()))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Binds `config.bind_addr()` and serves until Ctrl-C.
pub async fn serve(config: ServerConfig) -> io::Result<()> {
    let state = AppState::new(&config.images, config.cache_bytes);
    match state.catalog.list() {
        Ok(files) if files.is_empty() => warn!(images = %config.images.display(), "no .tif stacks found"),
        Ok(files) => info!(images = %config.images.display(), stacks = files.len(), "serving stacks"),
        Err(e) => warn!(images = %config.images.display(), error = %e, "cannot list stacks"),
    }
    if state.cache.is_disabled() {
        info!("decode cache disabled");
    } else {
        info!(budget_mb = state.cache.max_bytes() / (1024 * 1024), "decode cache enabled");
    }

    let app = router(state, &config.client_dir);
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
