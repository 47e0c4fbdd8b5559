//! Error to HTTP response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use scan_io::IoError;
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{error, warn};

/// Handler error.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request body.
    #[error("{0}")]
    BadRequest(String),

    /// Catalog, decode or validation failure.
    #[error(transparent)]
    Io(#[from] IoError),

    /// The blocking worker panicked or was cancelled.
    #[error("worker task failed: {0}")]
    Join(#[from] JoinError),
}

impl From<scan_core::Error> for ApiError {
    fn from(e: scan_core::Error) -> Self {
        Self::Io(IoError::Core(e))
    }
}

impl ApiError {
    /// Status code for this error: 400 for caller mistakes, 500 otherwise.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Io(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Io(_) | Self::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// `{ "message": ... }` error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }
        (status, Json(ErrorBody { message })).into_response()
    }
}
