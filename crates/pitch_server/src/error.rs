//! Server error types.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use pitch_core::error::TacticsError;

use crate::advisor::AdvisorError;

/// Errors that stop the server from starting.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A file named in the configuration could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid RON.
    #[error("invalid config file {path}: {message}")]
    ConfigParse {
        /// Config file path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// The custom formation library was rejected.
    #[error(transparent)]
    Tactics(#[from] TacticsError),

    /// The completion client could not be built.
    #[error(transparent)]
    Advisor(#[from] AdvisorError),

    /// The listening socket could not be opened.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address we tried.
        addr: SocketAddr,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// A request failure rendered as a JSON body.
///
/// The body is a single-field object; the field name depends on the route
/// (`error` for analysis, `reply` for chat).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    field: &'static str,
    message: String,
}

impl ApiError {
    /// 400 with `{ "error": message }`.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            field: "error",
            message: message.into(),
        }
    }

    /// 500 with `{ "reply": message }`, for the chat route.
    pub fn chat_unavailable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            field: "reply",
            message: message.into(),
        }
    }

    /// HTTP status of the response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Message placed in the body.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(status = %self.status, message = %self.message, "request failed");
        let mut body = serde_json::Map::new();
        body.insert(self.field.to_string(), self.message.into());
        (self.status, Json(serde_json::Value::Object(body))).into_response()
    }
}
