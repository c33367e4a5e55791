//! Error surface shared by every HTTP handler: a JSON error body, a
//! status mapping trait, and severity-based logging.

use serde::{Deserialize, Serialize};
use std::fmt;
use warp::http::StatusCode;
use warp::reply::{self, Response};
use warp::Reply;

/// Standard error body for all API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Machine-readable code, e.g. "game_not_found"
    pub error: String,
    /// Human-readable message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn into_response(self, status: StatusCode) -> Response {
        reply::with_status(reply::json(&self), status).into_response()
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// How loudly an error should be logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Client mistakes (4xx), expected during normal play
    Client,
    /// Server faults (5xx), need investigation
    Server,
    /// Integrity at risk (poisoned locks and the like)
    Critical,
}

/// Maps a typed error onto the HTTP surface.
pub trait IntoErrorResponse {
    fn status_code(&self) -> StatusCode;

    fn error_code(&self) -> &'static str;

    fn error_message(&self) -> String;

    fn error_details(&self) -> Option<serde_json::Value> {
        None
    }

    fn severity(&self) -> ErrorSeverity {
        if self.status_code().is_server_error() {
            ErrorSeverity::Server
        } else {
            ErrorSeverity::Client
        }
    }

    fn to_error_response(&self) -> ErrorResponse {
        if let Some(details) = self.error_details() {
            ErrorResponse::with_details(self.error_code(), self.error_message(), details)
        } else {
            ErrorResponse::new(self.error_code(), self.error_message())
        }
    }

    fn into_http_response(self) -> Response
    where
        Self: Sized,
    {
        let status = self.status_code();
        let severity = self.severity();
        let body = self.to_error_response();

        match severity {
            ErrorSeverity::Client => {
                tracing::info!(error = %body.error, message = %body.message, "client error")
            }
            ErrorSeverity::Server => {
                tracing::error!(error = %body.error, message = %body.message, "server error")
            }
            ErrorSeverity::Critical => {
                tracing::error!(error = %body.error, message = %body.message, "critical error")
            }
        }

        body.into_response(status)
    }
}
