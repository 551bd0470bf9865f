//! Error types and their HTTP rendering.
//!
//! Every error leaves the service as a JSON object with a `detail` field.
//! Validation failures carry a list of field errors, everything else a single
//! message.

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::middleware::RequestId;

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Machine-readable failure kind, e.g. `missing` or `string_too_short`
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Path to the offending value, e.g. `["body", "text"]`
    pub loc: Vec<String>,
    pub msg: String,
}

impl FieldError {
    pub fn new(kind: &'static str, loc: &[&str], msg: impl Into<String>) -> Self {
        Self {
            kind,
            loc: loc.iter().map(|s| s.to_string()).collect(),
            msg: msg.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Request validation failed: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Not Found")]
    NotFound,

    #[error("{0}")]
    Internal(String),
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.loc.join("."), e.msg))
        .collect::<Vec<_>>()
        .join("; ")
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::NotFound => StatusCode::NOT_FOUND,
            // Internal failures are reported to the client as a bad request
            AppError::Internal(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge;
        }
        AppError::Internal(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Validation(errors) => json!({ "detail": errors }),
            other => json!({ "detail": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// An [`AppError`] tagged with the id of the request that produced it.
///
/// Rendering logs the error inside the request's context so the log line can
/// be matched with the access log.
#[derive(Debug)]
pub struct AppErrorResponse {
    pub error: AppError,
    pub request_id: Option<RequestId>,
}

impl From<AppError> for AppErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error,
            request_id: None,
        }
    }
}

impl IntoResponse for AppErrorResponse {
    fn into_response(self) -> Response {
        let request_id = self
            .request_id
            .map(|id| id.0.to_string())
            .unwrap_or_default();

        match &self.error {
            AppError::Internal(message) => {
                tracing::error!(%request_id, error = %message, "Internal error while handling request");
            }
            AppError::Validation(_) | AppError::PayloadTooLarge => {
                tracing::warn!(%request_id, error = %self.error, "Rejected request");
            }
            AppError::NotFound => {
                tracing::debug!(%request_id, "No route matched");
            }
        }

        self.error.into_response()
    }
}

/// Attach a request id to the error side of a `Result`.
pub trait ResultExt<T> {
    fn with_request_id(self, request_id: &RequestId) -> Result<T, AppErrorResponse>;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn with_request_id(self, request_id: &RequestId) -> Result<T, AppErrorResponse> {
        self.map_err(|error| AppErrorResponse {
            error,
            request_id: Some(request_id.clone()),
        })
    }
}
