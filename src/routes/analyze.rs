//! Handler for `POST /analyze`.
//!
//! The body is decoded as untyped JSON first so each way the `text` field can
//! be wrong is reported as its own field error, rather than as a single
//! deserializer message. A request without a `Content-Type` header is still
//! read as JSON.

use axum::{
    body::Bytes,
    extract::rejection::BytesRejection,
    http::{header::CONTENT_TYPE, HeaderMap},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::analyzer;
use crate::error::{AppError, AppErrorResponse, FieldError, ResultExt};
use crate::middleware::RequestId;

/// A validated analysis request. `text` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeRequest {
    text: String,
}

impl AnalyzeRequest {
    pub fn new(text: impl Into<String>) -> Result<Self, AppError> {
        let text = text.into();
        if text.is_empty() {
            return Err(invalid_text(
                "string_too_short",
                "String should have at least 1 character",
            ));
        }
        Ok(Self { text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl TryFrom<Value> for AnalyzeRequest {
    type Error = AppError;

    fn try_from(body: Value) -> Result<Self, Self::Error> {
        let mut fields = match body {
            Value::Object(fields) => fields,
            Value::Null => {
                return Err(AppError::Validation(vec![FieldError::new(
                    "missing",
                    &["body"],
                    "Field required",
                )]))
            }
            _ => {
                return Err(AppError::Validation(vec![FieldError::new(
                    "model_attributes_type",
                    &["body"],
                    "Input should be a valid dictionary or object to extract fields from",
                )]))
            }
        };

        // Unknown fields are ignored
        match fields.remove("text") {
            None => Err(invalid_text("missing", "Field required")),
            Some(Value::String(text)) => Self::new(text),
            Some(_) => Err(invalid_text("string_type", "Input should be a valid string")),
        }
    }
}

fn invalid_text(kind: &'static str, msg: &str) -> AppError {
    AppError::Validation(vec![FieldError::new(kind, &["body", "text"], msg)])
}

/// Decode the raw request body into JSON.
///
/// An empty body counts as a missing body. The body is parsed as JSON when
/// `Content-Type` is absent or names a JSON subtype (`json` or `*+json`);
/// any other media type is passed on as a non-object body.
pub fn decode_body(headers: &HeaderMap, body: &[u8]) -> Result<Value, AppError> {
    if body.is_empty() {
        return Ok(Value::Null);
    }

    let is_json = match headers.get(CONTENT_TYPE) {
        None => true,
        Some(value) => value.to_str().map(is_json_media_type).unwrap_or(false),
    };
    if !is_json {
        return Ok(Value::String(String::from_utf8_lossy(body).into_owned()));
    }

    serde_json::from_slice(body).map_err(|e| {
        AppError::Validation(vec![FieldError::new(
            "json_invalid",
            &["body"],
            format!("JSON decode error: {e}"),
        )])
    })
}

fn is_json_media_type(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    match essence.split_once('/') {
        Some((_, subtype)) => {
            let subtype = subtype.to_ascii_lowercase();
            subtype == "json" || subtype.ends_with("+json")
        }
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub original_text: String,
    pub word_count: usize,
    pub character_count: usize,
}

impl From<AnalyzeRequest> for AnalyzeResponse {
    fn from(request: AnalyzeRequest) -> Self {
        let metrics = analyzer::analyze(request.text());
        Self {
            original_text: request.into_text(),
            word_count: metrics.word_count,
            character_count: metrics.character_count,
        }
    }
}

/// Analyze handler: validates the body and returns word and character counts.
#[instrument(name = "analyze::analyze", skip(request_id, headers, payload))]
pub async fn analyze(
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    payload: Result<Bytes, BytesRejection>,
) -> Result<Json<AnalyzeResponse>, AppErrorResponse> {
    let bytes = payload.map_err(AppError::from).with_request_id(&request_id)?;
    let body = decode_body(&headers, &bytes).with_request_id(&request_id)?;
    let request = AnalyzeRequest::try_from(body).with_request_id(&request_id)?;

    let response = AnalyzeResponse::from(request);
    tracing::debug!(
        word_count = response.word_count,
        character_count = response.character_count,
        "Analyzed text"
    );

    Ok(Json(response))
}
