//! HTTP route handlers.
//!
//! Two routes are served: the liveness probe at `/healthz` and text analysis
//! at `/analyze`. Anything else falls through to a JSON 404.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod analyze;
pub mod health;

use std::any::Any;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, MethodRouter},
    Extension, Router,
};
use http::header::{HeaderValue, CACHE_CONTROL, SERVER};
use tower_http::{
    catch_panic::CatchPanicLayer, set_header::SetResponseHeaderLayer, timeout::TimeoutLayer,
};

use crate::config::{AppConfig, CACHE_CONTROL_NO_STORE, SERVER_HEADER};
use crate::error::{AppError, AppErrorResponse};
use crate::middleware::{request_id_layer, RequestId};

/// Creates the Axum router with all routes and middleware.
pub fn create_router(config: &AppConfig) -> Router {
    build_router(config, post(analyze::analyze))
}

/// Assembles routes and middleware around the given `/analyze` handler.
#[allow(deprecated)]
fn build_router(config: &AppConfig, analyze_handler: MethodRouter) -> Router {
    // Analysis - bounded body, panics become client-visible errors
    let analyze_routes = Router::new()
        .route("/analyze", analyze_handler)
        .layer(DefaultBodyLimit::max(config.analyze.max_body_bytes))
        .layer(CatchPanicLayer::custom(panic_response));

    // Health check - always fresh for liveness probes
    let health_routes = Router::new().route("/healthz", get(health::healthz));

    Router::new()
        .merge(analyze_routes)
        .merge(health_routes)
        .fallback(not_found)
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            SERVER,
            HeaderValue::from_static(SERVER_HEADER),
        ))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.http.request_timeout_seconds,
        )))
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}

/// Fallback for unmatched paths.
async fn not_found(Extension(request_id): Extension<RequestId>) -> AppErrorResponse {
    AppErrorResponse {
        error: AppError::NotFound,
        request_id: Some(request_id),
    }
}

/// Render a panic caught during request handling as an internal error.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "Unexpected error while processing request".to_string()
    };

    AppErrorResponse::from(AppError::Internal(message)).into_response()
}
