//! Insight Agent: a small HTTP service for text metrics.
//!
//! Exposes a liveness probe and an endpoint that reports word and character
//! counts for a submitted string.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;

pub use analyzer::{analyze, TextMetrics};
pub use config::AppConfig;
pub use error::{AppError, AppErrorResponse};
pub use routes::create_router;
