//! HTTP server module.
//!
//! Serves plain HTTP; TLS termination belongs to the proxy or load balancer
//! in front of the service. The server drains in-flight requests on
//! SIGTERM/SIGINT before exiting.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
