//! Impact Server - HTTP server for Impact Tracker
//!
//! Serves the cached REST API (`/api/items`, `/api/social-media-posts`,
//! `/api/social-media-data`) behind Google sign-in, warms the response cache
//! at startup and exposes health and Prometheus endpoints.

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod populator;
pub mod server;
pub mod state;
pub mod store;

pub use crate::config::{ConfigError, ServerConfig};
pub use error::AppError;
pub use handlers::health::HealthResponse;
pub use server::{create_router_with_state, run_server_with_state};
pub use state::{AppState, HttpSettings};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
