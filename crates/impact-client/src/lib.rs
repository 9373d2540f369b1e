//! Impact Client - dashboard data pipeline for Impact Tracker
//!
//! Fetches posts from the API (preferring a short-lived local copy),
//! annotates them with a sentiment derived from an embedding model and
//! filters/sorts them for display. The `impact-dashboard` binary wires the
//! pipeline to a command line.

pub mod api;
pub mod error;
pub mod local_cache;
pub mod pipeline;
pub mod sentiment;

pub use api::{ApiClient, PostSource, User, normalize_payload};
pub use error::{ClientError, SentimentError};
pub use local_cache::{CachedPostSource, DEFAULT_FRESHNESS, LocalCache};
pub use pipeline::{DashboardPipeline, DashboardView};
pub use sentiment::{AnnotatedPost, EmbeddingModel, HttpEmbeddingModel, SentimentAnalyzer};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
