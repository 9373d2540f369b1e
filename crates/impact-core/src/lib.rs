//! Impact Core - Domain types and dashboard logic
//!
//! This crate provides the foundational types shared by the Impact Tracker
//! server and client: posts, items, per-platform reports, the dashboard
//! filter/sort/summary pipeline and sentiment labelling.

pub mod dashboard;
pub mod error;
pub mod model;
pub mod sentiment;

pub use dashboard::{DashboardSummary, DateRange, Filters, SortKey, TopicFilter};
pub use error::{CoreError, Result};
pub use model::{Item, NewItem, NewPost, PlatformData, PlatformReport, Post, Topic};
pub use sentiment::{Sentiment, SentimentLabel};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
