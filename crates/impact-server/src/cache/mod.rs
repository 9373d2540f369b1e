//! Cache module for Impact Tracker Server.
//!
//! This module provides the in-memory response cache using Moka,
//! with support for default and per-entry TTL expiration, resource and
//! pattern-based invalidation, and metrics.

pub mod invalidation;
pub mod keys;
pub mod response_cache;

// Reexportaciones
pub use invalidation::{InvalidationResult, query_variants_pattern};
pub use keys::CacheKey;
pub use response_cache::{CacheConfig, CacheError, CachedResponse, ResponseCache};
