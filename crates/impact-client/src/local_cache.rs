//! Local copy of the post list with a short freshness window.
//!
//! The copy lives in a single JSON file holding the posts and the time they
//! were fetched. A copy younger than the window is served without touching
//! the API; an older, missing or unreadable copy triggers a re-fetch that
//! overwrites the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use impact_core::Post;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::api::PostSource;
use crate::error::ClientError;

pub const DEFAULT_FRESHNESS: Duration = Duration::from_secs(60);
pub const CACHE_FILE_NAME: &str = "social_media_data.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachedPosts {
    fetched_at: DateTime<Utc>,
    posts: Vec<Post>,
}

#[derive(Debug, Clone)]
pub struct LocalCache {
    path: PathBuf,
    freshness: Duration,
}

impl LocalCache {
    /// Cache file `CACHE_FILE_NAME` inside `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(CACHE_FILE_NAME),
            freshness: DEFAULT_FRESHNESS,
        }
    }

    pub fn with_freshness(mut self, freshness: Duration) -> Self {
        self.freshness = freshness;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn freshness(&self) -> Duration {
        self.freshness
    }

    /// Returns the stored posts if they were fetched less than the freshness
    /// window before `now`.
    ///
    /// A missing file is a miss. An unreadable or corrupt file is logged and
    /// also treated as a miss, so it gets overwritten by the next store.
    pub async fn load_fresh(&self, now: DateTime<Utc>) -> Option<Vec<Post>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read local cache");
                return None;
            },
        };

        let cached: CachedPosts = match serde_json::from_slice(&bytes) {
            Ok(cached) => cached,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Discarding corrupt local cache");
                return None;
            },
        };

        // A copy dated in the future is not fresh
        let age = now.signed_duration_since(cached.fetched_at).to_std().ok()?;
        if age < self.freshness {
            debug!(age_ms = age.as_millis() as u64, "Local cache is fresh");
            Some(cached.posts)
        } else {
            None
        }
    }

    /// Overwrites the stored copy, stamping it with `fetched_at`.
    pub async fn store(&self, posts: &[Post], fetched_at: DateTime<Utc>) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ClientError::io(parent, e))?;
        }

        let payload = CachedPosts {
            fetched_at,
            posts: posts.to_vec(),
        };
        let json = serde_json::to_vec_pretty(&payload)?;

        // Write to a temp file and rename, so readers never see a partial file
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| ClientError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| ClientError::io(&self.path, e))?;

        Ok(())
    }

    /// Removes the stored copy. Missing files are fine.
    pub async fn clear(&self) -> Result<(), ClientError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::io(&self.path, e)),
        }
    }
}

/// A [`PostSource`] that prefers a fresh local copy over the wrapped source.
pub struct CachedPostSource<S> {
    inner: S,
    cache: LocalCache,
}

impl<S: PostSource> CachedPostSource<S> {
    pub fn new(inner: S, cache: LocalCache) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    /// Serves the local copy when fresh at `now`, else fetches and refreshes it.
    ///
    /// Failing to write the refreshed copy is logged; the fetched posts are
    /// still returned.
    pub async fn fetch_posts_at(&self, now: DateTime<Utc>) -> Result<Vec<Post>, ClientError> {
        if let Some(posts) = self.cache.load_fresh(now).await {
            info!(count = posts.len(), "Using cached social media data");
            return Ok(posts);
        }

        info!("Fetching fresh social media data from API");
        let posts = self.inner.fetch_posts().await?;

        if let Err(e) = self.cache.store(&posts, now).await {
            warn!(error = %e, "Failed to refresh local cache");
        }

        Ok(posts)
    }
}

#[async_trait]
impl<S: PostSource> PostSource for CachedPostSource<S> {
    async fn fetch_posts(&self) -> Result<Vec<Post>, ClientError> {
        self.fetch_posts_at(Utc::now()).await
    }
}
