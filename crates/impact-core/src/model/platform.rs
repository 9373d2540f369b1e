//! Per-platform aggregation reports.

use serde::{Deserialize, Serialize};

use super::post::Post;

/// Posts of one platform together with their derived totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformData {
    pub posts: Vec<Post>,
    pub total_engagement: u64,
    pub top_post: Option<Post>,
}

impl PlatformData {
    /// Computes the totals for a list of posts.
    ///
    /// `top_post` is the first post with the highest like count; ties keep the
    /// earliest occurrence.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::Utc;
    /// use impact_core::{PlatformData, Post};
    ///
    /// let now = Utc::now();
    /// let data = PlatformData::from_posts(vec![
    ///     Post::new("a", "first", "Business", now).with_counts(5, 1),
    ///     Post::new("b", "second", "Business", now).with_counts(5, 2),
    /// ]);
    /// assert_eq!(data.total_engagement, 13);
    /// assert_eq!(data.top_post.unwrap().id, "a");
    /// ```
    pub fn from_posts(posts: Vec<Post>) -> Self {
        let total_engagement = posts.iter().map(Post::engagement).sum();

        let mut top_post: Option<&Post> = None;
        for post in &posts {
            match top_post {
                Some(top) if post.likes <= top.likes => {},
                _ => top_post = Some(post),
            }
        }
        let top_post = top_post.cloned();

        Self {
            posts,
            total_engagement,
            top_post,
        }
    }
}

/// Aggregated data for a single platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformReport {
    pub platform: String,
    pub data: PlatformData,
}

impl PlatformReport {
    pub fn new(platform: impl Into<String>, posts: Vec<Post>) -> Self {
        Self {
            platform: platform.into(),
            data: PlatformData::from_posts(posts),
        }
    }
}
