//! Social media posts.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Topic assigned to generated posts.
///
/// Persisted posts carry a free-form topic string; this enum names the fixed
/// set the populator draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    Technology,
    Business,
    Entertainment,
}

impl Topic {
    /// All topics, in declaration order.
    pub const ALL: [Topic; 3] = [Topic::Technology, Topic::Business, Topic::Entertainment];

    /// Returns the topic name as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Technology => "Technology",
            Topic::Business => "Business",
            Topic::Entertainment => "Entertainment",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Topic::ALL
            .into_iter()
            .find(|topic| topic.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::validation("topic", format!("unknown topic '{}'", s)))
    }
}

/// A social media post.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use impact_core::Post;
///
/// let post = Post::new("fb1", "Sample Facebook post", "Technology", Utc::now())
///     .with_counts(100, 20);
/// assert_eq!(post.engagement(), 120);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub shares: u64,
    #[serde(default)]
    pub comments: u64,
    pub date: DateTime<Utc>,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Creates a post with zeroed counters.
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        topic: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            likes: 0,
            shares: 0,
            comments: 0,
            date,
            topic: topic.into(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Sets the like and share counters.
    pub fn with_counts(mut self, likes: u64, shares: u64) -> Self {
        self.likes = likes;
        self.shares = shares;
        self
    }

    /// Likes plus shares.
    pub fn engagement(&self) -> u64 {
        self.likes.saturating_add(self.shares)
    }
}

/// Payload for creating or replacing a persisted post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewPost {
    pub text: String,
    pub topic: String,
    pub date: Option<DateTime<Utc>>,
    pub likes: u64,
    pub shares: u64,
    pub comments: u64,
}

impl NewPost {
    /// Checks the required fields.
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(CoreError::validation("text", "Path `text` is required."));
        }
        if self.topic.trim().is_empty() {
            return Err(CoreError::validation("topic", "Path `topic` is required."));
        }
        if self.date.is_none() {
            return Err(CoreError::validation("date", "Path `date` is required."));
        }
        Ok(())
    }

    /// Builds a new post with the given id, stamped at `now`.
    pub fn into_post(self, id: impl Into<String>, now: DateTime<Utc>) -> Result<Post> {
        self.validate()?;
        let date = self
            .date
            .ok_or_else(|| CoreError::validation("date", "Path `date` is required."))?;

        Ok(Post {
            id: id.into(),
            text: self.text,
            likes: self.likes,
            shares: self.shares,
            comments: self.comments,
            date,
            topic: self.topic,
            created_at: Some(now),
            updated_at: Some(now),
        })
    }

    /// Replaces the mutable fields of `post`, keeping its id and creation time.
    pub fn apply_to(self, post: &Post, now: DateTime<Utc>) -> Result<Post> {
        let mut updated = self.into_post(post.id.clone(), now)?;
        updated.created_at = post.created_at;
        Ok(updated)
    }
}
