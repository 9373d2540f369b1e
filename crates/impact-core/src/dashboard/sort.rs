use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::model::Post;

/// Sort order for dashboard posts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Newest first.
    #[default]
    Date,
    /// Most liked first.
    Likes,
    /// Any other key; leaves the input order unchanged.
    Unrecognized(String),
}

impl SortKey {
    /// Sorts in place. The sort is stable, so equal keys keep their order.
    pub fn sort<T: AsRef<Post>>(&self, posts: &mut [T]) {
        match self {
            SortKey::Date => posts.sort_by(|a, b| b.as_ref().date.cmp(&a.as_ref().date)),
            SortKey::Likes => posts.sort_by(|a, b| b.as_ref().likes.cmp(&a.as_ref().likes)),
            SortKey::Unrecognized(_) => {},
        }
    }
}

impl FromStr for SortKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "date" => SortKey::Date,
            "likes" => SortKey::Likes,
            other => SortKey::Unrecognized(other.to_string()),
        })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Date => f.write_str("date"),
            SortKey::Likes => f.write_str("likes"),
            SortKey::Unrecognized(key) => f.write_str(key),
        }
    }
}
