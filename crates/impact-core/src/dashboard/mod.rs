//! Dashboard pipeline: filtering, sorting and summary metrics.
//!
//! The functions here are generic over anything that can be viewed as a
//! [`Post`], so the client can run them over sentiment-annotated posts
//! without copying.
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use impact_core::dashboard::{filter_and_sort, Filters, SortKey};
//! use impact_core::Post;
//!
//! let now = Utc::now();
//! let posts = vec![
//!     Post::new("1", "a", "Business", now).with_counts(1, 0),
//!     Post::new("2", "b", "Technology", now).with_counts(9, 0),
//!     Post::new("3", "c", "Business", now).with_counts(5, 0),
//! ];
//!
//! let filters = Filters::default().with_topic("Business");
//! let view = filter_and_sort(posts, &filters, &SortKey::Likes, now);
//! let ids: Vec<_> = view.iter().map(|p| p.id.as_str()).collect();
//! assert_eq!(ids, ["3", "1"]);
//! ```

mod filter;
mod sort;
mod summary;

use chrono::{DateTime, Utc};

use crate::model::Post;

pub use filter::{DateRange, Filters, TopicFilter};
pub use sort::SortKey;
pub use summary::DashboardSummary;

impl AsRef<Post> for Post {
    fn as_ref(&self) -> &Post {
        self
    }
}

/// Applies `filters` and then a stable sort by `sort`.
pub fn filter_and_sort<T: AsRef<Post>>(
    posts: Vec<T>,
    filters: &Filters,
    sort: &SortKey,
    now: DateTime<Utc>,
) -> Vec<T> {
    let mut result = filters.apply(posts, now);
    sort.sort(&mut result);
    result
}
