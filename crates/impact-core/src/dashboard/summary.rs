use indexmap::IndexMap;
use serde::Serialize;

use crate::model::Post;

/// Headline metrics shown above the post list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_posts: usize,
    pub total_likes: u64,
    /// Posts per topic, in order of first appearance.
    pub topic_counts: IndexMap<String, usize>,
}

impl DashboardSummary {
    pub fn from_posts<T: AsRef<Post>>(posts: &[T]) -> Self {
        let mut summary = Self {
            total_posts: posts.len(),
            ..Self::default()
        };

        for post in posts.iter().map(AsRef::as_ref) {
            summary.total_likes = summary.total_likes.saturating_add(post.likes);
            *summary.topic_counts.entry(post.topic.clone()).or_insert(0) += 1;
        }

        summary
    }

    /// Topics available for the topic selector.
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.topic_counts.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_summary_counts() {
        let now = Utc::now();
        let posts = vec![
            Post::new("1", "a", "Technology", now).with_counts(4, 1),
            Post::new("2", "b", "Business", now).with_counts(6, 0),
            Post::new("3", "c", "Technology", now).with_counts(0, 9),
        ];

        let summary = DashboardSummary::from_posts(&posts);

        assert_eq!(summary.total_posts, 3);
        assert_eq!(summary.total_likes, 10);
        assert_eq!(summary.topic_counts["Technology"], 2);
        assert_eq!(summary.topics().collect::<Vec<_>>(), ["Technology", "Business"]);
    }

    #[test]
    fn test_empty_summary() {
        let summary = DashboardSummary::from_posts::<Post>(&[]);
        assert_eq!(summary, DashboardSummary::default());
    }
}
