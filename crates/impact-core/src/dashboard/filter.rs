use std::convert::Infallible;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Post;

/// Topic selection. `All` disables topic filtering.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TopicFilter {
    #[default]
    All,
    Only(String),
}

impl TopicFilter {
    fn matches(&self, post: &Post) -> bool {
        match self {
            TopicFilter::All => true,
            TopicFilter::Only(topic) => post.topic == *topic,
        }
    }
}

impl FromStr for TopicFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "All" {
            Ok(TopicFilter::All)
        } else {
            Ok(TopicFilter::Only(s.to_string()))
        }
    }
}

/// Date window selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateRange {
    /// Posts dated within the seven days before `now`.
    #[default]
    Last7Days,
    /// No date filtering.
    AllTime,
}

impl DateRange {
    /// Width of the rolling window, if any.
    pub fn window(&self) -> Option<Duration> {
        match self {
            DateRange::Last7Days => Some(Duration::days(7)),
            DateRange::AllTime => None,
        }
    }

    fn matches(&self, post: &Post, now: DateTime<Utc>) -> bool {
        match self.window() {
            Some(window) => post.date >= now - window,
            None => true,
        }
    }
}

impl FromStr for DateRange {
    type Err = Infallible;

    /// `"7days"` selects the rolling window; any other value disables it.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "7days" {
            Ok(DateRange::Last7Days)
        } else {
            Ok(DateRange::AllTime)
        }
    }
}

/// Combined dashboard filters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Filters {
    pub topic: TopicFilter,
    pub date_range: DateRange,
}

impl Filters {
    /// Filters that keep everything.
    pub fn none() -> Self {
        Self {
            topic: TopicFilter::All,
            date_range: DateRange::AllTime,
        }
    }

    pub fn with_topic(mut self, topic: &str) -> Self {
        self.topic = topic.parse().unwrap_or_default();
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = range;
        self
    }

    /// Keeps the posts that match every filter, preserving their order.
    pub fn apply<T: AsRef<Post>>(&self, posts: Vec<T>, now: DateTime<Utc>) -> Vec<T> {
        posts
            .into_iter()
            .filter(|p| {
                let post = p.as_ref();
                self.topic.matches(post) && self.date_range.matches(post, now)
            })
            .collect()
    }
}
