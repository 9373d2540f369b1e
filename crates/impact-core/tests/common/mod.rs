#![allow(dead_code)]
use chrono::{DateTime, Duration, Utc};
use impact_core::Post;

/// Builds a post dated `age_hours` before `now`.
pub fn post_aged(id: &str, topic: &str, likes: u64, age_hours: i64, now: DateTime<Utc>) -> Post {
    Post::new(id, format!("post {}", id), topic, now - Duration::hours(age_hours))
        .with_counts(likes, likes / 10)
}

/// A mixed fixture spanning three topics and two weeks.
pub fn mixed_feed(now: DateTime<Utc>) -> Vec<Post> {
    vec![
        post_aged("t1", "Technology", 120, 2, now),
        post_aged("b1", "Business", 300, 30, now),
        post_aged("e1", "Entertainment", 45, 200, now),
        post_aged("t2", "Technology", 300, 60, now),
        post_aged("b2", "Business", 10, 300, now),
        post_aged("t3", "Technology", 5, 1, now),
    ]
}
