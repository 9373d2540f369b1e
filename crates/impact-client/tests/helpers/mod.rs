//! Shared fixtures: a stub API served on an ephemeral port and fake sources.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use impact_client::{ApiClient, ClientError, PostSource};
use impact_core::Post;

pub const SESSION: &str = "impact.sid=test-session";

/// Serves `router` on 127.0.0.1 and returns its base URL.
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn api(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, reqwest::Client::new()).unwrap()
}

pub fn post(id: &str, text: &str, topic: &str, age_days: i64, likes: u64, now: DateTime<Utc>) -> Post {
    Post::new(id, text, topic, now - Duration::days(age_days)).with_counts(likes, 0)
}

/// Source with fixed posts that counts how often it is asked.
#[derive(Clone, Default)]
pub struct CountingSource {
    posts: Vec<Post>,
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl CountingSource {
    pub fn new(posts: Vec<Post>) -> Self {
        Self {
            posts,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PostSource for CountingSource {
    async fn fetch_posts(&self) -> Result<Vec<Post>, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ClientError::Status {
                status: 500,
                message: "upstream down".to_string(),
            });
        }
        Ok(self.posts.clone())
    }
}
