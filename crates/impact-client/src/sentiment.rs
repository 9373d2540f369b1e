//! Sentiment annotation backed by an embedding model.
//!
//! The model only turns text into a vector; the score is the mean of that
//! vector as computed by [`impact_core::Sentiment::from_embedding`].

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use impact_core::{Post, Sentiment};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::SentimentError;

/// Turns text into an embedding vector.
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SentimentError>;
}

#[async_trait]
impl<M: EmbeddingModel + ?Sized> EmbeddingModel for Arc<M> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SentimentError> {
        (**self).embed(text).await
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    text: &'a str,
}

/// Shapes accepted from an embedding endpoint.
#[derive(Deserialize)]
#[serde(untagged)]
enum EmbedResponse {
    Single { embedding: Vec<f32> },
    Batch { embeddings: Vec<Vec<f32>> },
    Vector(Vec<f32>),
    Matrix(Vec<Vec<f32>>),
}

impl EmbedResponse {
    /// The first row; batch responses carry one row per input text.
    fn into_vector(self) -> Option<Vec<f32>> {
        match self {
            EmbedResponse::Single { embedding } | EmbedResponse::Vector(embedding) => {
                Some(embedding)
            },
            EmbedResponse::Batch { embeddings } | EmbedResponse::Matrix(embeddings) => {
                embeddings.into_iter().next()
            },
        }
    }
}

/// Embedding model served over HTTP: `POST {url}` with `{"text": ...}`.
#[derive(Debug, Clone)]
pub struct HttpEmbeddingModel {
    url: String,
    client: reqwest::Client,
}

impl HttpEmbeddingModel {
    pub fn new(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

#[async_trait]
impl EmbeddingModel for HttpEmbeddingModel {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SentimentError> {
        let response = self
            .client
            .post(&self.url)
            .json(&EmbedRequest { text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SentimentError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        let parsed: EmbedResponse = serde_json::from_slice(&bytes)
            .map_err(|e| SentimentError::Payload(e.to_string()))?;

        parsed.into_vector().ok_or(SentimentError::EmptyEmbedding)
    }
}

/// A post with its sentiment, `None` when scoring was skipped or failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedPost {
    #[serde(flatten)]
    pub post: Post,
    pub sentiment: Option<Sentiment>,
}

impl AnnotatedPost {
    pub fn unscored(post: Post) -> Self {
        Self {
            post,
            sentiment: None,
        }
    }
}

impl AsRef<Post> for AnnotatedPost {
    fn as_ref(&self) -> &Post {
        &self.post
    }
}

pub struct SentimentAnalyzer<M> {
    model: M,
}

impl<M: EmbeddingModel> SentimentAnalyzer<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Scores one text. Blank text is not sent to the model and yields `None`.
    pub async fn analyze(&self, text: &str) -> Result<Option<Sentiment>, SentimentError> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let embedding = self.model.embed(text).await?;
        Sentiment::from_embedding(&embedding)
            .map(Some)
            .ok_or(SentimentError::EmptyEmbedding)
    }

    /// Scores every post concurrently.
    ///
    /// The output keeps the input order. A post whose scoring fails keeps its
    /// fields and gets `sentiment: None`; the rest of the batch is unaffected.
    #[instrument(skip_all, fields(posts = posts.len()))]
    pub async fn annotate(&self, posts: Vec<Post>) -> Vec<AnnotatedPost> {
        let scores = join_all(posts.iter().map(|post| self.analyze(&post.text))).await;

        posts
            .into_iter()
            .zip(scores)
            .map(|(post, score)| {
                let sentiment = match score {
                    Ok(sentiment) => sentiment,
                    Err(e) => {
                        warn!(post = %post.id, error = %e, "Sentiment analysis failed");
                        None
                    },
                };
                debug!(post = %post.id, ?sentiment, "Annotated post");
                AnnotatedPost { post, sentiment }
            })
            .collect()
    }
}
