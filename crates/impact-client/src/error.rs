use std::path::PathBuf;

use thiserror::Error;

/// Errors talking to the Impact Tracker API or the local cache.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API has no session for this client.
    #[error("Not authenticated")]
    Unauthorized,

    #[error("API returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("local cache I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ClientError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true if the API rejected the request for lack of a session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }
}

/// Errors producing a sentiment score for one text.
#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("embedding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("embedding service returned {0}")]
    Status(u16),

    #[error("unexpected embedding payload: {0}")]
    Payload(String),

    #[error("embedding is empty")]
    EmptyEmbedding,
}
