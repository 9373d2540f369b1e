//! HTTP handlers.

pub mod auth;
pub mod health;
pub mod items;
pub mod metrics;
pub mod posts;
pub mod root;
pub mod social_data;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::ResponseCache;

/// Body `{ "message": ... }` de deletes y logout.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Invalida la key de la coleccion y la del documento, con sus variantes
/// de query string. Se llama antes de responder una escritura.
pub(crate) async fn invalidate_document(cache: &ResponseCache, collection_path: &str, id: &str) {
    let document_path = format!("{}/{}", collection_path, id);
    let result = cache
        .invalidate_resources(&[collection_path, &document_path])
        .await;
    debug!(
        collection = collection_path,
        id,
        invalidated = result.count,
        "Cache invalidated after write"
    );
}
