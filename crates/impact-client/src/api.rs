//! HTTP client for the Impact Tracker API.
//!
//! Every request carries the session cookie given at construction. A `401`
//! maps to [`ClientError::Unauthorized`]; any other non-2xx status becomes
//! [`ClientError::Status`] with the server's message.

use async_trait::async_trait;
use impact_core::{Item, NewItem, Post};
use reqwest::{RequestBuilder, Response, StatusCode, header};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::ClientError;

pub const POSTS_PATH: &str = "/api/social-media-posts";
pub const ITEMS_PATH: &str = "/api/items";
pub const USER_PATH: &str = "/auth/user";
pub const LOGOUT_PATH: &str = "/auth/logout";

/// Anything that can produce the list of posts shown on the dashboard.
#[async_trait]
pub trait PostSource: Send + Sync {
    async fn fetch_posts(&self) -> Result<Vec<Post>, ClientError>;
}

/// Signed-in user as reported by `/auth/user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    cookie: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a client for `base_url` (scheme and host, no trailing path).
    pub fn new(base_url: impl Into<String>, http: reqwest::Client) -> Result<Self, ClientError> {
        let base_url = base_url.into();
        let trimmed = base_url.trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ClientError::InvalidBaseUrl(base_url));
        }

        Ok(Self {
            base_url: trimmed.to_string(),
            cookie: None,
            http,
        })
    }

    /// Sends `cookie` (a raw `Cookie` header value) with every request.
    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ClientError> {
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }

        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(ErrorBody {
                message: Some(message),
                ..
            }) => message,
            Ok(ErrorBody {
                error: Some(error), ..
            }) => error,
            _ => text,
        };

        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let bytes = self.send(builder).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn message(&self, builder: RequestBuilder) -> Result<String, ClientError> {
        let body: MessageBody = self.json(builder).await?;
        Ok(body.message)
    }

    /// Fetches the persisted posts. Tolerates the wrapped `{ "posts": [...] }` shape.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn fetch_posts(&self) -> Result<Vec<Post>, ClientError> {
        let payload: Value = self.json(self.request(reqwest::Method::GET, POSTS_PATH)).await?;
        let posts = normalize_payload(payload);
        debug!(count = posts.len(), "Fetched posts");
        Ok(posts)
    }

    pub async fn list_items(&self) -> Result<Vec<Item>, ClientError> {
        self.json(self.request(reqwest::Method::GET, ITEMS_PATH))
            .await
    }

    pub async fn get_item(&self, id: &str) -> Result<Item, ClientError> {
        self.json(self.request(reqwest::Method::GET, &item_path(id)))
            .await
    }

    pub async fn create_item(&self, name: &str) -> Result<Item, ClientError> {
        self.json(
            self.request(reqwest::Method::POST, ITEMS_PATH)
                .json(&NewItem::new(name)),
        )
        .await
    }

    pub async fn update_item(&self, id: &str, name: &str) -> Result<Item, ClientError> {
        self.json(
            self.request(reqwest::Method::PUT, &item_path(id))
                .json(&NewItem::new(name)),
        )
        .await
    }

    /// Deletes an item and returns the server's confirmation message.
    pub async fn delete_item(&self, id: &str) -> Result<String, ClientError> {
        self.message(self.request(reqwest::Method::DELETE, &item_path(id)))
            .await
    }

    pub async fn current_user(&self) -> Result<User, ClientError> {
        self.json(self.request(reqwest::Method::GET, USER_PATH))
            .await
    }

    pub async fn logout(&self) -> Result<String, ClientError> {
        self.message(self.request(reqwest::Method::POST, LOGOUT_PATH))
            .await
    }
}

#[async_trait]
impl PostSource for ApiClient {
    async fn fetch_posts(&self) -> Result<Vec<Post>, ClientError> {
        ApiClient::fetch_posts(self).await
    }
}

fn item_path(id: &str) -> String {
    format!("{}/{}", ITEMS_PATH, id)
}

/// Extracts posts from an API payload.
///
/// Accepts a bare array or an object with a `posts` array. Elements that do
/// not decode as a [`Post`] are skipped; any other shape yields no posts.
pub fn normalize_payload(payload: Value) -> Vec<Post> {
    let elements = match payload {
        Value::Array(elements) => elements,
        Value::Object(mut object) => match object.remove("posts") {
            Some(Value::Array(elements)) => elements,
            _ => {
                warn!("Posts payload is an object without a posts array");
                return Vec::new();
            },
        },
        _ => {
            warn!("Posts payload is neither an array nor an object");
            return Vec::new();
        },
    };

    elements
        .into_iter()
        .filter_map(|element| match serde_json::from_value::<Post>(element) {
            Ok(post) => Some(post),
            Err(e) => {
                debug!(error = %e, "Skipping malformed post");
                None
            },
        })
        .collect()
}
