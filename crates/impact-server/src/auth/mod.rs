//! Sign-in with an external identity provider and server-side sessions.
//!
//! The OAuth handshake lives in the HTTP handlers; this module owns the
//! pieces they compose: the provider abstraction, the Google implementation
//! and the session store keyed by the signed session cookie.

mod google;
mod session;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use google::GoogleIdentityProvider;
pub use session::{SESSION_COOKIE, STATE_COOKIE, SessionStore};

/// Profile of a signed-in user, as returned by `/auth/user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("identity provider is not configured")]
    NotConfigured,

    #[error("authorization code exchange failed: {0}")]
    Exchange(String),

    #[error("failed to fetch user profile: {0}")]
    Profile(String),

    #[error("identity provider request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// An OAuth 2.0 authorization-code identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &str;

    /// URL the browser is redirected to; `state` is echoed back on callback.
    fn authorize_url(&self, state: &str) -> Result<String, AuthError>;

    /// Exchanges the callback `code` for the user's profile.
    async fn authenticate(&self, code: &str) -> Result<UserProfile, AuthError>;
}
