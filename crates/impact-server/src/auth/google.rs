use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{AuthError, IdentityProvider, UserProfile};
use crate::config::GoogleSettings;

const SCOPES: &str = "openid profile email";

/// Google OAuth 2.0 / OpenID Connect sign-in.
pub struct GoogleIdentityProvider {
    settings: GoogleSettings,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct GoogleUserInfo {
    sub: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

impl From<GoogleUserInfo> for UserProfile {
    fn from(info: GoogleUserInfo) -> Self {
        let display_name = info
            .name
            .or_else(|| info.email.clone())
            .unwrap_or_else(|| info.sub.clone());
        Self {
            id: info.sub,
            display_name,
            email: info.email,
            picture: info.picture,
        }
    }
}

impl GoogleIdentityProvider {
    pub fn new(settings: GoogleSettings, client: reqwest::Client) -> Self {
        Self { settings, client }
    }

    fn ensure_configured(&self) -> Result<(), AuthError> {
        if self.settings.client_id.is_empty() || self.settings.client_secret.is_empty() {
            return Err(AuthError::NotConfigured);
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    fn name(&self) -> &str {
        "google"
    }

    fn authorize_url(&self, state: &str) -> Result<String, AuthError> {
        self.ensure_configured()?;
        Ok(format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&scope={}&state={}",
            self.settings.auth_url,
            urlencoding::encode(&self.settings.client_id),
            urlencoding::encode(&self.settings.callback_url),
            urlencoding::encode(SCOPES),
            urlencoding::encode(state),
        ))
    }

    #[instrument(skip_all, fields(provider = "google"))]
    async fn authenticate(&self, code: &str) -> Result<UserProfile, AuthError> {
        self.ensure_configured()?;

        let response = self
            .client
            .post(&self.settings.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.settings.client_id.as_str()),
                ("client_secret", self.settings.client_secret.as_str()),
                ("redirect_uri", self.settings.callback_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::Exchange(format!(
                "token endpoint returned {}",
                response.status()
            )));
        }
        let token: TokenResponse = response.json().await?;
        debug!("Authorization code exchanged");

        let response = self
            .client
            .get(&self.settings.userinfo_url)
            .bearer_auth(&token.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::Profile(format!(
                "userinfo endpoint returned {}",
                response.status()
            )));
        }
        let info: GoogleUserInfo = response.json().await?;

        Ok(info.into())
    }
}
