//! Server configuration.
//!
//! Values are layered, later sources winning:
//!
//! 1. built-in defaults,
//! 2. an optional config file (`IMPACT_CONFIG`, default `impact.toml`),
//! 3. `IMPACT_*` environment variables (`__` separates nested keys, e.g.
//!    `IMPACT_CACHE__TTL_SECONDS=600`),
//! 4. the plain variable names used by earlier deployments (`PORT`,
//!    `FRONTEND_URL`, `SESSION_SECRET`, `GOOGLE_CLIENT_ID`, ...).

use std::path::PathBuf;

use config::{Config, Environment, File};
use rand::RngCore;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::populator::{PlatformKind, PopulationPolicy};

/// Minimum session secret length accepted for cookie signing.
pub const MIN_SECRET_BYTES: usize = 32;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origin of the web frontend; used for CORS and the post-login redirect.
    pub frontend_url: String,
    /// Production mode marks cookies `Secure` and requires a session secret.
    pub production: bool,
    /// Built frontend served for unmatched routes.
    pub static_dir: Option<PathBuf>,
    pub cache: CacheSettings,
    pub session: SessionSettings,
    pub google: GoogleSettings,
    pub populator: PopulatorSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            frontend_url: "http://localhost:3000".to_string(),
            production: false,
            static_dir: None,
            cache: CacheSettings::default(),
            session: SessionSettings::default(),
            google: GoogleSettings::default(),
            populator: PopulatorSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Default TTL of the response cache. 0 disables expiry.
    pub ttl_seconds: u64,
    pub max_capacity: u64,
    /// TTL for responses stored by the cache middleware.
    pub route_ttl_seconds: u64,
    /// TTL for the data stored by the populator.
    pub populate_ttl_seconds: u64,
    /// Larger response bodies are passed through uncached.
    pub max_body_bytes: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_seconds: 300,
            max_capacity: 10_000,
            route_ttl_seconds: 300,
            populate_ttl_seconds: 3600,
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub secret: String,
    pub ttl_seconds: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            secret: String::new(),
            ttl_seconds: 24 * 60 * 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GoogleSettings {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            callback_url: "http://localhost:5000/auth/google/callback".to_string(),
            auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            userinfo_url: "https://openidconnect.googleapis.com/v1/userinfo".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PopulatorSettings {
    pub policy: PopulationPolicy,
    pub platforms: Vec<PlatformSettings>,
    pub request_timeout_seconds: u64,
    /// Copies the startup data into the posts collection when it is empty.
    pub seed_posts: bool,
}

impl Default for PopulatorSettings {
    fn default() -> Self {
        Self {
            policy: PopulationPolicy::Synthetic,
            platforms: vec![
                PlatformSettings::new("Facebook", PlatformKind::Facebook),
                PlatformSettings::new("LinkedIn", PlatformKind::LinkedIn),
                PlatformSettings::new("Platform X", PlatformKind::PlatformX),
            ],
            request_timeout_seconds: 10,
            seed_posts: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlatformSettings {
    pub name: String,
    pub kind: PlatformKind,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl PlatformSettings {
    pub fn new(name: impl Into<String>, kind: PlatformKind) -> Self {
        Self {
            name: name.into(),
            kind,
            url: None,
            api_key: None,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from file and environment, then validates it.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("IMPACT_CONFIG").unwrap_or_else(|_| "impact.toml".to_string());

        let settings = Config::builder()
            .add_source(File::with_name(&path).required(false))
            .add_source(
                Environment::with_prefix("IMPACT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: ServerConfig = settings.try_deserialize()?;
        config.apply_legacy_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Applies the unprefixed variable names of earlier deployments.
    ///
    /// `lookup` abstracts the environment so the mapping can be tested.
    pub fn apply_legacy_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            self.port = port;
        }
        if let Some(url) = lookup("FRONTEND_URL") {
            self.frontend_url = url;
        }
        if let Some(env) = lookup("NODE_ENV") {
            self.production = env == "production";
        }
        if let Some(secret) = lookup("SESSION_SECRET") {
            self.session.secret = secret;
        }
        if let Some(id) = lookup("GOOGLE_CLIENT_ID") {
            self.google.client_id = id;
        }
        if let Some(secret) = lookup("GOOGLE_CLIENT_SECRET") {
            self.google.client_secret = secret;
        }

        for platform in &mut self.populator.platforms {
            let Some(prefix) = platform.kind.legacy_env_prefix() else {
                continue;
            };
            if let Some(url) = lookup(&format!("{}_API_URL", prefix)) {
                platform.url = Some(url);
            }
            if let Some(key) = lookup(&format!("{}_API_KEY", prefix)) {
                platform.api_key = Some(key);
            }
        }
    }

    /// Checks cross-field constraints.
    ///
    /// Outside production an empty session secret is replaced by a random
    /// one, which invalidates sessions on every restart.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if self.session.secret.is_empty() && !self.production {
            warn!("SESSION_SECRET not set, using a random secret for this process");
            let mut bytes = [0u8; 64];
            rand::thread_rng().fill_bytes(&mut bytes);
            self.session.secret = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        }

        if self.session.secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::Invalid(format!(
                "session secret must be at least {} bytes",
                MIN_SECRET_BYTES
            )));
        }

        if self.populator.policy == PopulationPolicy::Upstream
            && self.populator.platforms.iter().all(|p| p.url.is_none())
        {
            warn!("Upstream population selected but no platform URL configured");
        }

        Ok(())
    }

    /// `host:port` for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
