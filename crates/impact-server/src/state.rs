//! Application state.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use impact_core::{Item, Post};

use crate::auth::{GoogleIdentityProvider, IdentityProvider, SessionStore};
use crate::cache::{CacheConfig, ResponseCache};
use crate::config::{ConfigError, MIN_SECRET_BYTES, ServerConfig};
use crate::populator::{CachePopulator, HttpPlatformSource, PlatformSource, PopulationPolicy};
use crate::store::{Collection, MemoryCollection};

/// Settings the HTTP layer reads on every request.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Frontend origin: CORS allow-origin and post-login redirect.
    pub frontend_url: String,
    /// Mark cookies `Secure`.
    pub secure_cookies: bool,
    /// TTL of responses stored by the cache middleware; `None` uses the cache default.
    pub route_ttl: Option<Duration>,
    pub max_body_bytes: usize,
    pub static_dir: Option<PathBuf>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:3000".to_string(),
            secure_cookies: false,
            route_ttl: Some(Duration::from_secs(300)),
            max_body_bytes: 2 * 1024 * 1024,
            static_dir: None,
        }
    }
}

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    cache: ResponseCache,
    items: Arc<dyn Collection<Item>>,
    posts: Arc<dyn Collection<Post>>,
    populator: Arc<CachePopulator>,
    sessions: SessionStore,
    identity: Arc<dyn IdentityProvider>,
    cookie_key: Key,
    http: Arc<HttpSettings>,
}

impl AppState {
    /// Creates a state with in-memory collections and default HTTP settings.
    pub fn new(
        cache: ResponseCache,
        populator: CachePopulator,
        identity: Arc<dyn IdentityProvider>,
        cookie_key: Key,
    ) -> Self {
        Self {
            cache,
            items: Arc::new(MemoryCollection::new("items")),
            posts: Arc::new(MemoryCollection::new("socialmediaposts")),
            populator: Arc::new(populator),
            sessions: SessionStore::new(Duration::from_secs(24 * 60 * 60)),
            identity,
            cookie_key,
            http: Arc::new(HttpSettings::default()),
        }
    }

    /// Wires the full state from configuration.
    pub fn from_config(config: &ServerConfig) -> Result<Self, ConfigError> {
        let cache = ResponseCache::new(CacheConfig {
            ttl_seconds: config.cache.ttl_seconds,
            max_capacity: config.cache.max_capacity,
        });

        let client =
            HttpPlatformSource::client(Duration::from_secs(config.populator.request_timeout_seconds))
                .map_err(|e| ConfigError::Invalid(format!("HTTP client: {}", e)))?;

        let populator = match config.populator.policy {
            PopulationPolicy::Synthetic => {
                CachePopulator::synthetic(config.populator.platforms.iter().map(|p| p.name.clone()))
            },
            PopulationPolicy::Upstream => {
                let sources = config
                    .populator
                    .platforms
                    .iter()
                    .map(|p| {
                        Arc::new(HttpPlatformSource::new(
                            p.name.clone(),
                            p.kind,
                            p.url.clone(),
                            p.api_key.clone(),
                            client.clone(),
                        )) as Arc<dyn PlatformSource>
                    })
                    .collect();
                CachePopulator::upstream(sources)
            },
        }
        .with_ttl(Duration::from_secs(config.cache.populate_ttl_seconds));

        let identity = Arc::new(GoogleIdentityProvider::new(config.google.clone(), client));

        // Key::derive_from entra en panic con menos de 32 bytes
        if config.session.secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::Invalid(format!(
                "session secret must be at least {} bytes",
                MIN_SECRET_BYTES
            )));
        }
        let cookie_key = Key::derive_from(config.session.secret.as_bytes());

        let route_ttl = Duration::from_secs(config.cache.route_ttl_seconds);

        Ok(Self::new(cache, populator, identity, cookie_key)
            .with_sessions(SessionStore::new(Duration::from_secs(
                config.session.ttl_seconds,
            )))
            .with_http_settings(HttpSettings {
                frontend_url: config.frontend_url.clone(),
                secure_cookies: config.production,
                route_ttl: Some(route_ttl),
                max_body_bytes: config.cache.max_body_bytes,
                static_dir: config.static_dir.clone(),
            }))
    }

    pub fn with_items(mut self, items: Arc<dyn Collection<Item>>) -> Self {
        self.items = items;
        self
    }

    pub fn with_posts(mut self, posts: Arc<dyn Collection<Post>>) -> Self {
        self.posts = posts;
        self
    }

    pub fn with_sessions(mut self, sessions: SessionStore) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn with_http_settings(mut self, http: HttpSettings) -> Self {
        self.http = Arc::new(http);
        self
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn items(&self) -> &dyn Collection<Item> {
        self.items.as_ref()
    }

    pub fn posts(&self) -> &dyn Collection<Post> {
        self.posts.as_ref()
    }

    pub fn populator(&self) -> &CachePopulator {
        &self.populator
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn identity(&self) -> &dyn IdentityProvider {
        self.identity.as_ref()
    }

    pub fn http(&self) -> &HttpSettings {
        &self.http
    }
}

/// Lets `SignedCookieJar` extract with the state's signing key.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
