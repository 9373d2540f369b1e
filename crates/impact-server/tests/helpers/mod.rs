//! Test helpers para impact-server.

#![allow(dead_code)]

mod client;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{Router, extract::FromRef, http::header, response::IntoResponse};
use axum_extra::extract::cookie::{Cookie, Key, SignedCookieJar};
use impact_server::{
    AppState,
    auth::{AuthError, IdentityProvider, SESSION_COOKIE, UserProfile},
    cache::{CacheConfig, ResponseCache},
    create_router_with_state,
    metrics::setup::detached_handle,
    populator::CachePopulator,
};

pub use client::{TestClient, TestResponse};

/// Codigo que `StaticIdentityProvider` acepta.
pub const VALID_CODE: &str = "valid-code";

pub fn profile() -> UserProfile {
    UserProfile {
        id: "google-oauth2|1001".to_string(),
        display_name: "Test User".to_string(),
        email: Some("test.user@example.com".to_string()),
        picture: None,
    }
}

/// Proveedor de identidad falso: acepta solo `VALID_CODE`.
pub struct StaticIdentityProvider {
    profile: UserProfile,
    calls: AtomicUsize,
}

impl StaticIdentityProvider {
    pub fn new(profile: UserProfile) -> Self {
        Self {
            profile,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn authorize_url(&self, state: &str) -> Result<String, AuthError> {
        Ok(format!("https://idp.test/authorize?state={}", state))
    }

    async fn authenticate(&self, code: &str) -> Result<UserProfile, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if code == VALID_CODE {
            Ok(self.profile.clone())
        } else {
            Err(AuthError::Exchange("invalid_grant".to_string()))
        }
    }
}

/// Estado con colecciones en memoria, datos sinteticos y proveedor falso.
pub fn test_state() -> AppState {
    let cache = ResponseCache::new(CacheConfig::default());
    let populator = CachePopulator::synthetic(["Facebook", "LinkedIn", "Platform X"]);
    let identity = Arc::new(StaticIdentityProvider::new(profile()));
    let key = Key::from(&[0x42u8; 64][..]);

    AppState::new(cache, populator, identity, key)
}

pub fn app(state: &AppState) -> Router {
    create_router_with_state(state.clone(), detached_handle())
}

/// Cliente sin sesion.
pub fn client(state: &AppState) -> TestClient {
    TestClient::new(app(state))
}

/// Abre una sesion y retorna el par `name=value` de la cookie firmada.
pub async fn session_cookie(state: &AppState) -> String {
    let session_id = state.sessions().create(profile()).await;

    let jar = SignedCookieJar::new(Key::from_ref(state)).add(Cookie::new(SESSION_COOKIE, session_id));
    let response = jar.into_response();

    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("signed session cookie")
        .to_string()
}

/// Cliente con una sesion valida.
pub async fn authed_client(state: &AppState) -> TestClient {
    let cookie = session_cookie(state).await;
    client(state).with_cookie(cookie)
}
