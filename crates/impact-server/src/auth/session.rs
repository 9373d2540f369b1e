use std::time::Duration;

use axum_extra::extract::cookie::SignedCookieJar;
use moka::future::Cache;
use tracing::debug;
use uuid::Uuid;

use super::UserProfile;

/// Cookie firmada con el id de sesion.
pub const SESSION_COOKIE: &str = "impact.sid";

/// Cookie firmada con el `state` OAuth entre login y callback.
pub const STATE_COOKIE: &str = "impact.oauth_state";

/// Sesiones del lado del servidor. Expiran `ttl` despues de creadas.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<String, UserProfile>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Cache::builder().time_to_live(ttl).build(),
        }
    }

    /// Abre una sesion y retorna su id.
    pub async fn create(&self, profile: UserProfile) -> String {
        let id = Uuid::new_v4().simple().to_string();
        debug!(user = %profile.id, "Session created");
        self.sessions.insert(id.clone(), profile).await;
        id
    }

    pub async fn get(&self, id: &str) -> Option<UserProfile> {
        self.sessions.get(id).await
    }

    pub async fn destroy(&self, id: &str) {
        self.sessions.invalidate(id).await;
    }

    /// Usuario detras de la cookie de sesion de la request.
    ///
    /// El jar descarta cookies sin firma o alteradas; nunca llegan al lookup.
    pub async fn resolve(&self, jar: &SignedCookieJar) -> Option<UserProfile> {
        let cookie = jar.get(SESSION_COOKIE)?;
        self.get(cookie.value()).await
    }
}
