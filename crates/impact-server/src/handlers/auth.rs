//! Google sign-in and session endpoints.

use axum::{
    Json,
    extract::{Query, State},
    response::Redirect,
};
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use serde::Deserialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::MessageResponse;
use crate::auth::{SESSION_COOKIE, STATE_COOKIE, UserProfile};
use crate::error::AppError;
use crate::state::AppState;

/// Destino del navegador cuando falla el login.
pub const LOGIN_FAILURE_PATH: &str = "/login";

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

fn auth_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .path("/")
        .build()
}

fn removal(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

/// Inicia el handshake OAuth.
#[instrument(skip_all)]
pub async fn google_login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Redirect), AppError> {
    let oauth_state = Uuid::new_v4().simple().to_string();
    let url = state
        .identity()
        .authorize_url(&oauth_state)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let jar = jar.add(auth_cookie(
        STATE_COOKIE,
        oauth_state,
        state.http().secure_cookies,
    ));
    Ok((jar, Redirect::to(&url)))
}

/// Cierra el handshake: valida `state`, canjea `code` y abre la sesion.
#[instrument(skip_all)]
pub async fn google_callback(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(params): Query<CallbackParams>,
) -> (SignedCookieJar, Redirect) {
    let expected = jar.get(STATE_COOKIE).map(|c| c.value().to_string());
    let jar = jar.remove(removal(STATE_COOKIE));

    if let Some(error) = params.error {
        warn!(error = %error, "Identity provider returned an error");
        return (jar, Redirect::to(LOGIN_FAILURE_PATH));
    }

    let (Some(code), Some(returned)) = (params.code, params.state) else {
        warn!("Callback without code or state");
        return (jar, Redirect::to(LOGIN_FAILURE_PATH));
    };

    if expected.as_deref() != Some(returned.as_str()) {
        warn!("OAuth state mismatch");
        return (jar, Redirect::to(LOGIN_FAILURE_PATH));
    }

    let profile = match state.identity().authenticate(&code).await {
        Ok(profile) => profile,
        Err(e) => {
            warn!(provider = state.identity().name(), error = %e, "Sign-in failed");
            return (jar, Redirect::to(LOGIN_FAILURE_PATH));
        },
    };

    info!(user = %profile.id, provider = state.identity().name(), "User signed in");
    let session_id = state.sessions().create(profile).await;
    let jar = jar.add(auth_cookie(
        SESSION_COOKIE,
        session_id,
        state.http().secure_cookies,
    ));

    (jar, Redirect::to(&state.http().frontend_url))
}

pub async fn current_user(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Json<UserProfile>, AppError> {
    state
        .sessions()
        .resolve(&jar)
        .await
        .map(Json)
        .ok_or(AppError::Unauthorized)
}

#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> (SignedCookieJar, Json<MessageResponse>) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions().destroy(cookie.value()).await;
    }

    (
        jar.remove(removal(SESSION_COOKIE)),
        Json(MessageResponse::new("Logged out successfully")),
    )
}
