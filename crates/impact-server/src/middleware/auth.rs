//! Guard de sesion para las rutas `/api`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::debug;

use crate::auth::UserProfile;
use crate::error::AppError;
use crate::state::AppState;

/// Usuario autenticado, disponible como extension de la request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserProfile);

/// Deja pasar solo requests con una sesion valida.
///
/// Va por fuera del cache de respuestas: una request sin sesion nunca ve
/// datos cacheados.
pub async fn require_session(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    match state.sessions().resolve(&jar).await {
        Some(user) => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        },
        None => {
            debug!(path = %request.uri().path(), "Rejected request without session");
            AppError::Unauthorized.into_response()
        },
    }
}
