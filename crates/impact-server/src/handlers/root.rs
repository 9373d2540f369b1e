use axum::Json;
use axum::http::StatusCode;

use super::MessageResponse;

pub async fn welcome() -> &'static str {
    "Welcome to the API"
}

/// Fallback sin frontend estatico configurado.
pub async fn not_found() -> (StatusCode, Json<MessageResponse>) {
    (StatusCode::NOT_FOUND, Json(MessageResponse::new("Not Found")))
}
