//! Middleware stack para el servidor HTTP.
//!
//! Globales (todas las requests):
//! - `RequestIdLayer`: genera/propaga X-Request-Id
//! - `LoggingLayer`: logging estructurado de requests
//!
//! Solo rutas `/api`:
//! - `require_session`: rechaza requests sin sesion con 401
//! - `ResponseCacheLayer`: cache de respuestas GET por path + query

mod auth;
mod logging;
mod request_id;
mod response_cache;

pub use auth::{CurrentUser, require_session};
pub use logging::{LoggingLayer, LoggingMiddleware};
pub use request_id::{REQUEST_ID_HEADER, RequestIdLayer, RequestIdMiddleware};
pub use response_cache::{CACHE_STATUS_HEADER, ResponseCacheLayer, ResponseCacheMiddleware};
