//! Middleware de cache de respuestas.
//!
//! Las requests GET se buscan por path + query string. En un hit se responde
//! desde el cache sin llamar al handler; en un miss se llama al handler y,
//! si la respuesta es 2xx y el body cabe en el limite, se guarda.
//! Los demas metodos pasan directo.

use std::convert::Infallible;
use std::task::{Context, Poll};
use std::time::Duration;

use axum::{
    body::{Body, HttpBody},
    extract::OriginalUri,
    http::{HeaderName, HeaderValue, Method, Request, Response, header},
    response::IntoResponse,
};
use tower::{Layer, Service};
use tracing::{debug, warn};

use crate::cache::{CacheKey, CachedResponse, ResponseCache};
use crate::error::AppError;

/// `HIT` o `MISS` segun de donde salio la respuesta.
pub static CACHE_STATUS_HEADER: HeaderName = HeaderName::from_static("x-cache");

/// Layer que cachea respuestas GET exitosas.
#[derive(Clone)]
pub struct ResponseCacheLayer {
    cache: ResponseCache,
    ttl: Option<Duration>,
    max_body_bytes: usize,
}

impl ResponseCacheLayer {
    /// `ttl = None` usa el TTL por defecto del cache.
    pub fn new(cache: ResponseCache, ttl: Option<Duration>, max_body_bytes: usize) -> Self {
        Self {
            cache,
            ttl,
            max_body_bytes,
        }
    }
}

impl<S> Layer<S> for ResponseCacheLayer {
    type Service = ResponseCacheMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ResponseCacheMiddleware {
            inner,
            cache: self.cache.clone(),
            ttl: self.ttl,
            max_body_bytes: self.max_body_bytes,
        }
    }
}

#[derive(Clone)]
pub struct ResponseCacheMiddleware<S> {
    inner: S,
    cache: ResponseCache,
    ttl: Option<Duration>,
    max_body_bytes: usize,
}

fn cache_key(request: &Request<Body>) -> CacheKey {
    match request.extensions().get::<OriginalUri>() {
        Some(OriginalUri(uri)) => CacheKey::from_uri(uri),
        None => CacheKey::from_uri(request.uri()),
    }
}

fn mark(response: &mut Response<Body>, status: &'static str) {
    response
        .headers_mut()
        .insert(CACHE_STATUS_HEADER.clone(), HeaderValue::from_static(status));
}

impl<S> Service<Request<Body>> for ResponseCacheMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>, Error = Infallible>
        + Clone
        + Send
        + 'static,
    S::Future: Send + 'static,
{
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        if request.method() != Method::GET {
            return Box::pin(self.inner.call(request));
        }

        let key = cache_key(&request);
        let cache = self.cache.clone();
        let ttl = self.ttl;
        let max_body_bytes = self.max_body_bytes;
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if let Some(cached) = cache.get(&key).await {
                debug!(key = %key, "Serving response from cache");
                let mut response = cached.to_response();
                mark(&mut response, "HIT");
                return Ok(response);
            }

            let response = inner.call(request).await?;

            if !response.status().is_success() {
                return Ok(response);
            }

            let fits = response
                .body()
                .size_hint()
                .upper()
                .is_some_and(|len| len <= max_body_bytes as u64);
            if !fits {
                debug!(key = %key, "Response body too large or unbounded, not caching");
                return Ok(response);
            }

            let (mut parts, body) = response.into_parts();
            let bytes = match axum::body::to_bytes(body, max_body_bytes).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(key = %key, error = %e, "Failed to buffer response body");
                    return Ok(AppError::Internal(e.to_string()).into_response());
                },
            };

            let content_type = parts
                .headers
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(String::from);

            debug!(key = %key, bytes = bytes.len(), "Caching response");
            cache
                .set(key, CachedResponse::new(content_type, bytes.clone()), ttl)
                .await;

            parts.headers.insert(
                CACHE_STATUS_HEADER.clone(),
                HeaderValue::from_static("MISS"),
            );
            Ok(Response::from_parts(parts, Body::from(bytes)))
        })
    }
}
