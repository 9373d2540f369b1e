//! Metricas HTTP por ruta, con el resultado del cache de respuestas.

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};
use metrics::{counter, histogram};
use std::time::Instant;

use crate::middleware::CACHE_STATUS_HEADER;

/// Resultado del cache para una respuesta: `HIT`, `MISS` o `BYPASS` cuando
/// la respuesta no paso por el cache (rutas fuera de `/api`, escrituras,
/// errores).
pub fn cache_outcome(response: &Response) -> &'static str {
    match response
        .headers()
        .get(&CACHE_STATUS_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        Some("HIT") => "HIT",
        Some("MISS") => "MISS",
        _ => "BYPASS",
    }
}

/// Cuenta requests y mide latencia por metodo, ruta y resultado del cache.
pub async fn http_metrics_middleware(
    matched_path: Option<MatchedPath>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    // La ruta (`/api/items/{id}`) y no el path concreto, para acotar cardinalidad
    let route = matched_path
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    let cache = cache_outcome(&response);

    counter!(
        "impact_http_requests_total",
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => response.status().as_u16().to_string(),
        "cache" => cache
    )
    .increment(1);

    histogram!(
        "impact_http_request_duration_seconds",
        "method" => method,
        "route" => route,
        "cache" => cache
    )
    .record(start.elapsed().as_secs_f64());

    response
}

pub fn register_http_metrics() {
    metrics::describe_counter!(
        "impact_http_requests_total",
        "HTTP requests by method, route, status and cache outcome"
    );
    metrics::describe_histogram!(
        "impact_http_request_duration_seconds",
        "HTTP latency in seconds; HIT vs MISS shows what the response cache saves"
    );
}
