//! Metrics setup and initialization.

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use tracing::info;

use super::{cache::register_cache_metrics, http::register_http_metrics};

/// Buckets (segundos) para operaciones del cache en memoria.
const CACHE_OPERATION_BUCKETS: &[f64] = &[
    0.000_01, 0.000_05, 0.0001, 0.0005, 0.001, 0.005, 0.01,
];

/// Buckets (segundos) para requests HTTP; un MISS de `/api/social-media-data`
/// puede esperar a las APIs de las plataformas.
const HTTP_REQUEST_BUCKETS: &[f64] = &[
    0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Instala el recorder global y retorna el handle para `/metrics`.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("impact_cache_".to_string()),
            CACHE_OPERATION_BUCKETS,
        )?
        .set_buckets_for_metric(
            Matcher::Full("impact_http_request_duration_seconds".to_string()),
            HTTP_REQUEST_BUCKETS,
        )?
        .install_recorder()?;

    register_cache_metrics();
    register_http_metrics();

    info!("Metrics system initialized");
    Ok(handle)
}

/// Handle sin recorder global instalado (tests y routers embebidos).
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}
