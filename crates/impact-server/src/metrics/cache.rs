//! Metricas del cache de respuestas, la invalidacion y el populator.
//!
//! Los hits y misses se etiquetan por recurso (`/api/items`,
//! `/api/social-media-posts`, ...) y no por key completa, para que cada
//! documento o query string no abra una serie nueva.

use metrics::{counter, gauge, histogram};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Describe las series del cache. Se llama una vez desde `init_metrics`.
pub fn register_cache_metrics() {
    metrics::describe_counter!(
        "impact_cache_hits_total",
        "Cached responses served, by resource"
    );
    metrics::describe_counter!(
        "impact_cache_misses_total",
        "Cache lookups that fell through to the handler, by resource"
    );
    metrics::describe_counter!(
        "impact_cache_evictions_total",
        "Entries removed by moka, by cause (ttl, capacity, manual, replaced)"
    );
    metrics::describe_counter!(
        "impact_cache_invalidated_entries_total",
        "Entries dropped by write-path invalidation, by resource"
    );
    metrics::describe_counter!(
        "impact_cache_populations_total",
        "Populator runs, by data origin (synthetic, upstream, fallback)"
    );
    metrics::describe_gauge!(
        "impact_cache_populated_posts",
        "Posts stored by the last populator run"
    );
    metrics::describe_gauge!("impact_cache_entries", "Live entries in the response cache");
    metrics::describe_histogram!(
        "impact_cache_operation_seconds",
        "Time spent in cache get/set"
    );
}

/// Recurso al que pertenece una key: los dos primeros segmentos del path,
/// sin query string.
///
/// ```
/// use impact_server::metrics::cache::resource_label;
///
/// assert_eq!(resource_label("/api/items/42?fields=name"), "/api/items");
/// assert_eq!(resource_label("/api/social-media-data"), "/api/social-media-data");
/// ```
pub fn resource_label(key: &str) -> &str {
    let path = key.split_once('?').map_or(key, |(path, _)| path);
    match path.match_indices('/').nth(2) {
        Some((idx, _)) => &path[..idx],
        None => path,
    }
}

/// Contadores del cache de respuestas.
///
/// Cada registro va al recorder global de `metrics` y ademas a contadores
/// atomicos propios, para poder leer hit rate o invalidaciones sin recorder
/// instalado (tests, logs).
#[derive(Debug, Clone, Default)]
pub struct CacheMetrics {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    invalidated: Arc<AtomicU64>,
    populations: Arc<AtomicU64>,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self, key: &str) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!("impact_cache_hits_total", "resource" => resource_label(key).to_string())
            .increment(1);
    }

    pub fn record_miss(&self, key: &str) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!("impact_cache_misses_total", "resource" => resource_label(key).to_string())
            .increment(1);
    }

    pub fn record_eviction(&self, cause: &'static str) {
        counter!("impact_cache_evictions_total", "cause" => cause).increment(1);
    }

    /// Entradas borradas al invalidar `resource` tras una escritura.
    pub fn record_invalidation(&self, resource: &str, count: usize) {
        if count == 0 {
            return;
        }
        self.invalidated.fetch_add(count as u64, Ordering::Relaxed);
        counter!(
            "impact_cache_invalidated_entries_total",
            "resource" => resource_label(resource).to_string()
        )
        .increment(count as u64);
    }

    /// Una corrida del populator con su origen de datos.
    pub fn record_population(&self, origin: &'static str, posts: usize) {
        self.populations.fetch_add(1, Ordering::Relaxed);
        counter!("impact_cache_populations_total", "origin" => origin).increment(1);
        gauge!("impact_cache_populated_posts").set(posts as f64);
    }

    pub fn update_entry_count(&self, count: u64) {
        gauge!("impact_cache_entries").set(count as f64);
    }

    pub fn record_operation_duration(&self, operation: &'static str, duration: Duration) {
        histogram!("impact_cache_operation_seconds", "operation" => operation)
            .record(duration.as_secs_f64());
    }

    /// Fraccion de lookups servidos desde el cache; 0 sin trafico.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64;
        if total == 0.0 { 0.0 } else { hits / total }
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Total de entradas invalidadas por escrituras.
    pub fn invalidated(&self) -> u64 {
        self.invalidated.load(Ordering::Relaxed)
    }

    /// Corridas del populator registradas.
    pub fn populations(&self) -> u64 {
        self.populations.load(Ordering::Relaxed)
    }
}
