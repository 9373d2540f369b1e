//! TTL response cache using Moka.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::{Body, Bytes};
use axum::http::{HeaderValue, header};
use axum::response::Response;
use moka::Expiry;
use moka::future::Cache;
use serde::Serialize;
use thiserror::Error;

use crate::cache::keys::CacheKey;
use crate::metrics::CacheMetrics;

/// Error del sistema de cache
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to serialize cached payload: {0}")]
    Serialize(String),
}

/// Configuracion del cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL por defecto en segundos (default: 300 = 5 minutos). 0 desactiva la expiracion.
    pub ttl_seconds: u64,
    /// Maximo numero de entries (default: 10000)
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 300,
            max_capacity: 10_000,
        }
    }
}

/// Payload almacenado: content type y body ya serializado.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl CachedResponse {
    pub fn new(content_type: Option<String>, body: impl Into<Bytes>) -> Self {
        Self {
            content_type,
            body: body.into(),
        }
    }

    /// Serializa un valor como JSON.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, CacheError> {
        let body = serde_json::to_vec(value).map_err(|e| CacheError::Serialize(e.to_string()))?;
        Ok(Self::new(Some("application/json".to_string()), body))
    }

    /// Construye una respuesta 200 con el body almacenado.
    pub fn to_response(&self) -> Response {
        let mut response = Response::new(Body::from(self.body.clone()));
        if let Some(value) = self
            .content_type
            .as_deref()
            .and_then(|ct| HeaderValue::from_str(ct).ok())
        {
            response.headers_mut().insert(header::CONTENT_TYPE, value);
        }
        response
    }
}

#[derive(Clone)]
struct Entry {
    value: Arc<CachedResponse>,
    ttl: Duration,
}

/// Politica de expiracion por entry: cada `set` fija su propio TTL.
struct PerEntryTtl;

impl PerEntryTtl {
    fn expiry_for(entry: &Entry) -> Option<Duration> {
        (!entry.ttl.is_zero()).then_some(entry.ttl)
    }
}

impl Expiry<CacheKey, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &CacheKey,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Self::expiry_for(value)
    }

    fn expire_after_update(
        &self,
        _key: &CacheKey,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Self::expiry_for(value)
    }
}

/// Cache de respuestas HTTP usando Moka.
/// Thread-safe y async-friendly; se pasa por referencia al router.
///
/// # Examples
///
/// ```no_run
/// use impact_server::cache::{CacheConfig, CacheKey, CachedResponse, ResponseCache};
///
/// # #[tokio::main]
/// # async fn main() {
/// let cache = ResponseCache::new(CacheConfig::default());
/// let key = CacheKey::new("/api/items");
///
/// cache.set(key.clone(), CachedResponse::json(&["a", "b"]).unwrap(), None).await;
/// if let Some(response) = cache.get(&key).await {
///     println!("Cache hit: {} bytes", response.body.len());
/// }
/// # }
/// ```
#[derive(Clone)]
pub struct ResponseCache {
    inner: Cache<CacheKey, Entry>,
    default_ttl: Duration,
    metrics: CacheMetrics,
}

impl ResponseCache {
    /// Crea un nuevo cache con la configuracion dada.
    pub fn new(config: CacheConfig) -> Self {
        let metrics = CacheMetrics::new();

        // Configurar listener para evictions
        let eviction_metrics = metrics.clone();
        let inner = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(PerEntryTtl)
            .eviction_listener(move |_key, _value, cause| {
                let reason = match cause {
                    moka::notification::RemovalCause::Expired => "ttl",
                    moka::notification::RemovalCause::Size => "capacity",
                    moka::notification::RemovalCause::Explicit => "manual",
                    moka::notification::RemovalCause::Replaced => "replaced",
                };
                eviction_metrics.record_eviction(reason);
            })
            .build();

        Self {
            inner,
            default_ttl: Duration::from_secs(config.ttl_seconds),
            metrics,
        }
    }

    /// TTL aplicado cuando `set` no recibe uno.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Obtiene un valor del cache si existe y no expiro.
    pub async fn get(&self, key: &CacheKey) -> Option<Arc<CachedResponse>> {
        let start = Instant::now();
        let result = self.inner.get(key).await.map(|entry| entry.value);

        if result.is_some() {
            self.metrics.record_hit(key.as_str());
        } else {
            self.metrics.record_miss(key.as_str());
        }

        self.metrics
            .record_operation_duration("get", start.elapsed());
        self.update_entry_gauge();

        result
    }

    /// Inserta o reemplaza un valor. `ttl = None` usa el TTL por defecto.
    pub async fn set(&self, key: CacheKey, value: CachedResponse, ttl: Option<Duration>) {
        let start = Instant::now();
        let entry = Entry {
            value: Arc::new(value),
            ttl: ttl.unwrap_or(self.default_ttl),
        };
        self.inner.insert(key, entry).await;

        self.metrics
            .record_operation_duration("set", start.elapsed());
        self.update_entry_gauge();
    }

    /// Invalida una entrada especifica.
    pub async fn del(&self, key: &CacheKey) {
        self.inner.invalidate(key).await;
    }

    /// Invalida una key dada como texto (path + query).
    pub async fn clear_cache(&self, key: &str) {
        self.del(&CacheKey::new(key)).await;
    }

    /// Invalida todas las entradas.
    pub fn flush(&self) {
        self.inner.invalidate_all();
    }

    /// Retorna el numero aproximado de entries en cache.
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Itera sobre las keys vivas del cache.
    /// Nota: Esta es una snapshot, entries pueden cambiar durante iteracion.
    pub fn keys(&self) -> impl Iterator<Item = Arc<CacheKey>> + '_ {
        self.inner.iter().map(|(key, _)| key)
    }

    /// Actualiza el gauge de entry count.
    fn update_entry_gauge(&self) {
        self.metrics.update_entry_count(self.inner.entry_count());
    }

    /// Retorna las metricas para acceso externo.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// Fuerza la ejecucion de tareas pendientes (limpieza de expiradas,
    /// actualizacion de `entry_count`).
    pub async fn sync(&self) {
        self.inner.run_pending_tasks().await;
    }
}
