//! Cache populator.
//!
//! Arma la lista de `PlatformReport` que sirve `/api/social-media-data` y la
//! deja en el cache al arrancar. Dos politicas:
//!
//! - `synthetic`: datos generados localmente.
//! - `upstream`: una [`PlatformSource`] por plataforma; las que fallan o no
//!   traen posts se omiten, y si fallan todas se usa la politica sintetica.

mod synthetic;
mod transform;
mod upstream;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use impact_core::{PlatformReport, Post};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::cache::{CacheError, CacheKey, CachedResponse, ResponseCache};
use crate::store::{Collection, StoreError};

pub use synthetic::{POSTS_PER_PLATFORM, synthetic_posts, synthetic_report};
pub use transform::{FALLBACK_TOPIC, PlatformKind, classify_topic, transform};
pub use upstream::{HttpPlatformSource, PlatformSource, UpstreamError};

/// Ruta (y key de cache) de la agregacion por plataforma.
pub const SOCIAL_MEDIA_DATA_PATH: &str = "/api/social-media-data";

/// TTL por defecto de los datos poblados.
pub const DEFAULT_POPULATE_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PopulationPolicy {
    #[default]
    Synthetic,
    Upstream,
}

/// De donde salieron los datos de una corrida.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    Synthetic,
    Upstream,
    /// Politica upstream sin ninguna plataforma disponible.
    Fallback,
}

impl DataOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Synthetic => "synthetic",
            Self::Upstream => "upstream",
            Self::Fallback => "fallback",
        }
    }
}

/// Resultado de `populate`.
#[derive(Debug, Clone)]
pub struct PopulationOutcome {
    pub origin: DataOrigin,
    pub platforms: usize,
    pub posts: usize,
}

pub struct CachePopulator {
    policy: PopulationPolicy,
    platforms: Vec<String>,
    sources: Vec<Arc<dyn PlatformSource>>,
    key: CacheKey,
    ttl: Duration,
}

impl CachePopulator {
    /// Politica sintetica para las plataformas dadas.
    pub fn synthetic<I, S>(platforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            policy: PopulationPolicy::Synthetic,
            platforms: platforms.into_iter().map(Into::into).collect(),
            sources: Vec::new(),
            key: CacheKey::new(SOCIAL_MEDIA_DATA_PATH),
            ttl: DEFAULT_POPULATE_TTL,
        }
    }

    /// Politica upstream; el fallback sintetico usa los nombres de las fuentes.
    pub fn upstream(sources: Vec<Arc<dyn PlatformSource>>) -> Self {
        Self {
            policy: PopulationPolicy::Upstream,
            platforms: sources.iter().map(|s| s.platform().to_string()).collect(),
            sources,
            key: CacheKey::new(SOCIAL_MEDIA_DATA_PATH),
            ttl: DEFAULT_POPULATE_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn policy(&self) -> PopulationPolicy {
        self.policy
    }

    pub fn cache_key(&self) -> &CacheKey {
        &self.key
    }

    /// Arma los reportes segun la politica.
    pub async fn collect(&self) -> (DataOrigin, Vec<PlatformReport>) {
        match self.policy {
            PopulationPolicy::Synthetic => (DataOrigin::Synthetic, self.synthetic_reports(Utc::now())),
            PopulationPolicy::Upstream => {
                let reports = self.fetch_upstream().await;
                if reports.is_empty() {
                    warn!("No platform returned data, falling back to synthetic data");
                    (DataOrigin::Fallback, self.synthetic_reports(Utc::now()))
                } else {
                    (DataOrigin::Upstream, reports)
                }
            },
        }
    }

    /// Reportes listos para responder, sin importar el origen.
    pub async fn reports(&self) -> Vec<PlatformReport> {
        self.collect().await.1
    }

    /// Guarda los reportes en el cache bajo la key de la agregacion.
    #[instrument(skip_all, fields(key = %self.key))]
    pub async fn populate(&self, cache: &ResponseCache) -> Result<PopulationOutcome, CacheError> {
        info!(policy = ?self.policy, "Populating cache");
        let (origin, reports) = self.collect().await;

        let cached = CachedResponse::json(&reports)?;
        cache.set(self.key.clone(), cached, Some(self.ttl)).await;

        let outcome = PopulationOutcome {
            origin,
            platforms: reports.len(),
            posts: reports.iter().map(|r| r.data.posts.len()).sum(),
        };
        cache
            .metrics()
            .record_population(outcome.origin.as_str(), outcome.posts);
        info!(
            origin = outcome.origin.as_str(),
            platforms = outcome.platforms,
            posts = outcome.posts,
            "Cache populated"
        );
        Ok(outcome)
    }

    /// Copia los posts de una corrida a `posts` si la coleccion esta vacia.
    /// Retorna cuantos se insertaron.
    pub async fn seed_posts(&self, posts: &dyn Collection<Post>) -> Result<usize, StoreError> {
        if posts.count().await? > 0 {
            return Ok(0);
        }

        let mut inserted = 0;
        for report in self.reports().await {
            for post in report.data.posts {
                posts.insert(post).await?;
                inserted += 1;
            }
        }
        info!(collection = posts.name(), inserted, "Posts collection seeded");
        Ok(inserted)
    }

    async fn fetch_upstream(&self) -> Vec<PlatformReport> {
        let mut reports = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            match source.fetch().await {
                Ok(posts) if posts.is_empty() => {
                    warn!(platform = source.platform(), "Platform returned no posts, omitting");
                },
                Ok(posts) => reports.push(PlatformReport::new(source.platform(), posts)),
                Err(e) => {
                    warn!(platform = source.platform(), error = %e, "Platform fetch failed, omitting");
                },
            }
        }

        reports
    }

    // Sin await: ThreadRng no es Send
    fn synthetic_reports(&self, now: DateTime<Utc>) -> Vec<PlatformReport> {
        let mut rng = rand::thread_rng();
        self.platforms
            .iter()
            .map(|platform| synthetic_report(platform, now, &mut rng))
            .collect()
    }
}
