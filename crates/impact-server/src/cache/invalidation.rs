//! Cache invalidation with pattern matching support.

use glob::Pattern;
use tracing::{debug, info};

use crate::cache::{CacheKey, ResponseCache};

/// Resultado de una operación de invalidación.
#[derive(Debug, Clone)]
pub struct InvalidationResult {
    /// Número de entries invalidadas.
    pub count: usize,
    /// Patrones aplicados.
    pub patterns: Vec<String>,
}

/// Patron glob que coincide con `path` seguido de cualquier query string.
///
/// `[?]` es un `?` literal, de modo que `/api/items` no coincide con
/// `/api/items/42`.
///
/// # Examples
///
/// ```
/// use impact_server::cache::query_variants_pattern;
///
/// let pattern = glob::Pattern::new(&query_variants_pattern("/api/items")).unwrap();
/// assert!(pattern.matches("/api/items?page=2"));
/// assert!(!pattern.matches("/api/items/42"));
/// ```
pub fn query_variants_pattern(path: &str) -> String {
    format!("{}[?]*", Pattern::escape(path))
}

impl ResponseCache {
    /// Invalida la key exacta `path` y todas sus variantes con query string.
    ///
    /// Es la invalidación que usan las rutas de escritura para la key de la
    /// colección y la del documento.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use impact_server::cache::{CacheConfig, ResponseCache};
    /// # #[tokio::main]
    /// # async fn main() {
    /// # let cache = ResponseCache::new(CacheConfig::default());
    /// let result = cache.invalidate_resource("/api/items").await;
    /// println!("Invalidated {} entries", result.count);
    /// # }
    /// ```
    pub async fn invalidate_resource(&self, path: &str) -> InvalidationResult {
        let exact = CacheKey::new(path);
        let had_exact = self.inner_contains(&exact);
        self.del(&exact).await;

        let variants = self.invalidate_by_pattern(&query_variants_pattern(path)).await;
        let count = variants.count + usize::from(had_exact);
        self.metrics().record_invalidation(path, count);

        InvalidationResult {
            count,
            patterns: std::iter::once(path.to_string())
                .chain(variants.patterns)
                .collect(),
        }
    }

    /// Invalida varios recursos a la vez.
    pub async fn invalidate_resources(&self, paths: &[&str]) -> InvalidationResult {
        let mut total_count = 0;
        let mut all_patterns = Vec::new();

        for path in paths {
            let result = self.invalidate_resource(path).await;
            total_count += result.count;
            all_patterns.extend(result.patterns);
        }

        InvalidationResult {
            count: total_count,
            patterns: all_patterns,
        }
    }

    /// Invalida entradas usando un patrón glob sobre la key completa.
    ///
    /// - `*`: coincide con cualquier secuencia de caracteres (incluido `/`)
    /// - `?`: coincide con un carácter
    /// - `[?]`: coincide con un `?` literal
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use impact_server::cache::{CacheConfig, ResponseCache};
    /// # #[tokio::main]
    /// # async fn main() {
    /// # let cache = ResponseCache::new(CacheConfig::default());
    /// // Invalida todo lo que cuelga de /api/social-media-posts
    /// let result = cache.invalidate_by_pattern("/api/social-media-posts*").await;
    /// # }
    /// ```
    pub async fn invalidate_by_pattern(&self, pattern_str: &str) -> InvalidationResult {
        let pattern = match Pattern::new(pattern_str) {
            Ok(p) => p,
            Err(e) => {
                debug!(pattern = %pattern_str, error = %e, "Invalid glob pattern");
                return InvalidationResult {
                    count: 0,
                    patterns: vec![pattern_str.to_string()],
                };
            },
        };

        // Recolectar primero: no invalidar mientras se itera
        let invalidated_keys: Vec<CacheKey> = self
            .keys()
            .filter(|key| pattern.matches(key.as_str()))
            .map(|key| (*key).clone())
            .collect();

        let count = invalidated_keys.len();
        for key in invalidated_keys {
            self.del(&key).await;
        }

        if count > 0 {
            info!(
                pattern = %pattern_str,
                count = count,
                "Cache entries invalidated by pattern"
            );
        }

        InvalidationResult {
            count,
            patterns: vec![pattern_str.to_string()],
        }
    }

    /// Invalida múltiples patrones a la vez.
    pub async fn invalidate_by_patterns(&self, patterns: &[&str]) -> InvalidationResult {
        let mut total_count = 0;
        let mut all_patterns = Vec::new();

        for pattern_str in patterns {
            let result = self.invalidate_by_pattern(pattern_str).await;
            total_count += result.count;
            all_patterns.extend(result.patterns);
        }

        InvalidationResult {
            count: total_count,
            patterns: all_patterns,
        }
    }

    fn inner_contains(&self, key: &CacheKey) -> bool {
        self.keys().any(|k| *k == *key)
    }
}
