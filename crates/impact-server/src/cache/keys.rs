//! Cache key derivation.

use std::fmt;

use axum::http::Uri;

/// Key de cache: path + query string del request, sin normalizar.
///
/// `/api/items?page=2` y `/api/items` son entradas distintas.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Crea una key a partir de un string arbitrario.
    ///
    /// # Examples
    ///
    /// ```
    /// use impact_server::cache::CacheKey;
    ///
    /// let key = CacheKey::new("/api/items?sort=name");
    /// assert_eq!(key.as_str(), "/api/items?sort=name");
    /// ```
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Deriva la key de un URI: path mas query string, tal cual.
    ///
    /// # Examples
    ///
    /// ```
    /// use axum::http::Uri;
    /// use impact_server::cache::CacheKey;
    ///
    /// let uri: Uri = "http://localhost:5000/api/items/42?full=true".parse().unwrap();
    /// assert_eq!(CacheKey::from_uri(&uri).as_str(), "/api/items/42?full=true");
    /// ```
    pub fn from_uri(uri: &Uri) -> Self {
        let key = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string());
        Self(key)
    }

    /// Retorna la key como &str.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CacheKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}
