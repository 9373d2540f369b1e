//! Persistencia de documentos.
//!
//! Las rutas CRUD dependen solo del trait [`Collection`]; el servidor usa la
//! implementacion en memoria [`MemoryCollection`].

mod memory;

use async_trait::async_trait;
use impact_core::{Item, Post};
use thiserror::Error;

pub use memory::MemoryCollection;

/// Errores de persistencia.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{collection} document '{id}' not found")]
    NotFound { collection: String, id: String },

    #[error("{collection} document '{id}' already exists")]
    Duplicate { collection: String, id: String },

    #[error("invalid document id '{0}'")]
    InvalidId(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Documento persistible con id string.
pub trait Document: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
}

impl Document for Item {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Document for Post {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Coleccion de documentos de un tipo.
#[async_trait]
pub trait Collection<T: Document>: Send + Sync {
    /// Nombre de la coleccion (para logs y errores).
    fn name(&self) -> &str;

    /// Todos los documentos, en orden de insercion.
    async fn find_all(&self) -> StoreResult<Vec<T>>;

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<T>>;

    /// Inserta un documento nuevo; falla si el id ya existe.
    async fn insert(&self, doc: T) -> StoreResult<T>;

    /// Reemplaza un documento existente; falla si no existe.
    async fn replace(&self, doc: T) -> StoreResult<T>;

    /// Elimina y retorna el documento, `None` si no existia.
    async fn delete(&self, id: &str) -> StoreResult<Option<T>>;

    async fn count(&self) -> StoreResult<usize>;
}

/// Genera un id nuevo: UUID v7, ordenable por tiempo de creacion.
pub fn new_id() -> String {
    uuid::Uuid::now_v7().simple().to_string()
}

/// Rechaza ids vacios o absurdamente largos antes de tocar el store.
pub fn check_id(id: &str) -> StoreResult<()> {
    if id.is_empty() || id.len() > 128 || id.chars().any(char::is_control) {
        return Err(StoreError::InvalidId(id.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_unique() {
        let a = new_id();
        let b = new_id();

        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_check_id() {
        assert!(check_id("facebook_post_1").is_ok());
        assert!(check_id("").is_err());
        assert!(check_id(&"a".repeat(200)).is_err());
        assert!(check_id("bad\nid").is_err());
    }
}
