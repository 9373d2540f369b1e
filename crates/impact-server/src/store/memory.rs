use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;

use super::{Collection, Document, StoreError, StoreResult, check_id};

/// Coleccion en memoria; conserva el orden de insercion.
pub struct MemoryCollection<T> {
    name: String,
    docs: RwLock<IndexMap<String, T>>,
}

impl<T: Document> MemoryCollection<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            docs: RwLock::new(IndexMap::new()),
        }
    }

    fn not_found(&self, id: &str) -> StoreError {
        StoreError::NotFound {
            collection: self.name.clone(),
            id: id.to_string(),
        }
    }
}

#[async_trait]
impl<T: Document> Collection<T> for MemoryCollection<T> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn find_all(&self) -> StoreResult<Vec<T>> {
        Ok(self.docs.read().values().cloned().collect())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<T>> {
        check_id(id)?;
        Ok(self.docs.read().get(id).cloned())
    }

    async fn insert(&self, doc: T) -> StoreResult<T> {
        check_id(doc.id())?;
        let mut docs = self.docs.write();
        if docs.contains_key(doc.id()) {
            return Err(StoreError::Duplicate {
                collection: self.name.clone(),
                id: doc.id().to_string(),
            });
        }
        docs.insert(doc.id().to_string(), doc.clone());
        Ok(doc)
    }

    async fn replace(&self, doc: T) -> StoreResult<T> {
        check_id(doc.id())?;
        let mut docs = self.docs.write();
        match docs.get_mut(doc.id()) {
            Some(slot) => {
                *slot = doc.clone();
                Ok(doc)
            },
            None => Err(self.not_found(doc.id())),
        }
    }

    async fn delete(&self, id: &str) -> StoreResult<Option<T>> {
        check_id(id)?;
        // shift_remove mantiene el orden del resto
        Ok(self.docs.write().shift_remove(id))
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.docs.read().len())
    }
}
