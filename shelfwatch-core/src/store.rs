//! The document store handle shared by the service.
//!
//! [`DocumentStore`] owns a dynamically dispatched backend so the backend can be
//! chosen at runtime (for example from configuration) while handlers stay
//! backend-agnostic.

use crate::{
    backend::{DynStoreBackend, StoreBackend},
    collection::TypedCollection,
    document::Document,
    error::DocumentStoreResult,
};

/// A document store bound to a runtime-selected backend.
///
/// # Example
///
/// ```ignore
/// use shelfwatch_core::store::DocumentStore;
/// use shelfwatch_memory::InMemoryStore;
///
/// let store = DocumentStore::new(InMemoryStore::new());
/// let badges = store.typed_collection::<Badge>();
/// ```
#[derive(Debug)]
pub struct DocumentStore {
    backend: Box<dyn DynStoreBackend>,
}

impl DocumentStore {
    /// Creates a store around a concrete backend.
    pub fn new<B: StoreBackend + 'static>(backend: B) -> Self {
        Self { backend: Box::new(backend) }
    }

    /// Returns a typed collection for documents of type `D`.
    pub fn typed_collection<D: Document>(&self) -> TypedCollection<'_, D> {
        TypedCollection::new(self.backend.as_ref())
    }

    /// Creates an ascending index on a field in a collection.
    ///
    /// # Arguments
    ///
    /// * `collection` - The name of the collection
    /// * `field` - The name of the field to index
    /// * `unique` - Whether the index enforces uniqueness
    pub async fn add_index(
        &self,
        collection: &str,
        field: &str,
        unique: bool,
    ) -> DocumentStoreResult<()> {
        self.backend
            .add_index(collection, field, unique)
            .await
    }

    /// Shuts down the underlying backend, closing any external connections.
    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        self.backend.shutdown_boxed().await
    }
}
