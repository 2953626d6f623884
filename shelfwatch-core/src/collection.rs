//! Typed collection access for document store operations.
//!
//! A [`TypedCollection`] binds a [`Document`] type to its collection and converts
//! between the typed record and the BSON documents the backend stores.
//!
//! # Example
//!
//! ```ignore
//! # async fn example(store: &shelfwatch_core::store::DocumentStore) -> shelfwatch_core::error::DocumentStoreResult<()> {
//! let badges = store.typed_collection::<Badge>();
//! let badge = Badge { id: ObjectId::new(), label: "night shift".to_string() };
//! badges.insert(&badge).await?;
//! assert!(badges.get(badge.id).await?.is_some());
//! # Ok(()) }
//! ```

use bson::{Bson, Document as BsonDocument, oid::ObjectId};
use std::marker::PhantomData;

use crate::{
    backend::DynStoreBackend,
    document::{Document, DocumentExt},
    error::DocumentStoreResult,
    query::Query,
};

/// A type-safe collection for a specific document type, backed by a
/// dynamically dispatched backend.
#[derive(Debug)]
pub struct TypedCollection<'a, D: Document> {
    name: &'static str,
    backend: &'a dyn DynStoreBackend,
    _marker: PhantomData<D>,
}

impl<'a, D: Document> TypedCollection<'a, D> {
    pub(crate) fn new(backend: &'a dyn DynStoreBackend) -> Self {
        Self { name: D::collection_name(), backend, _marker: PhantomData }
    }

    /// Inserts a new document into the collection.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if serialization or insertion fails.
    pub async fn insert(&self, document: &D) -> DocumentStoreResult<()> {
        self.backend
            .insert_document(*document.id(), document.to_document()?, self.name)
            .await
    }

    /// Retrieves the document with the given identifier, if it exists.
    pub async fn get(&self, id: ObjectId) -> DocumentStoreResult<Option<D>> {
        self.backend
            .get_document(id, self.name)
            .await?
            .map(D::from_document)
            .transpose()
    }

    /// Queries documents in the collection using a structured query.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if deserialization or query fails.
    pub async fn query(&self, query: Query) -> DocumentStoreResult<Vec<D>> {
        self.backend
            .query_documents(query, self.name)
            .await?
            .into_iter()
            .map(D::from_document)
            .collect::<DocumentStoreResult<Vec<D>>>()
    }

    /// Sets `fields` on the document with the given identifier.
    ///
    /// Returns `true` if a document matched the identifier.
    pub async fn patch(&self, id: ObjectId, fields: BsonDocument) -> DocumentStoreResult<bool> {
        Ok(self
            .backend
            .patch_document(id, fields, self.name)
            .await? > 0)
    }

    /// Deletes the document with the given identifier.
    ///
    /// Returns `true` if a document was removed.
    pub async fn delete(&self, id: ObjectId) -> DocumentStoreResult<bool> {
        Ok(self
            .backend
            .delete_document(id, self.name)
            .await? > 0)
    }

    /// Counts the documents of this collection grouped by the value of `field`.
    pub async fn count_by(&self, field: &str) -> DocumentStoreResult<Vec<(Bson, u64)>> {
        self.backend
            .count_by_field(self.name, field)
            .await
    }
}
