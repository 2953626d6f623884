//! Storage backend abstraction for the document store.
//!
//! This module defines the traits that abstract over storage implementations,
//! allowing the service to run against an in-memory map or a MongoDB deployment.
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for storage backends
//! - [`DynStoreBackend`]: A trait for dynamic dispatch over backend implementations
//! - [`StoreBackendBuilder`]: Factory trait for creating backend instances
//!
//! # Examples
//!
//! ```ignore
//! use shelfwatch_core::backend::StoreBackend;
//! use bson::{doc, oid::ObjectId};
//!
//! let backend = MyBackendImpl::new();
//!
//! let id = ObjectId::new();
//! backend.insert_document(id, doc! { "_id": id, "email": "a@x.com" }, "Items").await?;
//! let found = backend.get_document(id, "Items").await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::{Bson, Document as BsonDocument, oid::ObjectId};
use std::fmt::Debug;

use crate::{error::DocumentStoreResult, query::Query};

/// Abstract interface for document storage backends.
///
/// Every operation touches a single collection, and every mutation touches at
/// most one document, so implementations only need per-operation atomicity.
///
/// # Thread Safety
///
/// All implementations must be thread-safe and support concurrent access from multiple
/// async tasks. The concurrency model is implementation-specific.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts a new document into a collection.
    ///
    /// The stored document always carries `id` under the `_id` key, whatever
    /// `document` contains for that key.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentAlreadyExists`](crate::error::DocumentStoreError::DocumentAlreadyExists)
    /// if a document with the same identifier is already stored.
    async fn insert_document(
        &self,
        id: ObjectId,
        document: BsonDocument,
        collection: &str,
    ) -> DocumentStoreResult<()>;

    /// Retrieves a single document by identifier, or `None` if it does not exist.
    async fn get_document(
        &self,
        id: ObjectId,
        collection: &str,
    ) -> DocumentStoreResult<Option<BsonDocument>>;

    /// Queries documents in a collection using a structured query.
    ///
    /// Applies the filter expression, then the sort specification, then the limit.
    /// Without a sort the result order is backend-defined.
    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<BsonDocument>>;

    /// Sets the given fields on the document with identifier `id`, leaving every
    /// other field untouched.
    ///
    /// # Returns
    ///
    /// The number of documents matched (0 or 1).
    async fn patch_document(
        &self,
        id: ObjectId,
        fields: BsonDocument,
        collection: &str,
    ) -> DocumentStoreResult<u64>;

    /// Deletes the document with identifier `id`.
    ///
    /// # Returns
    ///
    /// The number of documents deleted (0 or 1).
    async fn delete_document(&self, id: ObjectId, collection: &str) -> DocumentStoreResult<u64>;

    /// Groups every document in the collection by the value of `field` and counts
    /// each group.
    ///
    /// Documents missing the field are grouped under [`Bson::Null`]. Group order is
    /// unspecified.
    async fn count_by_field(
        &self,
        collection: &str,
        field: &str,
    ) -> DocumentStoreResult<Vec<(Bson, u64)>>;

    /// Creates an ascending index on a field in a collection.
    ///
    /// Creating an index that already exists is not an error. Backends without
    /// index support treat this as a no-op.
    async fn add_index(
        &self,
        collection: &str,
        field: &str,
        unique: bool,
    ) -> DocumentStoreResult<()>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// The default implementation is a no-op, but backends with external
    /// connections should override this.
    async fn shutdown(self) -> DocumentStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
pub trait DynStoreBackend: Send + Sync + Debug {
    async fn insert_document(
        &self,
        id: ObjectId,
        document: BsonDocument,
        collection: &str,
    ) -> DocumentStoreResult<()>;
    async fn get_document(
        &self,
        id: ObjectId,
        collection: &str,
    ) -> DocumentStoreResult<Option<BsonDocument>>;
    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<BsonDocument>>;
    async fn patch_document(
        &self,
        id: ObjectId,
        fields: BsonDocument,
        collection: &str,
    ) -> DocumentStoreResult<u64>;
    async fn delete_document(&self, id: ObjectId, collection: &str) -> DocumentStoreResult<u64>;
    async fn count_by_field(
        &self,
        collection: &str,
        field: &str,
    ) -> DocumentStoreResult<Vec<(Bson, u64)>>;
    async fn add_index(
        &self,
        collection: &str,
        field: &str,
        unique: bool,
    ) -> DocumentStoreResult<()>;
    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()>;
}

#[async_trait]
impl<B: StoreBackend + Send + Sync + 'static> DynStoreBackend for B {
    async fn insert_document(
        &self,
        id: ObjectId,
        document: BsonDocument,
        collection: &str,
    ) -> DocumentStoreResult<()> {
        StoreBackend::insert_document(self, id, document, collection).await
    }

    async fn get_document(
        &self,
        id: ObjectId,
        collection: &str,
    ) -> DocumentStoreResult<Option<BsonDocument>> {
        StoreBackend::get_document(self, id, collection).await
    }

    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<BsonDocument>> {
        StoreBackend::query_documents(self, query, collection).await
    }

    async fn patch_document(
        &self,
        id: ObjectId,
        fields: BsonDocument,
        collection: &str,
    ) -> DocumentStoreResult<u64> {
        StoreBackend::patch_document(self, id, fields, collection).await
    }

    async fn delete_document(&self, id: ObjectId, collection: &str) -> DocumentStoreResult<u64> {
        StoreBackend::delete_document(self, id, collection).await
    }

    async fn count_by_field(
        &self,
        collection: &str,
        field: &str,
    ) -> DocumentStoreResult<Vec<(Bson, u64)>> {
        StoreBackend::count_by_field(self, collection, field).await
    }

    async fn add_index(
        &self,
        collection: &str,
        field: &str,
        unique: bool,
    ) -> DocumentStoreResult<()> {
        StoreBackend::add_index(self, collection, field, unique).await
    }

    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()> {
        StoreBackend::shutdown(*self).await
    }
}

#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
