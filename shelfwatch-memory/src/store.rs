//! In-memory storage implementation for document stores.
//!
//! This module provides a simple in-memory backend that stores documents as
//! BSON documents in HashMaps guarded by an async-safe read-write lock.

use std::{collections::HashMap, sync::Arc, cmp::Ordering};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::{Bson, Document as BsonDocument, oid::ObjectId};

use shelfwatch_core::{
    query::{Query, SortDirection},
    document::ID_FIELD,
    error::{DocumentStoreError, DocumentStoreResult},
    backend::{StoreBackend, StoreBackendBuilder},
};

use crate::evaluator::{DocumentEvaluator, Comparable};

type CollectionMap = HashMap<ObjectId, BsonDocument>;
type StoreMap = HashMap<String, CollectionMap>;


/// Thread-safe in-memory document storage backend.
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, allowing
/// it to be safely shared across async tasks. Multiple clones of the same instance
/// share the same underlying data.
///
/// Queries scan every document in a collection; indexes are not supported and
/// [`StoreBackend::add_index`] is a no-op.
///
/// # Example
///
/// ```ignore
/// use shelfwatch_memory::InMemoryStore;
/// use shelfwatch_core::backend::StoreBackend;
/// use bson::{doc, oid::ObjectId};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = InMemoryStore::new();
///
///     let id = ObjectId::new();
///     store.insert_document(id, doc! { "email": "a@x.com" }, "Items").await?;
///
///     assert!(store.get_document(id, "Items").await?.is_some());
///     Ok(())
/// }
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> (document_id -> document)
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    fn sort_documents(documents: &mut [BsonDocument], field: &str, direction: &SortDirection) {
        documents.sort_by(|a, b| {
            let left = a
                .get(field)
                .map(Comparable::from)
                .unwrap_or(Comparable::Null);
            let right = b
                .get(field)
                .map(Comparable::from)
                .unwrap_or(Comparable::Null);

            match direction {
                SortDirection::Asc => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
                SortDirection::Desc => right.partial_cmp(&left).unwrap_or(Ordering::Equal),
            }
        });
    }
}


#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_document(&self, id: ObjectId, mut document: BsonDocument, collection: &str) -> DocumentStoreResult<()> {
        let mut store = self.store.write().await;
        let collection_map = store
            .entry(collection.to_string())
            .or_default();

        if collection_map.contains_key(&id) {
            return Err(DocumentStoreError::DocumentAlreadyExists(id.to_hex(), collection.to_string()));
        }

        document.insert(ID_FIELD, id);
        collection_map.insert(id, document);

        Ok(())
    }

    async fn get_document(&self, id: ObjectId, collection: &str) -> DocumentStoreResult<Option<BsonDocument>> {
        Ok(
            self.store
                .read()
                .await
                .get(collection)
                .and_then(|collection_map| collection_map.get(&id))
                .cloned()
        )
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<BsonDocument>> {
        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(vec![]),
        };

        let mut documents = match &query.filter {
            Some(filter) => DocumentEvaluator::filter_documents(
                collection_map.values(),
                filter,
            )?,
            None => collection_map
                .values()
                .cloned()
                .collect::<Vec<_>>(),
        };

        if let Some(sort) = &query.sort {
            Self::sort_documents(&mut documents, &sort.field, &sort.direction);
        }

        Ok(
            documents
                .into_iter()
                .take(query.limit.unwrap_or(usize::MAX))
                .collect()
        )
    }

    async fn patch_document(&self, id: ObjectId, fields: BsonDocument, collection: &str) -> DocumentStoreResult<u64> {
        let mut store = self.store.write().await;

        let document = match store
            .get_mut(collection)
            .and_then(|collection_map| collection_map.get_mut(&id))
        {
            Some(document) => document,
            None => return Ok(0),
        };

        for (key, value) in fields {
            // The identifier is immutable once stored
            if key != ID_FIELD {
                document.insert(key, value);
            }
        }

        Ok(1)
    }

    async fn delete_document(&self, id: ObjectId, collection: &str) -> DocumentStoreResult<u64> {
        Ok(
            self.store
                .write()
                .await
                .get_mut(collection)
                .and_then(|collection_map| collection_map.remove(&id))
                .map_or(0, |_| 1)
        )
    }

    async fn count_by_field(&self, collection: &str, field: &str) -> DocumentStoreResult<Vec<(Bson, u64)>> {
        let store = self.store.read().await;
        let mut groups: Vec<(Bson, u64)> = Vec::new();

        for document in store.get(collection).into_iter().flat_map(|col| col.values()) {
            let key = document
                .get(field)
                .cloned()
                .unwrap_or(Bson::Null);

            match groups.iter_mut().find(|(existing, _)| *existing == key) {
                Some((_, count)) => *count += 1,
                None => groups.push((key, 1)),
            }
        }

        Ok(groups)
    }

    async fn add_index(&self, _collection: &str, _field: &str, _unique: bool) -> DocumentStoreResult<()> {
        // In-memory store does not support indexing (no-op)
        Ok(())
    }
}


/// Builder for constructing [`InMemoryStore`] instances.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new, empty [`InMemoryStore`].
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}
