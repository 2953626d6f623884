use async_trait::async_trait;
use futures::TryStreamExt;
use bson::{Bson, Document, doc, oid::ObjectId};
use mongodb::{
    Client, Collection as MongoCollection, IndexModel,
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{ClientOptions, FindOptions, IndexOptions},
};
use shelfwatch_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    document::ID_FIELD,
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Query, QueryVisitor, SortDirection},
};

use crate::query::MongoQueryTranslator;

const DUPLICATE_KEY_CODE: i32 = 11000;


#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }

    fn backend_error(err: MongoError) -> DocumentStoreError {
        DocumentStoreError::Backend(err.to_string())
    }

    fn is_duplicate_key(err: &MongoError) -> bool {
        matches!(
            err.kind.as_ref(),
            ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY_CODE
        )
    }

    fn group_count(group: &Document) -> u64 {
        match group.get("count") {
            Some(Bson::Int32(count)) => *count as u64,
            Some(Bson::Int64(count)) => *count as u64,
            _ => 0,
        }
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_document(&self, id: ObjectId, mut document: Document, collection: &str) -> DocumentStoreResult<()> {
        document.insert(ID_FIELD, id);

        self.get_collection(collection)
            .insert_one(document)
            .await
            .map_err(|e| {
                if Self::is_duplicate_key(&e) {
                    DocumentStoreError::DocumentAlreadyExists(id.to_hex(), collection.to_string())
                } else {
                    Self::backend_error(e)
                }
            })?;

        Ok(())
    }

    async fn get_document(&self, id: ObjectId, collection: &str) -> DocumentStoreResult<Option<Document>> {
        self.get_collection(collection)
            .find_one(doc! { ID_FIELD: id })
            .await
            .map_err(Self::backend_error)
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Document>> {
        let mut options = FindOptions::default();

        if let Some(limit) = query.limit {
            options.limit = Some(limit as i64);
        }
        if let Some(sort) = &query.sort {
            options.sort = Some(doc! {
                sort.field.clone(): match sort.direction {
                    SortDirection::Asc => 1,
                    SortDirection::Desc => -1,
                }
            })
        }

        self.get_collection(collection)
            .find(
                if let Some(expr) = &query.filter {
                    MongoQueryTranslator.visit_expr(expr)?
                } else {
                    doc! {}
                },
            )
            .with_options(options)
            .await
            .map_err(Self::backend_error)?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(Self::backend_error)
    }

    async fn patch_document(&self, id: ObjectId, mut fields: Document, collection: &str) -> DocumentStoreResult<u64> {
        // The identifier is immutable once stored
        fields.remove(ID_FIELD);

        Ok(
            self.get_collection(collection)
                .update_one(doc! { ID_FIELD: id }, doc! { "$set": fields })
                .await
                .map_err(Self::backend_error)?
                .matched_count
        )
    }

    async fn delete_document(&self, id: ObjectId, collection: &str) -> DocumentStoreResult<u64> {
        Ok(
            self.get_collection(collection)
                .delete_one(doc! { ID_FIELD: id })
                .await
                .map_err(Self::backend_error)?
                .deleted_count
        )
    }

    async fn count_by_field(&self, collection: &str, field: &str) -> DocumentStoreResult<Vec<(Bson, u64)>> {
        Ok(
            self.get_collection(collection)
                .aggregate(vec![
                    doc! { "$group": { ID_FIELD: format!("${}", field), "count": { "$sum": 1 } } },
                ])
                .await
                .map_err(Self::backend_error)?
                .try_collect::<Vec<Document>>()
                .await
                .map_err(Self::backend_error)?
                .into_iter()
                .map(|group| {
                    (
                        group.get(ID_FIELD).cloned().unwrap_or(Bson::Null),
                        Self::group_count(&group),
                    )
                })
                .collect()
        )
    }

    async fn add_index(&self, collection: &str, field: &str, unique: bool) -> DocumentStoreResult<()> {
        self.get_collection(collection)
            .create_index(
                IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(
                    IndexOptions::builder()
                    .unique(unique)
                    .build()
                )
                .build()
            )
            .await
            .map_err(Self::backend_error)?;

        Ok(())
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    /// Parses the connection string and pings the deployment so a bad URI or an
    /// unreachable server fails at startup instead of on the first request.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        let client = Client::with_options(
            ClientOptions::parse(&self.dsn)
                .await
                .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
        )
        .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?;

        client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?;

        tracing::info!(database = %self.database, "connected to MongoDB");

        Ok(MongoDbStore::new(client, self.database))
    }
}
