//! Store selection and startup index creation.

use shelfwatch_core::{
    backend::StoreBackendBuilder,
    error::{DocumentStoreError, DocumentStoreResult},
    store::DocumentStore,
};
use shelfwatch_memory::InMemoryStore;

use crate::{
    config::Config,
    models::{clock_in::CLOCK_IN_COLLECTION, item::ITEMS_COLLECTION},
};

/// Connects to MongoDB when a connection string is configured, otherwise
/// falls back to a process-local in-memory store.
pub async fn connect_store(config: &Config) -> DocumentStoreResult<DocumentStore> {
    match config.mongo_uri.as_deref() {
        Some(uri) => connect_mongo(uri, &config.database_name).await,
        None => {
            tracing::warn!("MONGO_URI is not set; using the in-memory store, data will not persist");
            Ok(DocumentStore::new(InMemoryStore::builder().build().await?))
        }
    }
}

#[cfg(feature = "mongodb")]
async fn connect_mongo(uri: &str, database: &str) -> DocumentStoreResult<DocumentStore> {
    use shelfwatch_mongodb::MongoDbStore;

    Ok(DocumentStore::new(MongoDbStore::builder(uri, database).build().await?))
}

#[cfg(not(feature = "mongodb"))]
async fn connect_mongo(_uri: &str, _database: &str) -> DocumentStoreResult<DocumentStore> {
    Err(DocumentStoreError::Initialization(
        "MONGO_URI is set but shelfwatch was built without the `mongodb` feature".to_string(),
    ))
}

/// Secondary indexes backing the filter endpoints.
const INDEXES: &[(&str, &str)] = &[
    (ITEMS_COLLECTION, "email"),
    (ITEMS_COLLECTION, "expiry_date"),
    (ITEMS_COLLECTION, "insert_date"),
    (CLOCK_IN_COLLECTION, "email"),
    (CLOCK_IN_COLLECTION, "insert_datetime"),
];

pub async fn ensure_indexes(store: &DocumentStore) -> DocumentStoreResult<()> {
    for &(collection, field) in INDEXES {
        store
            .add_index(collection, field, false)
            .await
            .map_err(|e| {
                DocumentStoreError::Initialization(format!(
                    "failed to index {collection}.{field}: {e}"
                ))
            })?;

        tracing::debug!(collection, field, "index ensured");
    }

    Ok(())
}
