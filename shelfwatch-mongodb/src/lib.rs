//! MongoDB backend implementation for shelfwatch.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait,
//! translating filter expressions to MongoDB's native query documents.
//!
//! # Features
//!
//! - **Persistent storage** - Data is persisted to MongoDB Atlas or self-hosted MongoDB
//! - **Query support** - Filtering, sorting and result caps run on the MongoDB query engine
//! - **Aggregation** - Grouped counts use a `$group` pipeline
//! - **Indexing** - Ascending single-field indexes
//!
//! # Example
//!
//! ```ignore
//! use shelfwatch_core::backend::StoreBackendBuilder;
//! use shelfwatch_mongodb::MongoDbStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoDbStore::builder("mongodb://localhost:27017", "FastAPIApp")
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod store;
pub mod query;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
