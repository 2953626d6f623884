//! In-memory document storage backend for shelfwatch.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It uses async-aware read-write locks for concurrent access and backs local runs without
//! a MongoDB connection string as well as the service's tests.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **Schemaless storage** - Stores documents as BSON for flexibility
//! - **Query support** - Filtering, sorting and result caps
//! - **Grouped counts** - Aggregation by field value
//!
//! # Quick Start
//!
//! ```ignore
//! use shelfwatch_core::store::DocumentStore;
//! use shelfwatch_memory::InMemoryStore;
//!
//! let store = DocumentStore::new(InMemoryStore::new());
//! let badges = store.typed_collection::<Badge>();
//! ```

pub mod store;
pub mod evaluator;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
