//! Document store abstraction underlying the shelfwatch service.
//!
//! This crate provides:
//!
//! - **Document traits** ([`document`]) - Core traits for defining and serializing documents
//! - **Store backend abstraction** ([`backend`]) - Traits for implementing storage backends
//! - **Query and filtering API** ([`query`]) - Query construction and filter expressions
//! - **Collections interface** ([`collection`]) - Typed access to a single collection
//! - **Document store** ([`store`]) - The shared handle owning a runtime-selected backend
//! - **Error handling** ([`error`]) - Store error and result types
//!
//! # Example
//!
//! ```ignore
//! use shelfwatch_core::document::Document;
//! use bson::oid::ObjectId;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Badge {
//!     #[serde(rename = "_id")]
//!     pub id: ObjectId,
//!     pub label: String,
//! }
//!
//! impl Document for Badge {
//!     fn id(&self) -> &ObjectId {
//!         &self.id
//!     }
//!
//!     fn collection_name() -> &'static str {
//!         "Badges"
//!     }
//! }
//! ```

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod query;
pub mod store;
