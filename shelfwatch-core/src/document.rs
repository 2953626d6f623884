//! Core traits for document representation and serialization.
//!
//! This module provides the trait every stored record implements, as well as
//! helpers for converting records to and from BSON documents.

use bson::{
    Document as BsonDocument,
    de::deserialize_from_document,
    oid::ObjectId,
    ser::serialize_to_document,
};
use serde::{Deserialize, Serialize};

use crate::error::DocumentStoreResult;

/// Name of the identifier field in every stored document.
pub const ID_FIELD: &str = "_id";

/// Core trait that all documents stored in a document store must implement.
///
/// Every document carries a store-native [`ObjectId`] and names the collection
/// it belongs to. The identifier must serialize under the `_id` key.
///
/// # Example
///
/// ```ignore
/// use shelfwatch_core::document::Document;
/// use bson::oid::ObjectId;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Badge {
///     #[serde(rename = "_id")]
///     pub id: ObjectId,
///     pub label: String,
/// }
///
/// impl Document for Badge {
///     fn id(&self) -> &ObjectId {
///         &self.id
///     }
///
///     fn collection_name() -> &'static str {
///         "Badges"
///     }
/// }
/// ```
pub trait Document: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns a reference to this document's unique identifier.
    fn id(&self) -> &ObjectId;

    /// Returns the name of the collection this document belongs to.
    fn collection_name() -> &'static str;
}

/// Extension trait providing BSON conversion for documents.
///
/// Automatically implemented for all types that implement [`Document`].
pub trait DocumentExt: Document {
    /// Converts this document to a BSON document for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or does not produce a document.
    fn to_document(&self) -> DocumentStoreResult<BsonDocument>;

    /// Creates a document from a stored BSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing or have the wrong type.
    fn from_document(document: BsonDocument) -> DocumentStoreResult<Self>;
}

impl<D: Document> DocumentExt for D {
    fn to_document(&self) -> DocumentStoreResult<BsonDocument> {
        Ok(serialize_to_document(self)?)
    }

    fn from_document(document: BsonDocument) -> DocumentStoreResult<Self> {
        Ok(deserialize_from_document(document)?)
    }
}
