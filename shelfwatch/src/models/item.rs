use bson::{Bson, oid::ObjectId};
use serde::{Deserialize, Serialize};
use shelfwatch_core::document::Document;

use super::{MessageResponse, bson_to_string, lenient_int};

pub const ITEMS_COLLECTION: &str = "Items";

/// An inventory item as persisted in the `Items` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub item_name: String,
    pub quantity: i64,
    pub expiry_date: String,
    pub insert_date: String,
}

impl Document for ItemDocument {
    fn id(&self) -> &ObjectId {
        &self.id
    }

    fn collection_name() -> &'static str {
        ITEMS_COLLECTION
    }
}

/// Create payload. Any `insert_date` sent by the client is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub email: String,
    pub item_name: String,
    #[serde(deserialize_with = "lenient_int::deserialize")]
    pub quantity: i64,
    pub expiry_date: String,
}

impl NewItem {
    pub fn into_document(self, id: ObjectId, insert_date: String) -> ItemDocument {
        ItemDocument {
            id,
            name: self.name,
            email: self.email,
            item_name: self.item_name,
            quantity: self.quantity,
            expiry_date: self.expiry_date,
            insert_date,
        }
    }
}

/// Partial update payload; absent and `null` fields are left untouched.
///
/// Serializes to exactly the fields that should be `$set`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_int::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
}

/// Flat item shape returned by list and get.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub item_name: String,
    pub quantity: i64,
    pub expiry_date: String,
    pub insert_date: String,
}

impl From<ItemDocument> for ItemResponse {
    fn from(doc: ItemDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            name: doc.name,
            email: doc.email,
            item_name: doc.item_name,
            quantity: doc.quantity,
            expiry_date: doc.expiry_date,
            insert_date: doc.insert_date,
        }
    }
}

/// Stored layout returned by the filter endpoint, `_id` rendered as hex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawItemDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub item_name: String,
    pub quantity: i64,
    pub expiry_date: String,
    pub insert_date: String,
}

impl From<ItemDocument> for RawItemDocument {
    fn from(doc: ItemDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            name: doc.name,
            email: doc.email,
            item_name: doc.item_name,
            quantity: doc.quantity,
            expiry_date: doc.expiry_date,
            insert_date: doc.insert_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemFilterOutcome {
    Documents(Vec<RawItemDocument>),
    NoMatches(MessageResponse),
}

/// Item filter query string. Every parameter is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemFilterParams {
    pub email: Option<String>,
    pub expiry_date: Option<String>,
    pub insert_date: Option<String>,
    pub quantity: Option<String>,
    /// Accepted for compatibility, never applied.
    pub id: Option<String>,
}

/// One group of the per-email item count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailCount {
    #[serde(rename = "_id")]
    pub email: Option<String>,
    pub count: u64,
}

impl From<(Bson, u64)> for EmailCount {
    fn from((email, count): (Bson, u64)) -> Self {
        Self { email: bson_to_string(email), count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::ser::serialize_to_document;
    use serde_json::json;

    #[test]
    fn test_new_item_accepts_string_quantity() {
        let item: NewItem = serde_json::from_value(json!({
            "name": "Ana",
            "email": "ana@x.com",
            "item_name": "milk",
            "quantity": "12",
            "expiry_date": "2024-06-01",
        }))
        .unwrap();

        assert_eq!(item.quantity, 12);
    }

    #[test]
    fn test_new_item_rejects_non_numeric_quantity() {
        let result = serde_json::from_value::<NewItem>(json!({
            "name": "Ana",
            "email": "ana@x.com",
            "item_name": "milk",
            "quantity": "a dozen",
            "expiry_date": "2024-06-01",
        }));

        assert!(result.is_err());
    }

    #[test]
    fn test_new_item_requires_every_field() {
        let result = serde_json::from_value::<NewItem>(json!({
            "name": "Ana",
            "email": "ana@x.com",
            "quantity": 3,
        }));

        assert!(result.is_err());
    }

    #[test]
    fn test_update_keeps_only_present_fields() {
        let update: ItemUpdate = serde_json::from_value(json!({
            "name": "",
            "quantity": 0,
            "email": null,
        }))
        .unwrap();

        let fields = serialize_to_document(&update).unwrap();

        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get_str("name").unwrap(), "");
        assert_eq!(fields.get_i64("quantity").unwrap(), 0);
        assert!(!fields.contains_key("email"));
    }

    #[test]
    fn test_empty_update_serializes_to_empty_document() {
        let update: ItemUpdate = serde_json::from_value(json!({})).unwrap();
        assert!(serialize_to_document(&update).unwrap().is_empty());
    }

    #[test]
    fn test_raw_document_renders_hex_id() {
        let id = ObjectId::new();
        let raw = RawItemDocument::from(ItemDocument {
            id,
            name: "Ana".into(),
            email: "ana@x.com".into(),
            item_name: "milk".into(),
            quantity: 2,
            expiry_date: "2024-06-01".into(),
            insert_date: "2024-05-20".into(),
        });

        let json = serde_json::to_value(raw).unwrap();
        assert_eq!(json["_id"], json!(id.to_hex()));
        assert!(json.get("id").is_none());
    }
}
