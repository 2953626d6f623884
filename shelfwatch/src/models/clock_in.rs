use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use shelfwatch_core::document::Document;

pub const CLOCK_IN_COLLECTION: &str = "ClockInRecords";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockInDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    pub location: String,
    pub insert_datetime: String,
}

impl Document for ClockInDocument {
    fn id(&self) -> &ObjectId {
        &self.id
    }

    fn collection_name() -> &'static str {
        CLOCK_IN_COLLECTION
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewClockInRecord {
    pub email: String,
    pub location: String,
}

impl NewClockInRecord {
    pub fn into_document(self, id: ObjectId, insert_datetime: String) -> ClockInDocument {
        ClockInDocument {
            id,
            email: self.email,
            location: self.location,
            insert_datetime,
        }
    }
}

/// Only the email and location of a record can change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClockInUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockInResponse {
    pub id: String,
    pub email: String,
    pub location: String,
    pub insert_datetime: String,
}

impl From<ClockInDocument> for ClockInResponse {
    fn from(doc: ClockInDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            email: doc.email,
            location: doc.location,
            insert_datetime: doc.insert_datetime,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawClockInDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub location: String,
    pub insert_datetime: String,
}

impl From<ClockInDocument> for RawClockInDocument {
    fn from(doc: ClockInDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            email: doc.email,
            location: doc.location,
            insert_datetime: doc.insert_datetime,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClockInFilterParams {
    pub email: Option<String>,
    pub location: Option<String>,
    pub insert_datetime: Option<String>,
}
