//! Resource handlers: request validation, query construction and response mapping.
//!
//! Services take the current time as an argument wherever they stamp a
//! document, so callers decide the clock.

pub mod clock_in;
pub mod items;

use bson::oid::ObjectId;

pub use clock_in::ClockInService;
pub use items::ItemService;

use crate::error::{ApiError, ApiResult};

/// Maximum number of documents a filter request returns.
pub const FILTER_LIMIT: usize = 100;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) fn parse_object_id(id: &str) -> ApiResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| ApiError::InvalidIdentifier)
}

/// Query parameters sent as empty strings are treated as absent.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}
