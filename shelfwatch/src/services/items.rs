use std::sync::Arc;

use bson::{oid::ObjectId, ser::serialize_to_document};
use chrono::{DateTime, NaiveDate, Utc};
use shelfwatch_core::{
    collection::TypedCollection,
    error::DocumentStoreError,
    query::{Filter, Query},
    store::DocumentStore,
};

use super::{DATE_FORMAT, FILTER_LIMIT, non_empty, parse_object_id};
use crate::{
    error::{ApiError, ApiResult},
    models::{
        MessageResponse,
        item::{
            EmailCount, ItemDocument, ItemFilterOutcome, ItemFilterParams, ItemResponse, ItemUpdate,
            NewItem, RawItemDocument,
        },
    },
};

const NOT_FOUND: &str = "Item";
const NO_MATCHES: &str = "No items found matching the criteria";

#[derive(Debug, Clone)]
pub struct ItemService {
    store: Arc<DocumentStore>,
}

impl ItemService {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    fn items(&self) -> TypedCollection<'_, ItemDocument> {
        self.store.typed_collection::<ItemDocument>()
    }

    /// Stores a new item stamped with the UTC date of `now`.
    pub async fn create(&self, item: NewItem, now: DateTime<Utc>) -> ApiResult<MessageResponse> {
        let document = item.into_document(ObjectId::new(), now.format(DATE_FORMAT).to_string());

        self.items().insert(&document).await?;

        tracing::info!(id = %document.id, email = %document.email, "item created");

        Ok(MessageResponse::new("Item created successfully").with_id(document.id.to_hex()))
    }

    pub async fn list_all(&self) -> ApiResult<Vec<ItemResponse>> {
        Ok(self
            .items()
            .query(Query::new())
            .await?
            .into_iter()
            .map(ItemResponse::from)
            .collect())
    }

    pub async fn get_by_id(&self, id: &str) -> ApiResult<ItemResponse> {
        let id = parse_object_id(id)?;

        self.items()
            .get(id)
            .await?
            .map(ItemResponse::from)
            .ok_or(ApiError::NotFound(NOT_FOUND))
    }

    /// Conjunctive filter over email (exact), dates and quantity (at least).
    ///
    /// Dates must be `YYYY-MM-DD`; they are compared as stored strings.
    pub async fn filter(&self, params: ItemFilterParams) -> ApiResult<ItemFilterOutcome> {
        let mut exprs = Vec::new();

        if let Some(email) = non_empty(params.email) {
            exprs.push(Filter::eq("email", email));
        }
        if let Some(expiry_date) = non_empty(params.expiry_date) {
            validate_date(&expiry_date, "expiry_date")?;
            exprs.push(Filter::gte("expiry_date", expiry_date));
        }
        if let Some(insert_date) = non_empty(params.insert_date) {
            validate_date(&insert_date, "insert_date")?;
            exprs.push(Filter::gte("insert_date", insert_date));
        }
        if let Some(quantity) = non_empty(params.quantity) {
            let quantity = quantity.trim().parse::<i64>().map_err(|_| {
                ApiError::InvalidFormat("Invalid quantity format. Use an integer.".to_string())
            })?;
            exprs.push(Filter::gte("quantity", quantity));
        }
        if let Some(id) = non_empty(params.id) {
            tracing::debug!(%id, "ignoring id parameter on item filter");
        }

        let query = Query::builder()
            .maybe_filter(Filter::all(exprs))
            .limit(FILTER_LIMIT)
            .build();

        tracing::debug!(filter = ?query.filter, "filtering items");

        let documents = self.items().query(query).await?;

        if documents.is_empty() {
            return Ok(ItemFilterOutcome::NoMatches(MessageResponse::new(NO_MATCHES)));
        }

        Ok(ItemFilterOutcome::Documents(
            documents.into_iter().map(RawItemDocument::from).collect(),
        ))
    }

    /// Number of items per email, unordered.
    pub async fn aggregate(&self) -> ApiResult<Vec<EmailCount>> {
        Ok(self
            .items()
            .count_by("email")
            .await?
            .into_iter()
            .map(EmailCount::from)
            .collect())
    }

    pub async fn update(&self, id: &str, update: ItemUpdate) -> ApiResult<MessageResponse> {
        let id = parse_object_id(id)?;
        let fields = serialize_to_document(&update).map_err(DocumentStoreError::from)?;

        if fields.is_empty() {
            return Err(ApiError::InvalidInput("No valid fields to update".to_string()));
        }
        if !self.items().patch(id, fields).await? {
            return Err(ApiError::NotFound(NOT_FOUND));
        }

        tracing::info!(%id, "item updated");

        Ok(MessageResponse::new("Item updated successfully"))
    }

    pub async fn delete(&self, id: &str) -> ApiResult<MessageResponse> {
        let id = parse_object_id(id)?;

        if !self.items().delete(id).await? {
            return Err(ApiError::NotFound(NOT_FOUND));
        }

        tracing::info!(%id, "item deleted");

        Ok(MessageResponse::new("Item deleted successfully"))
    }
}

/// Accepts only the canonical `YYYY-MM-DD` spelling of a calendar date.
///
/// Filters compare dates as strings, so the parsed date must re-format to the input.
fn validate_date(value: &str, field: &str) -> ApiResult<()> {
    match NaiveDate::parse_from_str(value, DATE_FORMAT) {
        Ok(date) if date.format(DATE_FORMAT).to_string() == value => Ok(()),
        _ => Err(ApiError::InvalidFormat(format!("Invalid {field} format. Use YYYY-MM-DD."))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shelfwatch_memory::InMemoryStore;

    fn service() -> ItemService {
        ItemService::new(Arc::new(DocumentStore::new(InMemoryStore::new())))
    }

    fn new_item(email: &str, quantity: i64, expiry_date: &str) -> NewItem {
        NewItem {
            name: "Ana".to_string(),
            email: email.to_string(),
            item_name: "milk".to_string(),
            quantity,
            expiry_date: expiry_date.to_string(),
        }
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 23, 59, 59).unwrap()
    }

    async fn create(service: &ItemService, item: NewItem, now: DateTime<Utc>) -> String {
        service.create(item, now).await.unwrap().id.unwrap()
    }

    fn documents(outcome: ItemFilterOutcome) -> Vec<RawItemDocument> {
        match outcome {
            ItemFilterOutcome::Documents(docs) => docs,
            ItemFilterOutcome::NoMatches(message) => panic!("unexpected empty result: {message:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_stamps_insert_date() {
        let service = service();
        let id = create(&service, new_item("ana@x.com", 3, "2024-06-01"), at(2024, 5, 20)).await;

        let item = service.get_by_id(&id).await.unwrap();
        assert_eq!(item.id, id);
        assert_eq!(item.name, "Ana");
        assert_eq!(item.email, "ana@x.com");
        assert_eq!(item.item_name, "milk");
        assert_eq!(item.quantity, 3);
        assert_eq!(item.expiry_date, "2024-06-01");
        assert_eq!(item.insert_date, "2024-05-20");
    }

    #[tokio::test]
    async fn test_get_by_id_errors() {
        let service = service();

        assert!(matches!(service.get_by_id("xyz").await, Err(ApiError::InvalidIdentifier)));
        assert!(matches!(
            service.get_by_id(&ObjectId::new().to_hex()).await,
            Err(ApiError::NotFound("Item"))
        ));
    }

    #[tokio::test]
    async fn test_filter_expiry_date_is_lower_bound() {
        let service = service();
        create(&service, new_item("ana@x.com", 1, "2023-12-31"), at(2024, 5, 20)).await;
        create(&service, new_item("ana@x.com", 1, "2024-01-01"), at(2024, 5, 20)).await;
        create(&service, new_item("bo@x.com", 1, "2024-06-01"), at(2024, 5, 20)).await;

        let docs = documents(
            service
                .filter(ItemFilterParams {
                    expiry_date: Some("2024-01-01".to_string()),
                    ..Default::default()
                })
                .await
                .unwrap(),
        );

        assert_eq!(docs.len(), 2);
        assert!(docs.iter().all(|doc| doc.expiry_date.as_str() >= "2024-01-01"));
    }

    #[tokio::test]
    async fn test_filter_combines_conditions() {
        let service = service();
        create(&service, new_item("ana@x.com", 10, "2024-06-01"), at(2024, 5, 20)).await;
        create(&service, new_item("ana@x.com", 2, "2024-06-01"), at(2024, 5, 20)).await;
        create(&service, new_item("bo@x.com", 10, "2024-06-01"), at(2024, 5, 20)).await;

        let docs = documents(
            service
                .filter(ItemFilterParams {
                    email: Some("ana@x.com".to_string()),
                    quantity: Some("5".to_string()),
                    insert_date: Some("2024-05-20".to_string()),
                    ..Default::default()
                })
                .await
                .unwrap(),
        );

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].quantity, 10);
        assert_eq!(docs[0].email, "ana@x.com");
    }

    #[tokio::test]
    async fn test_filter_rejects_malformed_values() {
        let service = service();

        let err = service
            .filter(ItemFilterParams {
                expiry_date: Some("2024-13-99".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::InvalidFormat(ref message) if message == "Invalid expiry_date format. Use YYYY-MM-DD."
        ));

        let err = service
            .filter(ItemFilterParams {
                insert_date: Some("20-05-2024".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::InvalidFormat(ref message) if message == "Invalid insert_date format. Use YYYY-MM-DD."
        ));

        let err = service
            .filter(ItemFilterParams {
                quantity: Some("many".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidFormat(_)));
    }

    #[test]
    fn test_validate_date_requires_canonical_shape() {
        assert!(validate_date("2024-01-01", "expiry_date").is_ok());
        assert!(validate_date("2024-02-29", "expiry_date").is_ok());

        for value in [
            " 2024-01-01",
            "+2024-01-01",
            "0-01-01",
            "024-01-01",
            "2024-1-01",
            "2024-01-1",
            "2024-01-01 ",
            "2023-02-29",
            "2024-13-99",
        ] {
            assert!(
                matches!(validate_date(value, "expiry_date"), Err(ApiError::InvalidFormat(_))),
                "{value:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_filter_rejects_loose_dates_instead_of_matching_everything() {
        let service = service();
        create(&service, new_item("ana@x.com", 1, "2023-01-01"), at(2024, 5, 20)).await;

        for value in [" 2024-01-01", "+2024-01-01", "0-01-01"] {
            let result = service
                .filter(ItemFilterParams {
                    expiry_date: Some(value.to_string()),
                    ..Default::default()
                })
                .await;
            assert!(matches!(result, Err(ApiError::InvalidFormat(_))), "{value:?}");

            let result = service
                .filter(ItemFilterParams {
                    insert_date: Some(value.to_string()),
                    ..Default::default()
                })
                .await;
            assert!(matches!(result, Err(ApiError::InvalidFormat(_))), "{value:?}");
        }
    }

    #[tokio::test]
    async fn test_filter_is_capped_but_list_all_is_not() {
        let service = service();
        for _ in 0..150 {
            create(&service, new_item("ana@x.com", 5, "2024-06-01"), at(2024, 5, 20)).await;
        }

        let docs = documents(
            service
                .filter(ItemFilterParams {
                    email: Some("ana@x.com".to_string()),
                    ..Default::default()
                })
                .await
                .unwrap(),
        );

        assert_eq!(docs.len(), FILTER_LIMIT);
        assert_eq!(service.list_all().await.unwrap().len(), 150);
    }

    #[tokio::test]
    async fn test_filter_without_matches_returns_message() {
        let service = service();
        create(&service, new_item("ana@x.com", 1, "2024-06-01"), at(2024, 5, 20)).await;

        let outcome = service
            .filter(ItemFilterParams {
                email: Some("nobody@x.com".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ItemFilterOutcome::NoMatches(MessageResponse::new("No items found matching the criteria"))
        );
    }

    #[tokio::test]
    async fn test_filter_ignores_id_and_empty_params() {
        let service = service();
        create(&service, new_item("ana@x.com", 1, "2024-06-01"), at(2024, 5, 20)).await;
        create(&service, new_item("bo@x.com", 1, "2024-06-01"), at(2024, 5, 20)).await;

        let docs = documents(
            service
                .filter(ItemFilterParams {
                    email: Some(String::new()),
                    id: Some(ObjectId::new().to_hex()),
                    ..Default::default()
                })
                .await
                .unwrap(),
        );

        assert_eq!(docs.len(), 2);
    }

    #[tokio::test]
    async fn test_aggregate_counts_per_email() {
        let service = service();
        create(&service, new_item("ana@x.com", 1, "2024-06-01"), at(2024, 5, 20)).await;
        create(&service, new_item("ana@x.com", 1, "2024-06-02"), at(2024, 5, 20)).await;
        create(&service, new_item("bo@x.com", 1, "2024-06-01"), at(2024, 5, 20)).await;

        let mut groups = service.aggregate().await.unwrap();
        groups.sort_by(|a, b| a.email.cmp(&b.email));

        assert_eq!(
            groups,
            vec![
                EmailCount { email: Some("ana@x.com".to_string()), count: 2 },
                EmailCount { email: Some("bo@x.com".to_string()), count: 1 },
            ]
        );
    }

    #[tokio::test]
    async fn test_update_check_order() {
        let service = service();
        let missing = ObjectId::new().to_hex();

        assert!(matches!(
            service.update("bad", ItemUpdate::default()).await,
            Err(ApiError::InvalidIdentifier)
        ));
        assert!(matches!(
            service.update(&missing, ItemUpdate::default()).await,
            Err(ApiError::InvalidInput(_))
        ));

        let update = ItemUpdate { quantity: Some(4), ..Default::default() };
        assert!(matches!(service.update(&missing, update).await, Err(ApiError::NotFound("Item"))));
    }

    #[tokio::test]
    async fn test_update_applies_only_present_fields() {
        let service = service();
        let id = create(&service, new_item("ana@x.com", 3, "2024-06-01"), at(2024, 5, 20)).await;

        let response = service
            .update(
                &id,
                ItemUpdate {
                    item_name: Some(String::new()),
                    quantity: Some(0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(response.message, "Item updated successfully");

        let item = service.get_by_id(&id).await.unwrap();
        assert_eq!(item.item_name, "");
        assert_eq!(item.quantity, 0);
        assert_eq!(item.name, "Ana");
        assert_eq!(item.insert_date, "2024-05-20");
    }

    #[tokio::test]
    async fn test_delete() {
        let service = service();
        let id = create(&service, new_item("ana@x.com", 3, "2024-06-01"), at(2024, 5, 20)).await;

        assert!(matches!(service.delete("bad").await, Err(ApiError::InvalidIdentifier)));
        assert_eq!(service.delete(&id).await.unwrap().message, "Item deleted successfully");
        assert!(matches!(service.delete(&id).await, Err(ApiError::NotFound("Item"))));
        assert!(service.list_all().await.unwrap().is_empty());
    }
}
