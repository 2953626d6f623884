use std::sync::Arc;

use bson::{oid::ObjectId, ser::serialize_to_document};
use chrono::{DateTime, Utc};
use shelfwatch_core::{
    collection::TypedCollection,
    error::DocumentStoreError,
    query::{Filter, Query, SortDirection},
    store::DocumentStore,
};

use super::{DATETIME_FORMAT, FILTER_LIMIT, non_empty, parse_object_id};
use crate::{
    error::{ApiError, ApiResult},
    models::{
        MessageResponse,
        clock_in::{
            ClockInDocument, ClockInFilterParams, ClockInResponse, ClockInUpdate, NewClockInRecord,
            RawClockInDocument,
        },
    },
};

const NOT_FOUND: &str = "Record";

#[derive(Debug, Clone)]
pub struct ClockInService {
    store: Arc<DocumentStore>,
}

impl ClockInService {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    fn records(&self) -> TypedCollection<'_, ClockInDocument> {
        self.store.typed_collection::<ClockInDocument>()
    }

    /// Stores a new record stamped with `now` at second precision.
    pub async fn create(
        &self,
        record: NewClockInRecord,
        now: DateTime<Utc>,
    ) -> ApiResult<MessageResponse> {
        let document =
            record.into_document(ObjectId::new(), now.format(DATETIME_FORMAT).to_string());

        self.records().insert(&document).await?;

        tracing::info!(id = %document.id, email = %document.email, "clock-in record created");

        Ok(MessageResponse::new("Clock-In record created successfully")
            .with_id(document.id.to_hex()))
    }

    pub async fn list_all(&self) -> ApiResult<Vec<ClockInResponse>> {
        Ok(self
            .records()
            .query(Query::new())
            .await?
            .into_iter()
            .map(ClockInResponse::from)
            .collect())
    }

    pub async fn get_by_id(&self, id: &str) -> ApiResult<ClockInResponse> {
        let id = parse_object_id(id)?;

        self.records()
            .get(id)
            .await?
            .map(ClockInResponse::from)
            .ok_or(ApiError::NotFound(NOT_FOUND))
    }

    /// Records matching every given parameter, oldest first.
    ///
    /// `insert_datetime` is a lower bound and is not format checked.
    pub async fn filter(&self, params: ClockInFilterParams) -> ApiResult<Vec<RawClockInDocument>> {
        let mut exprs = Vec::new();

        if let Some(email) = non_empty(params.email) {
            exprs.push(Filter::eq("email", email));
        }
        if let Some(location) = non_empty(params.location) {
            exprs.push(Filter::eq("location", location));
        }
        if let Some(insert_datetime) = non_empty(params.insert_datetime) {
            exprs.push(Filter::gte("insert_datetime", insert_datetime));
        }

        let query = Query::builder()
            .maybe_filter(Filter::all(exprs))
            .sort("insert_datetime", SortDirection::Asc)
            .limit(FILTER_LIMIT)
            .build();

        tracing::debug!(filter = ?query.filter, "filtering clock-in records");

        Ok(self
            .records()
            .query(query)
            .await?
            .into_iter()
            .map(RawClockInDocument::from)
            .collect())
    }

    pub async fn update(&self, id: &str, update: ClockInUpdate) -> ApiResult<MessageResponse> {
        let id = parse_object_id(id)?;
        let fields = serialize_to_document(&update).map_err(DocumentStoreError::from)?;

        if fields.is_empty() {
            return Err(ApiError::InvalidInput("No valid fields to update".to_string()));
        }
        if !self.records().patch(id, fields).await? {
            return Err(ApiError::NotFound(NOT_FOUND));
        }

        tracing::info!(%id, "clock-in record updated");

        Ok(MessageResponse::new("Clock-In record updated successfully"))
    }

    pub async fn delete(&self, id: &str) -> ApiResult<MessageResponse> {
        let id = parse_object_id(id)?;

        if !self.records().delete(id).await? {
            return Err(ApiError::NotFound(NOT_FOUND));
        }

        tracing::info!(%id, "clock-in record deleted");

        Ok(MessageResponse::new("Record deleted successfully"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use shelfwatch_memory::InMemoryStore;

    fn service() -> ClockInService {
        ClockInService::new(Arc::new(DocumentStore::new(InMemoryStore::new())))
    }

    fn record(email: &str, location: &str) -> NewClockInRecord {
        NewClockInRecord { email: email.to_string(), location: location.to_string() }
    }

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, h, m, s).unwrap()
    }

    async fn create(service: &ClockInService, record: NewClockInRecord, now: DateTime<Utc>) -> String {
        service.create(record, now).await.unwrap().id.unwrap()
    }

    #[tokio::test]
    async fn test_create_stamps_timestamp() {
        let service = service();
        let id = create(&service, record("bo@x.com", "Gate A"), at(8, 30, 5)).await;

        let fetched = service.get_by_id(&id).await.unwrap();
        assert_eq!(
            fetched,
            ClockInResponse {
                id,
                email: "bo@x.com".to_string(),
                location: "Gate A".to_string(),
                insert_datetime: "2024-05-20 08:30:05".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_filter_sorts_by_timestamp() {
        let service = service();
        create(&service, record("bo@x.com", "Gate A"), at(17, 0, 0)).await;
        create(&service, record("bo@x.com", "Gate B"), at(8, 0, 0)).await;
        create(&service, record("bo@x.com", "Gate A"), at(12, 0, 0)).await;
        create(&service, record("cy@x.com", "Gate A"), at(9, 0, 0)).await;

        let docs = service
            .filter(ClockInFilterParams {
                email: Some("bo@x.com".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let stamps = docs.iter().map(|d| d.insert_datetime.as_str()).collect::<Vec<_>>();
        assert_eq!(
            stamps,
            vec!["2024-05-20 08:00:00", "2024-05-20 12:00:00", "2024-05-20 17:00:00"]
        );
    }

    #[tokio::test]
    async fn test_filter_by_location_and_lower_bound() {
        let service = service();
        create(&service, record("bo@x.com", "Gate A"), at(7, 0, 0)).await;
        create(&service, record("bo@x.com", "Gate A"), at(11, 0, 0)).await;
        create(&service, record("bo@x.com", "Gate B"), at(12, 0, 0)).await;

        let docs = service
            .filter(ClockInFilterParams {
                location: Some("Gate A".to_string()),
                insert_datetime: Some("2024-05-20 10:00:00".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].insert_datetime, "2024-05-20 11:00:00");
    }

    #[tokio::test]
    async fn test_filter_keeps_earliest_records_up_to_cap() {
        let service = service();
        let start = at(0, 0, 0);

        // Inserted newest first
        for offset in (0..150).rev() {
            create(&service, record("bo@x.com", "Gate A"), start + TimeDelta::seconds(offset)).await;
        }

        let docs = service
            .filter(ClockInFilterParams {
                email: Some("bo@x.com".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let expected = (0..FILTER_LIMIT as i64)
            .map(|offset| (start + TimeDelta::seconds(offset)).format(DATETIME_FORMAT).to_string())
            .collect::<Vec<_>>();
        let stamps = docs.into_iter().map(|d| d.insert_datetime).collect::<Vec<_>>();

        assert_eq!(stamps, expected);
        assert_eq!(service.list_all().await.unwrap().len(), 150);
    }

    #[tokio::test]
    async fn test_filter_without_matches_is_empty() {
        let service = service();
        let docs = service
            .filter(ClockInFilterParams {
                email: Some("nobody@x.com".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let service = service();
        let id = create(&service, record("bo@x.com", "Gate A"), at(8, 0, 0)).await;

        assert!(matches!(
            service.update(&id, ClockInUpdate::default()).await,
            Err(ApiError::InvalidInput(_))
        ));

        let update = ClockInUpdate { location: Some("Dock 4".to_string()), ..Default::default() };
        assert_eq!(
            service.update(&id, update).await.unwrap().message,
            "Clock-In record updated successfully"
        );

        let fetched = service.get_by_id(&id).await.unwrap();
        assert_eq!(fetched.location, "Dock 4");
        assert_eq!(fetched.insert_datetime, "2024-05-20 08:00:00");

        assert_eq!(service.delete(&id).await.unwrap().message, "Record deleted successfully");
        assert!(matches!(service.get_by_id(&id).await, Err(ApiError::NotFound("Record"))));
        assert!(matches!(service.delete("0xdead").await, Err(ApiError::InvalidIdentifier)));
    }
}
