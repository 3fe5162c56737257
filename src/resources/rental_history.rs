use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{Set, prelude::DateTimeWithTimeZone};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Resource, ResourceError, ResourceKind, ResourceStore, StoreError};
use crate::db::{
    dao::{DaoContext, OwnedDao, OwnedModel, RentalHistoryDao, ScooterDao},
    entities::{rental_history, scooter},
};

pub struct RentalHistoryResource;

/// The scooter columns expanded onto a listed rental.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScooterSummary {
    pub id: Uuid,
    pub reference_number: Option<String>,
    pub model: Option<String>,
}

impl From<&scooter::Model> for ScooterSummary {
    fn from(model: &scooter::Model) -> Self {
        Self {
            id: model.id,
            reference_number: model.reference_number.clone(),
            model: model.model.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentalListing {
    #[serde(flatten)]
    pub rental: rental_history::Model,
    pub scooter: Option<ScooterSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalDraft {
    #[serde(default)]
    pub scooter_id: Option<Uuid>,
    pub start_time: DateTimeWithTimeZone,
    pub end_time: DateTimeWithTimeZone,
    pub start_location: String,
    pub end_location: String,
    pub distance_travelled: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RentalPatch {
    pub scooter_id: Option<Uuid>,
    pub start_time: Option<DateTimeWithTimeZone>,
    pub end_time: Option<DateTimeWithTimeZone>,
    pub start_location: Option<String>,
    pub end_location: Option<String>,
    pub distance_travelled: Option<f64>,
}

fn check_location(label: &str, value: &str) -> Result<(), ResourceError> {
    if value.trim().is_empty() {
        return Err(ResourceError::validation(format!("{label} is required")));
    }
    Ok(())
}

fn check_distance(distance: f64) -> Result<(), ResourceError> {
    if !distance.is_finite() || distance < 0.0 {
        return Err(ResourceError::validation(
            "Distance travelled must be a non-negative number",
        ));
    }
    Ok(())
}

fn check_times(
    start: &DateTimeWithTimeZone,
    end: &DateTimeWithTimeZone,
) -> Result<(), ResourceError> {
    if end < start {
        return Err(ResourceError::validation(
            "End time must not be before start time",
        ));
    }
    Ok(())
}

impl Resource for RentalHistoryResource {
    const KIND: ResourceKind = ResourceKind::RentalHistory;

    type Row = rental_history::Model;
    type Listed = RentalListing;
    type Draft = RentalDraft;
    type Patch = RentalPatch;
    type Related = ScooterSummary;

    fn row_id(row: &Self::Row) -> Uuid {
        row.id
    }

    fn row_owner(row: &Self::Row) -> Option<Uuid> {
        row.owner_id()
    }

    fn row_created_at(row: &Self::Row) -> DateTimeWithTimeZone {
        row.created_at
    }

    fn validate_draft(draft: &Self::Draft) -> Result<(), ResourceError> {
        check_location("Start location", &draft.start_location)?;
        check_location("End location", &draft.end_location)?;
        check_times(&draft.start_time, &draft.end_time)?;
        check_distance(draft.distance_travelled)
    }

    fn validate_patch(patch: &Self::Patch) -> Result<(), ResourceError> {
        if let Some(location) = &patch.start_location {
            check_location("Start location", location)?;
        }
        if let Some(location) = &patch.end_location {
            check_location("End location", location)?;
        }
        if let (Some(start), Some(end)) = (&patch.start_time, &patch.end_time) {
            check_times(start, end)?;
        }
        match patch.distance_travelled {
            Some(distance) => check_distance(distance),
            None => Ok(()),
        }
    }

    fn validate_row(row: &Self::Row) -> Result<(), ResourceError> {
        check_location("Start location", &row.start_location)?;
        check_location("End location", &row.end_location)?;
        check_times(&row.start_time, &row.end_time)?;
        check_distance(row.distance_travelled)
    }

    fn draft_into_row(
        id: Uuid,
        owner: Uuid,
        now: DateTimeWithTimeZone,
        draft: Self::Draft,
    ) -> Self::Row {
        rental_history::Model {
            id,
            created_at: now,
            updated_at: now,
            user_id: Some(owner),
            scooter_id: draft.scooter_id,
            start_time: draft.start_time,
            end_time: draft.end_time,
            start_location: draft.start_location,
            end_location: draft.end_location,
            distance_travelled: draft.distance_travelled,
        }
    }

    fn apply_patch(row: &mut Self::Row, patch: Self::Patch, now: DateTimeWithTimeZone) {
        if let Some(scooter_id) = patch.scooter_id {
            row.scooter_id = Some(scooter_id);
        }
        if let Some(start_time) = patch.start_time {
            row.start_time = start_time;
        }
        if let Some(end_time) = patch.end_time {
            row.end_time = end_time;
        }
        if let Some(start_location) = patch.start_location {
            row.start_location = start_location;
        }
        if let Some(end_location) = patch.end_location {
            row.end_location = end_location;
        }
        if let Some(distance) = patch.distance_travelled {
            row.distance_travelled = distance;
        }
        row.updated_at = now;
    }

    fn related_key(row: &Self::Row) -> Option<Uuid> {
        row.scooter_id
    }

    fn listed(row: Self::Row, related: Option<Self::Related>) -> Self::Listed {
        RentalListing {
            rental: row,
            scooter: related,
        }
    }
}

fn patch_active(active: &mut rental_history::ActiveModel, patch: RentalPatch) {
    if let Some(scooter_id) = patch.scooter_id {
        active.scooter_id = Set(Some(scooter_id));
    }
    if let Some(start_time) = patch.start_time {
        active.start_time = Set(start_time);
    }
    if let Some(end_time) = patch.end_time {
        active.end_time = Set(end_time);
    }
    if let Some(start_location) = patch.start_location {
        active.start_location = Set(start_location);
    }
    if let Some(end_location) = patch.end_location {
        active.end_location = Set(end_location);
    }
    if let Some(distance) = patch.distance_travelled {
        active.distance_travelled = Set(distance);
    }
}

/// Rental history backed by the `rental_history` table, scooters expanded
/// from `scooter`.
#[derive(Clone)]
pub struct RentalHistoryStore {
    rentals: RentalHistoryDao,
    scooters: ScooterDao,
}

impl RentalHistoryStore {
    pub fn new(daos: &DaoContext) -> Self {
        Self {
            rentals: daos.rental_history(),
            scooters: daos.scooter(),
        }
    }
}

#[async_trait]
impl ResourceStore<RentalHistoryResource> for RentalHistoryStore {
    async fn count(&self, owner: Uuid) -> Result<u64, StoreError> {
        Ok(self.rentals.count_owned(owner).await?)
    }

    async fn range(&self, owner: Uuid, from: u64, to: u64) -> Result<Vec<RentalListing>, StoreError> {
        if to < from {
            return Ok(Vec::new());
        }
        let rows = self
            .rentals
            .find_owned_range(owner, from, to.saturating_sub(from).saturating_add(1))
            .await?;

        let mut scooter_ids: Vec<Uuid> = rows.iter().filter_map(|row| row.scooter_id).collect();
        scooter_ids.sort_unstable();
        scooter_ids.dedup();
        let scooters: HashMap<Uuid, ScooterSummary> = self
            .scooters
            .find_by_ids(&scooter_ids)
            .await?
            .iter()
            .map(|scooter| (scooter.id, ScooterSummary::from(scooter)))
            .collect();

        Ok(rows
            .into_iter()
            .map(|row| {
                let scooter = row.scooter_id.and_then(|id| scooters.get(&id).cloned());
                RentalHistoryResource::listed(row, scooter)
            })
            .collect())
    }

    async fn current(&self, id: Uuid) -> Result<Option<rental_history::Model>, StoreError> {
        Ok(self.rentals.find_current(id).await?)
    }

    async fn insert(&self, owner: Uuid, draft: RentalDraft) -> Result<rental_history::Model, StoreError> {
        let active = rental_history::ActiveModel {
            scooter_id: Set(draft.scooter_id),
            start_time: Set(draft.start_time),
            end_time: Set(draft.end_time),
            start_location: Set(draft.start_location),
            end_location: Set(draft.end_location),
            distance_travelled: Set(draft.distance_travelled),
            ..Default::default()
        };
        Ok(self.rentals.create_owned(owner, active).await?)
    }

    async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: RentalPatch,
    ) -> Result<Option<rental_history::Model>, StoreError> {
        Ok(self
            .rentals
            .update_owned(id, owner, move |active| patch_active(active, patch))
            .await?)
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        Ok(self.rentals.delete_owned(id, owner).await?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
    use uuid::Uuid;

    use crate::{
        db::{
            dao::DaoContext,
            entities::{rental_history, scooter},
        },
        resources::{Resource, ResourceStore},
    };

    use super::{RentalDraft, RentalHistoryResource, RentalHistoryStore, RentalPatch};

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn rental(owner: Uuid, scooter_id: Option<Uuid>) -> rental_history::Model {
        rental_history::Model {
            id: Uuid::new_v4(),
            created_at: ts(),
            updated_at: ts(),
            user_id: Some(owner),
            scooter_id,
            start_time: ts(),
            end_time: ts() + Duration::minutes(30),
            start_location: "Place de la Comédie".to_string(),
            end_location: "Gare Saint-Roch".to_string(),
            distance_travelled: 2.4,
        }
    }

    fn scooter_model(id: Uuid) -> scooter::Model {
        scooter::Model {
            id,
            created_at: ts(),
            updated_at: ts(),
            reference_number: Some("SC-0042".to_string()),
            model: Some("Xiaomi Pro 2".to_string()),
            current_location: "Antigone".to_string(),
            current_status: "IS_AT_STATION".to_string(),
        }
    }

    fn draft() -> RentalDraft {
        RentalDraft {
            scooter_id: None,
            start_time: ts(),
            end_time: ts() + Duration::minutes(20),
            start_location: "Odysseum".to_string(),
            end_location: "Port Marianne".to_string(),
            distance_travelled: 3.1,
        }
    }

    #[test]
    fn drafts_must_have_locations_and_ordered_times() {
        assert!(RentalHistoryResource::validate_draft(&draft()).is_ok());

        let blank = RentalDraft {
            start_location: "  ".to_string(),
            ..draft()
        };
        assert_eq!(
            RentalHistoryResource::validate_draft(&blank)
                .expect_err("blank location should fail")
                .to_string(),
            "Start location is required"
        );

        let reversed = RentalDraft {
            end_time: ts() - Duration::minutes(1),
            ..draft()
        };
        assert!(RentalHistoryResource::validate_draft(&reversed).is_err());

        let negative = RentalDraft {
            distance_travelled: -0.5,
            ..draft()
        };
        assert!(RentalHistoryResource::validate_draft(&negative).is_err());
    }

    #[test]
    fn patches_only_check_present_fields() {
        assert!(RentalHistoryResource::validate_patch(&RentalPatch::default()).is_ok());

        let patch = RentalPatch {
            distance_travelled: Some(f64::NAN),
            ..RentalPatch::default()
        };
        assert!(RentalHistoryResource::validate_patch(&patch).is_err());
    }

    #[tokio::test]
    async fn range_expands_scooters_and_tolerates_missing_ones() {
        let owner = Uuid::new_v4();
        let known = Uuid::new_v4();
        let vanished = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[
                rental(owner, Some(known)),
                rental(owner, Some(vanished)),
                rental(owner, None),
            ]])
            .append_query_results([[scooter_model(known)]])
            .into_connection();
        let store = RentalHistoryStore::new(&DaoContext::new(&db));

        let listed = store.range(owner, 0, 9).await.expect("range should succeed");

        assert_eq!(listed.len(), 3);
        assert_eq!(
            listed[0].scooter.as_ref().map(|scooter| scooter.id),
            Some(known)
        );
        assert!(listed[1].scooter.is_none());
        assert!(listed[2].scooter.is_none());
    }

    #[tokio::test]
    async fn range_surfaces_store_message() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("statement timeout".to_string())])
            .into_connection();
        let store = RentalHistoryStore::new(&DaoContext::new(&db));

        let err = store
            .range(Uuid::new_v4(), 0, 9)
            .await
            .expect_err("range should fail");

        assert_eq!(err.message(), "Custom Error: statement timeout");
    }

    #[tokio::test]
    async fn insert_stamps_owner() {
        let owner = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[rental(owner, None)]])
            .into_connection();
        let store = RentalHistoryStore::new(&DaoContext::new(&db));

        let row = store.insert(owner, draft()).await.expect("insert should succeed");

        assert_eq!(row.user_id, Some(owner));
    }
}
