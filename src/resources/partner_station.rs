use async_trait::async_trait;
use sea_orm::{Set, prelude::DateTimeWithTimeZone};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Resource, ResourceError, ResourceKind, ResourceStore, StoreError};
use crate::db::{
    dao::{DaoContext, OwnedDao, OwnedModel, PartnerStationDao},
    entities::partner_station,
};

pub struct PartnerStationResource;

fn default_open() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationDraft {
    pub name: String,
    pub address: String,
    pub max_slots: i32,
    #[serde(default)]
    pub filled_slots: i32,
    #[serde(default = "default_open")]
    pub is_open: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StationPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub max_slots: Option<i32>,
    pub filled_slots: Option<i32>,
    pub is_open: Option<bool>,
}

fn check_text(label: &str, value: &str) -> Result<(), ResourceError> {
    if value.trim().is_empty() {
        return Err(ResourceError::validation(format!("{label} is required")));
    }
    Ok(())
}

fn check_slots(max_slots: Option<i32>, filled_slots: Option<i32>) -> Result<(), ResourceError> {
    if max_slots.is_some_and(|max| max < 0) {
        return Err(ResourceError::validation("Max slots must not be negative"));
    }
    let filled_in_range = match (filled_slots, max_slots) {
        (Some(filled), Some(max)) => (0..=max).contains(&filled),
        (Some(filled), None) => filled >= 0,
        (None, _) => true,
    };
    if !filled_in_range {
        return Err(ResourceError::validation(
            "Filled slots must be between 0 and max slots",
        ));
    }
    Ok(())
}

impl Resource for PartnerStationResource {
    const KIND: ResourceKind = ResourceKind::PartnerStation;

    type Row = partner_station::Model;
    type Listed = partner_station::Model;
    type Draft = StationDraft;
    type Patch = StationPatch;
    type Related = ();

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
        check_text("Station name", &draft.name)?;
        check_text("Station address", &draft.address)?;
        check_slots(Some(draft.max_slots), Some(draft.filled_slots))
    }

    fn validate_patch(patch: &Self::Patch) -> Result<(), ResourceError> {
        if let Some(name) = &patch.name {
            check_text("Station name", name)?;
        }
        if let Some(address) = &patch.address {
            check_text("Station address", address)?;
        }
        check_slots(patch.max_slots, patch.filled_slots)
    }

    fn validate_row(row: &Self::Row) -> Result<(), ResourceError> {
        check_text("Station name", &row.name)?;
        check_text("Station address", &row.address)?;
        check_slots(Some(row.max_slots), Some(row.filled_slots))
    }

    fn draft_into_row(
        id: Uuid,
        owner: Uuid,
        now: DateTimeWithTimeZone,
        draft: Self::Draft,
    ) -> Self::Row {
        partner_station::Model {
            id,
            created_at: now,
            updated_at: now,
            user_id: Some(owner),
            name: draft.name,
            address: draft.address,
            max_slots: draft.max_slots,
            filled_slots: draft.filled_slots,
            is_open: draft.is_open,
        }
    }

    fn apply_patch(row: &mut Self::Row, patch: Self::Patch, now: DateTimeWithTimeZone) {
        if let Some(name) = patch.name {
            row.name = name;
        }
        if let Some(address) = patch.address {
            row.address = address;
        }
        if let Some(max_slots) = patch.max_slots {
            row.max_slots = max_slots;
        }
        if let Some(filled_slots) = patch.filled_slots {
            row.filled_slots = filled_slots;
        }
        if let Some(is_open) = patch.is_open {
            row.is_open = is_open;
        }
        row.updated_at = now;
    }

    fn related_key(_row: &Self::Row) -> Option<Uuid> {
        None
    }

    fn listed(row: Self::Row, _related: Option<()>) -> Self::Listed {
        row
    }
}

#[derive(Clone)]
pub struct PartnerStationStore {
    stations: PartnerStationDao,
}

impl PartnerStationStore {
    pub fn new(daos: &DaoContext) -> Self {
        Self {
            stations: daos.partner_station(),
        }
    }
}

#[async_trait]
impl ResourceStore<PartnerStationResource> for PartnerStationStore {
    async fn count(&self, owner: Uuid) -> Result<u64, StoreError> {
        Ok(self.stations.count_owned(owner).await?)
    }

    async fn range(
        &self,
        owner: Uuid,
        from: u64,
        to: u64,
    ) -> Result<Vec<partner_station::Model>, StoreError> {
        if to < from {
            return Ok(Vec::new());
        }
        Ok(self
            .stations
            .find_owned_range(owner, from, to.saturating_sub(from).saturating_add(1))
            .await?)
    }

    async fn current(&self, id: Uuid) -> Result<Option<partner_station::Model>, StoreError> {
        Ok(self.stations.find_current(id).await?)
    }

    async fn insert(
        &self,
        owner: Uuid,
        draft: StationDraft,
    ) -> Result<partner_station::Model, StoreError> {
        let active = partner_station::ActiveModel {
            name: Set(draft.name),
            address: Set(draft.address),
            max_slots: Set(draft.max_slots),
            filled_slots: Set(draft.filled_slots),
            is_open: Set(draft.is_open),
            ..Default::default()
        };
        Ok(self.stations.create_owned(owner, active).await?)
    }

    async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: StationPatch,
    ) -> Result<Option<partner_station::Model>, StoreError> {
        Ok(self
            .stations
            .update_owned(id, owner, move |active| {
                if let Some(name) = patch.name {
                    active.name = Set(name);
                }
                if let Some(address) = patch.address {
                    active.address = Set(address);
                }
                if let Some(max_slots) = patch.max_slots {
                    active.max_slots = Set(max_slots);
                }
                if let Some(filled_slots) = patch.filled_slots {
                    active.filled_slots = Set(filled_slots);
                }
                if let Some(is_open) = patch.is_open {
                    active.is_open = Set(is_open);
                }
            })
            .await?)
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        Ok(self.stations.delete_owned(id, owner).await?)
    }
}

#[cfg(test)]
mod tests {
    use crate::resources::Resource;

    use super::{PartnerStationResource, StationDraft, StationPatch};

    fn draft() -> StationDraft {
        StationDraft {
            name: "Comédie".to_string(),
            address: "1 Place de la Comédie".to_string(),
            max_slots: 10,
            filled_slots: 4,
            is_open: true,
        }
    }

    #[test]
    fn draft_defaults_to_open_station() {
        let draft: StationDraft = serde_json::from_value(serde_json::json!({
            "name": "Antigone",
            "address": "Place du Nombre d'Or",
            "max_slots": 6
        }))
        .expect("draft should deserialize");

        assert!(draft.is_open);
        assert_eq!(draft.filled_slots, 0);
    }

    #[test]
    fn filled_slots_cannot_exceed_capacity() {
        assert!(PartnerStationResource::validate_draft(&draft()).is_ok());

        let overfull = StationDraft {
            filled_slots: 11,
            ..draft()
        };
        assert_eq!(
            PartnerStationResource::validate_draft(&overfull)
                .expect_err("overfull station should fail")
                .to_string(),
            "Filled slots must be between 0 and max slots"
        );

        let negative = StationPatch {
            max_slots: Some(-1),
            ..StationPatch::default()
        };
        assert!(PartnerStationResource::validate_patch(&negative).is_err());
    }

    #[test]
    fn blank_names_are_rejected() {
        let patch = StationPatch {
            name: Some(" ".to_string()),
            ..StationPatch::default()
        };
        assert_eq!(
            PartnerStationResource::validate_patch(&patch)
                .expect_err("blank name should fail")
                .to_string(),
            "Station name is required"
        );
    }
}
