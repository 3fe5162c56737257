use async_trait::async_trait;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use super::{ResourceError, ResourceKind, StoreError};

/// An owned row family: its stored row, its listed (expanded) form and its
/// write payloads.
pub trait Resource: Send + Sync + 'static {
    const KIND: ResourceKind;

    type Row: Clone + Serialize + Send + Sync + 'static;
    type Listed: Clone + Serialize + Send + Sync + 'static;
    type Draft: Clone + DeserializeOwned + Send + Sync + 'static;
    type Patch: Clone + DeserializeOwned + Send + Sync + 'static;
    /// Foreign row expanded on read; `()` when nothing is expanded.
    type Related: Clone + Send + Sync + 'static;

    fn row_id(row: &Self::Row) -> Uuid;
    fn row_owner(row: &Self::Row) -> Option<Uuid>;
    fn row_created_at(row: &Self::Row) -> DateTimeWithTimeZone;

    fn validate_draft(draft: &Self::Draft) -> Result<(), ResourceError>;
    /// Field rules that hold on their own; cross-field rules are checked on
    /// the patched row with [`Resource::validate_row`].
    fn validate_patch(patch: &Self::Patch) -> Result<(), ResourceError>;
    fn validate_row(row: &Self::Row) -> Result<(), ResourceError>;

    fn draft_into_row(id: Uuid, owner: Uuid, now: DateTimeWithTimeZone, draft: Self::Draft)
    -> Self::Row;
    fn apply_patch(row: &mut Self::Row, patch: Self::Patch, now: DateTimeWithTimeZone);

    fn related_key(row: &Self::Row) -> Option<Uuid>;
    fn listed(row: Self::Row, related: Option<Self::Related>) -> Self::Listed;
}

/// Query surface over one resource table. Ranges are inclusive and ordered
/// newest first, ties broken by id.
#[async_trait]
pub trait ResourceStore<R: Resource>: Send + Sync {
    async fn count(&self, owner: Uuid) -> Result<u64, StoreError>;

    async fn range(&self, owner: Uuid, from: u64, to: u64) -> Result<Vec<R::Listed>, StoreError>;

    /// The stored row, whoever owns it; `None` when it does not exist.
    async fn current(&self, id: Uuid) -> Result<Option<R::Row>, StoreError>;

    async fn insert(&self, owner: Uuid, draft: R::Draft) -> Result<R::Row, StoreError>;

    /// Writes only when `id` is owned by `owner`; `None` when nothing matched.
    async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: R::Patch,
    ) -> Result<Option<R::Row>, StoreError>;

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError>;
}
