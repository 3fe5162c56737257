pub trait HasCreatedAtColumn: sea_orm::EntityTrait {
    fn created_at_column() -> Self::Column;
}

pub trait HasIdColumn: sea_orm::EntityTrait {
    fn id_column() -> Self::Column;
}

pub trait HasIdActiveModel {
    fn set_id(&mut self, id: uuid::Uuid);
}

pub trait TimestampedActiveModel {
    fn set_created_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone);
    fn set_updated_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone);
}

/// Entities whose rows belong to a profile through an owner column.
pub trait HasOwnerColumn: sea_orm::EntityTrait {
    fn owner_column() -> Self::Column;
}

pub trait OwnedModel {
    /// `None` when the owner reference was cleared.
    fn owner_id(&self) -> Option<uuid::Uuid>;
}

pub trait OwnedActiveModel {
    fn set_owner(&mut self, owner: uuid::Uuid);
}
