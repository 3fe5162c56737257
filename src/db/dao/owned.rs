use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use super::base::DaoBase;
use super::base_traits::{
    HasCreatedAtColumn, HasIdColumn, HasOwnerColumn, OwnedActiveModel, OwnedModel,
    TimestampedActiveModel,
};
use super::error::{DaoLayerError, DaoResult};

/// Queries over rows that belong to a profile. Every write repeats the owner
/// filter, so a row is only ever touched through its owner.
#[async_trait::async_trait]
pub trait OwnedDao:
    DaoBase<Entity: HasOwnerColumn, Model: OwnedModel, ActiveModel: OwnedActiveModel>
{
    async fn count_owned(&self, owner: Uuid) -> DaoResult<u64> {
        Self::Entity::find()
            .filter(<Self::Entity as HasOwnerColumn>::owner_column().eq(owner))
            .count(self.db())
            .await
            .map_err(DaoLayerError::Db)
    }

    /// Rows `offset..offset + limit` of the owner's rows, newest first with the
    /// id as tie breaker so consecutive ranges never overlap.
    async fn find_owned_range(
        &self,
        owner: Uuid,
        offset: u64,
        limit: u64,
    ) -> DaoResult<Vec<Self::Model>> {
        Self::Entity::find()
            .filter(<Self::Entity as HasOwnerColumn>::owner_column().eq(owner))
            .order_by_desc(<Self::Entity as HasCreatedAtColumn>::created_at_column())
            .order_by_desc(<Self::Entity as HasIdColumn>::id_column())
            .offset(offset)
            .limit(limit)
            .all(self.db())
            .await
            .map_err(DaoLayerError::Db)
    }

    /// Unlike `find_by_id`, a missing row is `None` rather than an error.
    async fn find_current(&self, id: Uuid) -> DaoResult<Option<Self::Model>> {
        Self::Entity::find()
            .filter(<Self::Entity as HasIdColumn>::id_column().eq(id))
            .one(self.db())
            .await
            .map_err(DaoLayerError::Db)
    }

    async fn create_owned(
        &self,
        owner: Uuid,
        data: impl IntoActiveModel<Self::ActiveModel> + Send,
    ) -> DaoResult<Self::Model> {
        let mut active = data.into_active_model();
        active.set_owner(owner);
        self.create(active).await
    }

    /// Applies `apply` to the row matching both `id` and `owner`. Returns
    /// `None` when no such row exists.
    async fn update_owned<F>(&self, id: Uuid, owner: Uuid, apply: F) -> DaoResult<Option<Self::Model>>
    where
        F: for<'a> FnOnce(&'a mut Self::ActiveModel) + Send,
    {
        let mut active = <Self::ActiveModel as ActiveModelTrait>::default();
        apply(&mut active);
        active.set_updated_at(Utc::now().fixed_offset());

        let updated = Self::Entity::update_many()
            .set(active)
            .filter(<Self::Entity as HasIdColumn>::id_column().eq(id))
            .filter(<Self::Entity as HasOwnerColumn>::owner_column().eq(owner))
            .exec_with_returning(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        Ok(updated.into_iter().next())
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> DaoResult<bool> {
        let result = Self::Entity::delete_many()
            .filter(<Self::Entity as HasIdColumn>::id_column().eq(id))
            .filter(<Self::Entity as HasOwnerColumn>::owner_column().eq(owner))
            .exec(self.db())
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected > 0)
    }
}
