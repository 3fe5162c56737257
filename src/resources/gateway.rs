use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::{Resource, ResourceError, ResourceStore};
use crate::cache::{Invalidation, InvalidationBus};

#[derive(Debug, Clone, Copy)]
enum Op {
    Update,
    Delete,
}

impl Op {
    fn as_str(self) -> &'static str {
        match self {
            Op::Update => "update",
            Op::Delete => "delete",
        }
    }
}

/// Owner-checked writes. Every successful write publishes an invalidation for
/// the resource kind.
pub struct MutationGateway<R: Resource> {
    store: Arc<dyn ResourceStore<R>>,
    bus: InvalidationBus,
}

impl<R: Resource> Clone for MutationGateway<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            bus: self.bus.clone(),
        }
    }
}

impl<R: Resource> MutationGateway<R> {
    pub fn new(store: Arc<dyn ResourceStore<R>>, bus: InvalidationBus) -> Self {
        Self { store, bus }
    }

    pub async fn create(&self, owner: Uuid, draft: R::Draft) -> Result<R::Row, ResourceError> {
        require_user(owner)?;
        R::validate_draft(&draft)?;

        let row = self.store.insert(owner, draft).await.map_err(|err| {
            ResourceError::store(format!("Failed to create {}", R::KIND.singular()), err)
        })?;

        self.published(row)
    }

    pub async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: R::Patch,
    ) -> Result<R::Row, ResourceError> {
        require_id::<R>(id)?;
        require_user(owner)?;
        R::validate_patch(&patch)?;
        let mut merged = self.owned_row(id, owner, Op::Update).await?;
        R::apply_patch(&mut merged, patch.clone(), Utc::now().fixed_offset());
        R::validate_row(&merged)?;

        let row = self
            .store
            .update(id, owner, patch)
            .await
            .map_err(|err| {
                ResourceError::store(format!("Failed to update {}", R::KIND.singular()), err)
            })?
            .ok_or_else(not_found::<R>)?;

        self.published(row)
    }

    pub async fn delete(&self, id: Uuid, owner: Uuid) -> Result<(), ResourceError> {
        require_id::<R>(id)?;
        require_user(owner)?;
        self.owned_row(id, owner, Op::Delete).await?;

        let deleted = self.store.delete(id, owner).await.map_err(|err| {
            ResourceError::store(format!("Failed to delete {}", R::KIND.singular()), err)
        })?;
        if !deleted {
            return Err(not_found::<R>());
        }

        self.published(())
    }

    /// The stored row, once it is known to belong to `owner`.
    async fn owned_row(&self, id: Uuid, owner: Uuid, op: Op) -> Result<R::Row, ResourceError> {
        let current = self.store.current(id).await.map_err(|err| {
            ResourceError::store(
                format!("Failed to verify {} ownership", R::KIND.noun()),
                err,
            )
        })?;

        match current {
            None => Err(not_found::<R>()),
            Some(row) if R::row_owner(&row) == Some(owner) => Ok(row),
            Some(_) => {
                tracing::debug!(kind = %R::KIND, %id, %owner, "ownership check rejected {}", op.as_str());
                Err(ResourceError::NotAuthorized(format!(
                    "You are not authorized to {} this {}",
                    op.as_str(),
                    R::KIND.noun()
                )))
            }
        }
    }

    fn published<T>(&self, value: T) -> Result<T, ResourceError> {
        self.bus.publish(Invalidation::Resource(R::KIND));
        Ok(value)
    }
}

fn require_user(owner: Uuid) -> Result<(), ResourceError> {
    if owner.is_nil() {
        return Err(ResourceError::validation("User ID is required"));
    }
    Ok(())
}

fn require_id<R: Resource>(id: Uuid) -> Result<(), ResourceError> {
    if id.is_nil() {
        return Err(ResourceError::validation(format!(
            "{} ID is required",
            R::KIND.title()
        )));
    }
    Ok(())
}

fn not_found<R: Resource>() -> ResourceError {
    ResourceError::NotFound(format!("{} not found", R::KIND.title()))
}
