use std::{
    collections::{HashMap, HashSet},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{Resource, ResourceStore, StoreError};

/// Store operations that can be made to fail on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Count,
    Range,
    Current,
    Insert,
    Update,
    Delete,
}

/// In-process `ResourceStore` with the same ordering and ownership rules as
/// the database store.
pub struct MemoryStore<R: Resource> {
    rows: RwLock<Vec<R::Row>>,
    related: RwLock<HashMap<Uuid, R::Related>>,
    failing: RwLock<HashSet<StoreOp>>,
    calls: RwLock<Vec<StoreOp>>,
}

impl<R: Resource> Default for MemoryStore<R> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            related: RwLock::new(HashMap::new()),
            failing: RwLock::new(HashSet::new()),
            calls: RwLock::new(Vec::new()),
        }
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("memory store lock poisoned".to_string())
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, StoreError> {
    lock.read().map_err(|_| poisoned())
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, StoreError> {
    lock.write().map_err(|_| poisoned())
}

impl<R: Resource> MemoryStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a prepared row as is.
    pub fn seed(&self, row: R::Row) -> Result<(), StoreError> {
        write(&self.rows)?.push(row);
        Ok(())
    }

    pub fn set_related(&self, key: Uuid, related: R::Related) -> Result<(), StoreError> {
        write(&self.related)?.insert(key, related);
        Ok(())
    }

    pub fn snapshot(&self) -> Result<Vec<R::Row>, StoreError> {
        Ok(read(&self.rows)?.clone())
    }

    pub fn fail(&self, op: StoreOp) -> Result<(), StoreError> {
        write(&self.failing)?.insert(op);
        Ok(())
    }

    pub fn heal(&self) -> Result<(), StoreError> {
        write(&self.failing)?.clear();
        Ok(())
    }

    /// Operations attempted so far, failed ones included.
    pub fn calls(&self) -> Result<Vec<StoreOp>, StoreError> {
        Ok(read(&self.calls)?.clone())
    }

    fn enter(&self, op: StoreOp) -> Result<(), StoreError> {
        write(&self.calls)?.push(op);
        if read(&self.failing)?.contains(&op) {
            return Err(StoreError::Unavailable(format!(
                "{} store rejected {op:?}",
                R::KIND.as_str()
            )));
        }
        Ok(())
    }

    fn owned_by(row: &R::Row, owner: Uuid) -> bool {
        R::row_owner(row) == Some(owner)
    }
}

#[async_trait]
impl<R: Resource> ResourceStore<R> for MemoryStore<R> {
    async fn count(&self, owner: Uuid) -> Result<u64, StoreError> {
        self.enter(StoreOp::Count)?;
        let rows = read(&self.rows)?;
        Ok(rows.iter().filter(|row| Self::owned_by(row, owner)).count() as u64)
    }

    async fn range(&self, owner: Uuid, from: u64, to: u64) -> Result<Vec<R::Listed>, StoreError> {
        self.enter(StoreOp::Range)?;
        if to < from {
            return Ok(Vec::new());
        }

        let mut owned: Vec<R::Row> = read(&self.rows)?
            .iter()
            .filter(|row| Self::owned_by(row, owner))
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            R::row_created_at(b)
                .cmp(&R::row_created_at(a))
                .then_with(|| R::row_id(b).cmp(&R::row_id(a)))
        });

        let related = read(&self.related)?;
        Ok(owned
            .into_iter()
            .skip(from as usize)
            .take(to.saturating_sub(from).saturating_add(1) as usize)
            .map(|row| {
                let expanded = R::related_key(&row).and_then(|key| related.get(&key).cloned());
                R::listed(row, expanded)
            })
            .collect())
    }

    async fn current(&self, id: Uuid) -> Result<Option<R::Row>, StoreError> {
        self.enter(StoreOp::Current)?;
        Ok(read(&self.rows)?
            .iter()
            .find(|row| R::row_id(row) == id)
            .cloned())
    }

    async fn insert(&self, owner: Uuid, draft: R::Draft) -> Result<R::Row, StoreError> {
        self.enter(StoreOp::Insert)?;
        let row = R::draft_into_row(Uuid::new_v4(), owner, Utc::now().fixed_offset(), draft);
        write(&self.rows)?.push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: R::Patch,
    ) -> Result<Option<R::Row>, StoreError> {
        self.enter(StoreOp::Update)?;
        let mut rows = write(&self.rows)?;
        let Some(row) = rows
            .iter_mut()
            .find(|row| R::row_id(row) == id && Self::owned_by(row, owner))
        else {
            return Ok(None);
        };
        R::apply_patch(row, patch, Utc::now().fixed_offset());
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        self.enter(StoreOp::Delete)?;
        let mut rows = write(&self.rows)?;
        let before = rows.len();
        rows.retain(|row| !(R::row_id(row) == id && Self::owned_by(row, owner)));
        Ok(rows.len() < before)
    }
}
