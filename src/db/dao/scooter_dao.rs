use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult, PaginatedResponse};
use crate::db::entities::{
    prelude::Scooter,
    scooter::{self, ScooterStatus},
};

#[derive(Clone)]
pub struct ScooterDao {
    db: DatabaseConnection,
}

impl DaoBase for ScooterDao {
    type Entity = Scooter;
    type Model = scooter::Model;
    type ActiveModel = scooter::ActiveModel;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl ScooterDao {
    pub async fn create_scooter(
        &self,
        reference_number: Option<String>,
        model: Option<String>,
        current_location: &str,
        status: ScooterStatus,
    ) -> DaoResult<scooter::Model> {
        let active = scooter::ActiveModel {
            reference_number: Set(reference_number),
            model: Set(model),
            current_location: Set(current_location.to_string()),
            current_status: Set(status.as_str().to_string()),
            ..Default::default()
        };
        self.create(active).await
    }

    pub async fn list(
        &self,
        page: u64,
        page_size: u64,
    ) -> DaoResult<PaginatedResponse<scooter::Model>> {
        self.find(page, page_size, None, |query| query).await
    }

    pub async fn count_all(&self) -> DaoResult<u64> {
        self.count(|query| query).await
    }

    /// Scooter at position `offset` in a stable (id) order.
    pub async fn find_at_offset(&self, offset: u64) -> DaoResult<Option<scooter::Model>> {
        Scooter::find()
            .order_by_asc(scooter::Column::Id)
            .offset(offset)
            .limit(1)
            .one(&self.db)
            .await
            .map_err(DaoLayerError::Db)
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> DaoResult<Vec<scooter::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Scooter::find()
            .filter(scooter::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(DaoLayerError::Db)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
    use uuid::Uuid;

    use crate::db::entities::scooter::{self, ScooterStatus};

    use super::ScooterDao;
    use crate::db::dao::{DaoBase, DaoLayerError};

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn scooter_model(id: Uuid) -> scooter::Model {
        scooter::Model {
            id,
            created_at: ts(),
            updated_at: ts(),
            reference_number: Some("SC-001".to_string()),
            model: Some("Xiaomi Pro 2".to_string()),
            current_location: "Place de la Comédie".to_string(),
            current_status: ScooterStatus::IsAtStation.as_str().to_string(),
        }
    }

    #[tokio::test]
    async fn find_by_ids_skips_query_for_empty_input() {
        // no results appended: any query would fail
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let dao = ScooterDao::new(&db);

        let rows = dao.find_by_ids(&[]).await.expect("lookup should succeed");
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn find_at_offset_returns_scooter() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[scooter_model(id)]])
            .into_connection();
        let dao = ScooterDao::new(&db);

        let scooter = dao
            .find_at_offset(3)
            .await
            .expect("query should succeed")
            .expect("scooter should exist");
        assert_eq!(scooter.id, id);
    }

    #[tokio::test]
    async fn find_at_offset_maps_database_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("select failed".to_string())])
            .into_connection();
        let dao = ScooterDao::new(&db);

        let err = dao.find_at_offset(0).await.expect_err("query should fail");
        assert!(matches!(err, DaoLayerError::Db(_)));
    }
}
