use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::{prelude::Profile, profile};

#[derive(Clone)]
pub struct ProfileDao {
    db: DatabaseConnection,
}

impl DaoBase for ProfileDao {
    type Entity = Profile;
    type Model = profile::Model;
    type ActiveModel = profile::ActiveModel;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl ProfileDao {
    /// Profiles linked to `auth_user_id`. At most two rows are read: enough to
    /// tell a healthy lookup (0 or 1) from a duplicated one.
    pub async fn find_by_auth_user(&self, auth_user_id: &Uuid) -> DaoResult<Vec<profile::Model>> {
        Profile::find()
            .filter(profile::Column::AuthUserId.eq(*auth_user_id))
            .limit(2)
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

    use crate::db::entities::profile;

    use super::ProfileDao;
    use crate::db::dao::{DaoBase, DaoLayerError};

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn profile_model(auth_user_id: Uuid) -> profile::Model {
        profile::Model {
            id: Uuid::new_v4(),
            created_at: ts(),
            updated_at: ts(),
            auth_user_id,
            username: Some("rider".to_string()),
            first_name: None,
            last_name: None,
            email: Some("rider@example.com".to_string()),
            phone: None,
            address: None,
            is_partner: false,
        }
    }

    #[tokio::test]
    async fn find_by_auth_user_returns_single_profile() {
        let auth_user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[profile_model(auth_user_id)]])
            .into_connection();
        let dao = ProfileDao::new(&db);

        let rows = dao
            .find_by_auth_user(&auth_user_id)
            .await
            .expect("query should succeed");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].auth_user_id, auth_user_id);
    }

    #[tokio::test]
    async fn find_by_auth_user_surfaces_duplicates() {
        let auth_user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[profile_model(auth_user_id), profile_model(auth_user_id)]])
            .into_connection();
        let dao = ProfileDao::new(&db);

        let rows = dao
            .find_by_auth_user(&auth_user_id)
            .await
            .expect("query should succeed");
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn find_by_auth_user_maps_database_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("select failed".to_string())])
            .into_connection();
        let dao = ProfileDao::new(&db);

        let err = dao
            .find_by_auth_user(&Uuid::new_v4())
            .await
            .expect_err("query should fail");
        assert!(matches!(err, DaoLayerError::Db(_)));
    }
}
