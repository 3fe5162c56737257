use chrono::{DateTime, FixedOffset};
use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::{auth_user, prelude::AuthUser};

#[derive(Clone)]
pub struct AuthUserDao {
    db: DatabaseConnection,
}

impl DaoBase for AuthUserDao {
    type Entity = AuthUser;
    type Model = auth_user::Model;
    type ActiveModel = auth_user::ActiveModel;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl AuthUserDao {
    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<auth_user::Model>> {
        let email = email.to_string();
        self.find(1, 1, None, move |query| {
            query.filter(auth_user::Column::Email.eq(email))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> DaoResult<auth_user::Model> {
        let model = auth_user::ActiveModel {
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            role: Set(role.to_string()),
            last_login_at: Set(None),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn set_last_login(&self, id: &Uuid, at: &DateTime<FixedOffset>) -> DaoResult<()> {
        let at = *at;
        self.update(*id, move |active| {
            active.last_login_at = Set(Some(at));
        })
        .await
        .map(|_| ())
    }

    /// Removes the identity together with its refresh tokens (cascade).
    pub async fn delete_user(&self, id: &Uuid) -> DaoResult<()> {
        self.delete(*id).await.map(|_| ())
    }
}
