use uuid::Uuid;

use crate::{
    db::dao::{AuthUserDao, DaoBase, DaoLayerError},
    db::entities::auth_user,
    error::AppError,
};

#[derive(Clone)]
pub struct AuthUserService {
    auth_user_dao: AuthUserDao,
}

impl AuthUserService {
    pub fn new(auth_user_dao: AuthUserDao) -> Self {
        Self { auth_user_dao }
    }

    pub async fn find_by_id(&self, id: &Uuid) -> Result<Option<auth_user::Model>, AppError> {
        match self.auth_user_dao.find_by_id(*id).await {
            Ok(model) => Ok(Some(model)),
            Err(DaoLayerError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<auth_user::Model>, AppError> {
        Ok(self.auth_user_dao.find_by_email(email).await?)
    }

    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<auth_user::Model, AppError> {
        Ok(self
            .auth_user_dao
            .create_user(email, password_hash, role)
            .await?)
    }

    pub async fn set_last_login(
        &self,
        user_id: &Uuid,
        last_login: &chrono::DateTime<chrono::FixedOffset>,
    ) -> Result<(), AppError> {
        Ok(self.auth_user_dao.set_last_login(user_id, last_login).await?)
    }

    pub async fn delete_user(&self, user_id: &Uuid) -> Result<(), AppError> {
        Ok(self.auth_user_dao.delete_user(user_id).await?)
    }
}
