use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::dao::{DaoBase, ProfileDao},
    db::entities::profile,
    error::AppError,
};

/// Optional profile fields captured at registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileDraft {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Settings update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProfileSettings {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_partner: Option<bool>,
}

impl ProfileSettings {
    fn validate(&self) -> Result<(), AppError> {
        if self
            .username
            .as_deref()
            .is_some_and(|username| username.trim().is_empty())
        {
            return Err(AppError::bad_request("Username must not be blank"));
        }
        Ok(())
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn set_text(target: &mut ActiveValue<Option<String>>, value: Option<String>) {
    if let Some(value) = value {
        *target = Set(trimmed(Some(value)));
    }
}

#[derive(Clone)]
pub struct ProfileService {
    profile_dao: ProfileDao,
}

impl ProfileService {
    pub fn new(profile_dao: ProfileDao) -> Self {
        Self { profile_dao }
    }

    /// The profile of `auth_user_id`, if one was created.
    pub async fn find_by_auth_user(
        &self,
        auth_user_id: &Uuid,
    ) -> Result<Option<profile::Model>, AppError> {
        let mut rows = self.profile_dao.find_by_auth_user(auth_user_id).await?;
        if rows.len() > 1 {
            tracing::error!(%auth_user_id, "more than one profile linked to identity");
            return Err(AppError::internal("Multiple profiles found for this account"));
        }
        Ok(rows.pop())
    }

    pub async fn create(
        &self,
        auth_user_id: Uuid,
        email: &str,
        draft: ProfileDraft,
    ) -> Result<profile::Model, AppError> {
        let active = profile::ActiveModel {
            auth_user_id: Set(auth_user_id),
            email: Set(Some(email.trim().to_string())),
            username: Set(trimmed(draft.username)),
            first_name: Set(trimmed(draft.first_name)),
            last_name: Set(trimmed(draft.last_name)),
            phone: Set(trimmed(draft.phone)),
            address: Set(trimmed(draft.address)),
            is_partner: Set(false),
            ..Default::default()
        };
        Ok(self.profile_dao.create(active).await?)
    }

    pub async fn update_settings(
        &self,
        auth_user_id: &Uuid,
        settings: ProfileSettings,
    ) -> Result<profile::Model, AppError> {
        settings.validate()?;
        let current = self
            .find_by_auth_user(auth_user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Profile not found"))?;

        Ok(self
            .profile_dao
            .update(current.id, move |active| {
                set_text(&mut active.username, settings.username);
                set_text(&mut active.first_name, settings.first_name);
                set_text(&mut active.last_name, settings.last_name);
                set_text(&mut active.phone, settings.phone);
                set_text(&mut active.address, settings.address);
                if let Some(is_partner) = settings.is_partner {
                    active.is_partner = Set(is_partner);
                }
            })
            .await?)
    }
}
