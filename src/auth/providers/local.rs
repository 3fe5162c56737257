use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    auth::{
        Claims, Role, TokenBundle,
        jwt::{JwtKeys, decode_token, encode_token, make_access_claims},
        password::{hash_password, verify_password},
    },
    config::AuthConfig,
    db::dao::RefreshTokenDao,
    db::entities::auth_user,
    error::AppError,
    services::auth_user_service::AuthUserService,
};

use super::{AuthProvider, AuthProviderId};

const ACCESS_TTL_SECS: usize = 15 * 60; // 15 minutes
const REFRESH_TTL_DAYS: i64 = 30;
const REFRESH_TTL_SECS: usize = REFRESH_TTL_DAYS as usize * 24 * 60 * 60;
/// How long a rotated refresh token keeps answering with the pair it was
/// rotated into.
const ROTATION_REUSE_WINDOW: Duration = Duration::from_secs(10);

/// Per refresh token: rotations of the same token queue here, and the pair a
/// finished rotation issued is replayed to the ones queued behind it.
type RotationSlot = Arc<Mutex<Option<(TokenBundle, Instant)>>>;

#[derive(Clone)]
pub struct LocalAuthProvider {
    auth_users: AuthUserService,
    refresh_token_dao: RefreshTokenDao,
    jwt: JwtKeys,
    rotations: Arc<DashMap<String, RotationSlot>>,
}

impl LocalAuthProvider {
    pub fn new(auth_users: AuthUserService, refresh_token_dao: RefreshTokenDao, jwt: JwtKeys) -> Self {
        Self {
            auth_users,
            refresh_token_dao,
            jwt,
            rotations: Arc::new(DashMap::new()),
        }
    }

    /// Drops slots past the reuse window; slots held by a rotation stay.
    fn evict_rotations(&self) {
        self.rotations.retain(|_, slot| match slot.try_lock() {
            Ok(rotated) => rotated
                .as_ref()
                .is_some_and(|(_, at)| at.elapsed() < ROTATION_REUSE_WINDOW),
            Err(_) => true,
        });
    }

    async fn rotate(&self, refresh_token: &str) -> Result<TokenBundle, AppError> {
        let token = self
            .refresh_token_dao
            .find_active_by_token(refresh_token)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid refresh token"))?;

        if token.expires_at < chrono::Utc::now().fixed_offset() || token.revoked {
            return Err(AppError::unauthorized("Refresh token expired"));
        }

        let user = self
            .auth_users
            .find_by_id(&token.user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid refresh token"))?;

        // consumed by a rotation this process did not see
        if !self.refresh_token_dao.revoke_token(refresh_token).await? {
            return Err(AppError::unauthorized("Invalid refresh token"));
        }

        self.issue_tokens(&user).await
    }

    async fn issue_tokens(&self, user: &auth_user::Model) -> Result<TokenBundle, AppError> {
        let primary_role = Role::try_from(user.role.as_str()).unwrap_or(Role::User);
        let mut roles = vec![primary_role.clone()];
        if matches!(primary_role, Role::Admin) {
            roles.push(Role::User);
        }
        let claims = make_access_claims(&user.id, roles, ACCESS_TTL_SECS);
        let access_token = encode_token(&self.jwt, &claims)?;

        let refresh = self
            .refresh_token_dao
            .create_refresh_token(&user.id, Some(REFRESH_TTL_DAYS))
            .await?;

        Ok(TokenBundle {
            user_id: user.id,
            access_token,
            refresh_token: refresh.token,
            token_type: "Bearer",
            expires_in: ACCESS_TTL_SECS,
            refresh_expires_in: REFRESH_TTL_SECS,
        })
    }
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    fn id(&self) -> AuthProviderId {
        AuthProviderId::Local
    }

    async fn register(&self, email: &str, password: &str) -> Result<TokenBundle, AppError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::bad_request("Email required"));
        }

        if self.auth_users.find_by_email(email).await?.is_some() {
            return Err(AppError::conflict("User already exists"));
        }

        let password_hash = hash_password(password)?;
        let user = self
            .auth_users
            .create_user(email, &password_hash, Role::User.as_str())
            .await?;

        self.issue_tokens(&user).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<TokenBundle, AppError> {
        let user = self
            .auth_users
            .find_by_email(email.trim())
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::unauthorized("Invalid credentials"));
        }

        let now = chrono::Utc::now().fixed_offset();
        self.auth_users.set_last_login(&user.id, &now).await?;

        self.issue_tokens(&user).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenBundle, AppError> {
        self.evict_rotations();
        let slot = self
            .rotations
            .entry(refresh_token.to_string())
            .or_default()
            .clone();

        let mut rotated = slot.lock().await;
        if let Some((bundle, at)) = rotated.as_ref() {
            if at.elapsed() < ROTATION_REUSE_WINDOW {
                tracing::debug!(user_id = %bundle.user_id, "replaying a just-rotated refresh token");
                return Ok(bundle.clone());
            }
        }

        let bundle = self.rotate(refresh_token).await?;
        *rotated = Some((bundle.clone(), Instant::now()));
        Ok(bundle)
    }

    async fn verify(&self, access_token: &str) -> Result<Claims, AppError> {
        decode_token(&self.jwt, access_token)
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), AppError> {
        self.rotations.retain(|_, slot| match slot.try_lock() {
            Ok(rotated) => rotated
                .as_ref()
                .is_none_or(|(bundle, _)| bundle.refresh_token != refresh_token),
            Err(_) => true,
        });
        let revoked = self.refresh_token_dao.revoke_token(refresh_token).await?;
        if !revoked {
            tracing::debug!("logout with unknown or already revoked refresh token");
        }
        Ok(())
    }

    async fn remove_identity(&self, user_id: &Uuid) -> Result<(), AppError> {
        self.auth_users.delete_user(user_id).await
    }

    async fn seed_admin(&self, cfg: &AuthConfig) -> anyhow::Result<()> {
        if let Some(existing) = self
            .auth_users
            .find_by_email(&cfg.admin_email)
            .await
            .map_err(|err| anyhow::anyhow!("{err}"))?
        {
            tracing::info!("admin user already present: {}", existing.email);
            return Ok(());
        }

        let hash = hash_password(&cfg.admin_password)
            .map_err(|err| anyhow::anyhow!("admin seed hash error: {err}"))?;
        let user = self
            .auth_users
            .create_user(&cfg.admin_email, &hash, Role::Admin.as_str())
            .await
            .map_err(|err| anyhow::anyhow!("{err}"))?;
        tracing::info!("seeded admin user {}", user.email);
        Ok(())
    }
}
