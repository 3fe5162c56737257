use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::{Claims, TokenBundle},
    config::AuthConfig,
    error::AppError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProviderId {
    Local,
}

impl AuthProviderId {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthProviderId::Local => "local",
        }
    }
}

/// Identity backend. Access tokens carry the identity id as subject.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    fn id(&self) -> AuthProviderId;

    async fn register(&self, email: &str, password: &str) -> Result<TokenBundle, AppError>;
    async fn login(&self, email: &str, password: &str) -> Result<TokenBundle, AppError>;
    /// Rotates `refresh_token`: the old token is revoked before a new pair is
    /// issued.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenBundle, AppError>;
    async fn verify(&self, access_token: &str) -> Result<Claims, AppError>;
    async fn logout(&self, refresh_token: &str) -> Result<(), AppError>;
    /// Deletes an identity created moments ago whose profile could not be
    /// stored.
    async fn remove_identity(&self, user_id: &Uuid) -> Result<(), AppError>;

    async fn seed_admin(&self, _cfg: &AuthConfig) -> anyhow::Result<()> {
        Ok(())
    }
}

/// The identity backend selected by `auth.provider`; empty until one is
/// installed.
#[derive(Clone)]
pub struct AuthProviders {
    configured: AuthProviderId,
    provider: Option<Arc<dyn AuthProvider>>,
}

impl AuthProviders {
    pub fn new(configured: AuthProviderId) -> Self {
        Self {
            configured,
            provider: None,
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn AuthProvider>) -> Self {
        tracing::debug!(provider = provider.id().as_str(), "auth provider installed");
        self.provider = Some(provider);
        self
    }

    pub fn active(&self) -> Result<&dyn AuthProvider, AppError> {
        self.provider.as_deref().ok_or_else(|| {
            AppError::bad_request(format!(
                "Auth provider not configured: {}",
                self.configured.as_str()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use uuid::Uuid;

    use crate::{
        auth::{Claims, TokenBundle},
        error::AppError,
    };

    use super::{AuthProvider, AuthProviderId, AuthProviders};

    struct NullProvider;

    #[async_trait]
    impl AuthProvider for NullProvider {
        fn id(&self) -> AuthProviderId {
            AuthProviderId::Local
        }

        async fn register(&self, _email: &str, _password: &str) -> Result<TokenBundle, AppError> {
            Err(AppError::unauthorized("not used"))
        }

        async fn login(&self, _email: &str, _password: &str) -> Result<TokenBundle, AppError> {
            Err(AppError::unauthorized("not used"))
        }

        async fn refresh(&self, _refresh_token: &str) -> Result<TokenBundle, AppError> {
            Err(AppError::unauthorized("not used"))
        }

        async fn verify(&self, _access_token: &str) -> Result<Claims, AppError> {
            Err(AppError::unauthorized("not used"))
        }

        async fn logout(&self, _refresh_token: &str) -> Result<(), AppError> {
            Ok(())
        }

        async fn remove_identity(&self, _user_id: &Uuid) -> Result<(), AppError> {
            Ok(())
        }
    }

    #[test]
    fn provider_ids_read_from_config_in_lowercase() {
        let id: AuthProviderId =
            serde_json::from_str("\"local\"").expect("local should deserialize");
        assert_eq!(id, AuthProviderId::Local);
        assert!(serde_json::from_str::<AuthProviderId>("\"supabase\"").is_err());
    }

    #[test]
    fn active_provider_must_be_installed() {
        let providers = AuthProviders::new(AuthProviderId::Local);
        let err = match providers.active() {
            Ok(_) => panic!("missing provider should fail"),
            Err(err) => err,
        };
        assert_eq!(err.message(), "Auth provider not configured: local");

        let providers = providers.with_provider(Arc::new(NullProvider));
        let active = providers.active().expect("installed provider should be active");
        assert_eq!(active.id(), AuthProviderId::Local);
    }
}
