use std::sync::Arc;

use crate::{config::AuthConfig, services::ServiceContext};

use super::{
    jwt::JwtKeys,
    providers::{AuthProviders, LocalAuthProvider},
};

pub fn build_providers(cfg: &AuthConfig, services: &ServiceContext) -> AuthProviders {
    let jwt = JwtKeys::from_secret(cfg.jwt_secret.as_bytes());
    let local_provider =
        LocalAuthProvider::new(services.auth_user(), services.refresh_token_dao(), jwt);
    AuthProviders::new(cfg.provider).with_provider(Arc::new(local_provider))
}

/// Builds the registry and makes sure the configured admin identity exists.
pub async fn init_providers(
    cfg: &AuthConfig,
    services: &ServiceContext,
) -> anyhow::Result<AuthProviders> {
    let providers = build_providers(cfg, services);
    services.auth(&providers).seed_admin(cfg).await?;
    Ok(providers)
}
