use std::{marker::PhantomData, sync::Arc};

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    auth::{Identity, RequiredRole, Session},
    db::entities::profile,
    error::AppError,
    resources::ResourceError,
    services::ServiceContext,
    state::AppState,
};

// Reads the identity resolved by `session_middleware`.
impl FromRequestParts<Arc<AppState>> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .and_then(|session| session.identity.clone())
            .ok_or_else(|| ResourceError::NotAuthenticated.into())
    }
}

pub struct AuthRoleGuard<R: RequiredRole> {
    pub identity: Identity,
    _marker: PhantomData<R>,
}

impl<R> FromRequestParts<Arc<AppState>> for AuthRoleGuard<R>
where
    R: RequiredRole,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let identity = Identity::from_request_parts(parts, state).await?;

        if !identity.has_role(&R::required()) {
            return Err(AppError::forbidden("Missing required role"));
        }

        Ok(Self {
            identity,
            _marker: PhantomData,
        })
    }
}

/// The signed-in caller and their profile. `profile.id` is the owner of rentals
/// and partner stations.
pub struct CurrentProfile {
    pub identity: Identity,
    pub profile: profile::Model,
}

impl FromRequestParts<Arc<AppState>> for CurrentProfile {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let identity = Identity::from_request_parts(parts, state).await?;
        let profile = ServiceContext::from_state(state)
            .account(&state.auth_providers, &state.profiles, &state.bus)
            .current_profile(&identity.user_id)
            .await?;
        Ok(Self { identity, profile })
    }
}
