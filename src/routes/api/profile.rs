use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::{
    auth::Identity,
    db::entities::profile,
    middleware::CurrentProfile,
    response::{ApiResult, JsonApiResponse},
    services::{ServiceContext, profile_service::ProfileSettings},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub identity: Identity,
    pub profile: profile::Model,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/me", get(me).patch(update_me))
        .with_state(state)
}

async fn me(CurrentProfile { identity, profile }: CurrentProfile) -> ApiResult<MeResponse> {
    JsonApiResponse::ok(MeResponse { identity, profile })
}

async fn update_me(
    State(state): State<Arc<AppState>>,
    CurrentProfile { identity, .. }: CurrentProfile,
    Json(settings): Json<ProfileSettings>,
) -> ApiResult<MeResponse> {
    let services = ServiceContext::from_state(state.as_ref());
    let profile = services
        .account(&state.auth_providers, &state.profiles, &state.bus)
        .update_settings(&identity.user_id, settings)
        .await?;
    JsonApiResponse::ok(MeResponse { identity, profile })
}
