use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

use crate::{
    auth::AdminRole,
    db::{dao::PaginatedResponse, entities::scooter},
    middleware::AuthRoleGuard,
    response::{ApiResult, JsonApiResponse},
    services::{ServiceContext, scooter_service::ScooterDraft},
    state::AppState,
};

fn first_page() -> u64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct ScooterListQuery {
    #[serde(default = "first_page")]
    pub page: u64,
    pub page_size: Option<u64>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/admin/scooters", get(list_scooters).post(create_scooter))
        .with_state(state)
}

async fn list_scooters(
    State(state): State<Arc<AppState>>,
    _admin: AuthRoleGuard<AdminRole>,
    Query(query): Query<ScooterListQuery>,
) -> ApiResult<PaginatedResponse<scooter::Model>> {
    let page_size = query
        .page_size
        .unwrap_or(state.config.cache.default_page_size);
    let scooters = ServiceContext::from_state(state.as_ref())
        .scooter()
        .list(query.page, page_size)
        .await?;
    JsonApiResponse::ok(scooters)
}

async fn create_scooter(
    State(state): State<Arc<AppState>>,
    AuthRoleGuard { identity, .. }: AuthRoleGuard<AdminRole>,
    Json(draft): Json<ScooterDraft>,
) -> ApiResult<scooter::Model> {
    let scooter = ServiceContext::from_state(state.as_ref())
        .scooter()
        .create(draft)
        .await?;
    tracing::info!(admin = %identity.user_id, scooter_id = %scooter.id, "scooter added");
    JsonApiResponse::with_status(StatusCode::CREATED, "created", scooter)
}
