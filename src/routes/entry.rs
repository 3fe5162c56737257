use std::sync::Arc;

use axum::{Router, middleware};

use crate::{
    middleware::{RouteGuardLayer, session_middleware},
    state::AppState,
};

use super::{api, views};

pub const API_PREFIX: &str = "/api/v1";

/// Every route, behind the page guard and per-request session resolution.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest(API_PREFIX, api::router(state.clone()))
        .merge(views::router(state.clone()))
        .layer(RouteGuardLayer::new(state.clone()))
        .layer(middleware::from_fn_with_state(state, session_middleware))
}
