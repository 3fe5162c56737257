use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

use super::{admin, auth, partner_stations, profile, public, rental_history};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(public::router())
        .merge(auth::router(state.clone()))
        .merge(profile::router(state.clone()))
        .merge(rental_history::router(state.clone()))
        .merge(partner_stations::router(state.clone()))
        .merge(admin::router(state))
}
