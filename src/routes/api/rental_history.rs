use std::sync::Arc;

use axum::{Router, extract::State, http::StatusCode, routing::post};

use crate::{
    db::entities::rental_history,
    middleware::CurrentProfile,
    resources::RentalHistoryResource,
    response::{ApiResult, JsonApiResponse},
    services::ServiceContext,
    state::AppState,
};

use super::listing::resource_router;

const BASE_PATH: &str = "/rental-history";

pub fn router(state: Arc<AppState>) -> Router {
    resource_router::<RentalHistoryResource>(BASE_PATH)
        .route(&format!("{BASE_PATH}/generate"), post(generate))
        .with_state(state)
}

async fn generate(
    State(state): State<Arc<AppState>>,
    caller: CurrentProfile,
) -> ApiResult<rental_history::Model> {
    let services = ServiceContext::from_state(state.as_ref());
    let rental = services
        .rental_generator(&state.rentals.gateway)
        .generate(caller.profile.id)
        .await?;
    JsonApiResponse::with_status(StatusCode::CREATED, "created", rental)
}
