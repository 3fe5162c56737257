use std::sync::Arc;

use axum::Router;

use crate::{resources::PartnerStationResource, state::AppState};

use super::listing::resource_router;

pub fn router(state: Arc<AppState>) -> Router {
    resource_router::<PartnerStationResource>("/partner-stations").with_state(state)
}
