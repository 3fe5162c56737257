use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    cache::ListingView,
    middleware::CurrentProfile,
    resources::{Page, PageRequest},
    response::{ApiResult, JsonApiResponse},
    state::{AppState, HasResource},
};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page_index: u64,
    pub page_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub page_size: Option<u64>,
}

/// Paging, cached feed and owner-checked writes for one resource kind under
/// `base`.
pub fn resource_router<R: HasResource>(base: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(base, get(page::<R>).post(create::<R>))
        .route(&format!("{base}/feed"), get(feed::<R>).delete(close_feed::<R>))
        .route(&format!("{base}/feed/next"), post(next_page::<R>))
        .route(
            &format!("{base}/{{id}}"),
            patch(update::<R>).delete(remove::<R>),
        )
}

fn page_size(state: &AppState, requested: Option<u64>) -> u64 {
    requested.unwrap_or(state.config.cache.default_page_size)
}

async fn page<R: HasResource>(
    State(state): State<Arc<AppState>>,
    caller: CurrentProfile,
    Query(query): Query<PageQuery>,
) -> ApiResult<Page<R::Listed>> {
    let request = PageRequest::new(query.page_index, page_size(&state, query.page_size));
    let page = R::handles(&state)
        .listings
        .page(caller.profile.id, request)
        .await?;
    JsonApiResponse::ok(page)
}

async fn feed<R: HasResource>(
    State(state): State<Arc<AppState>>,
    caller: CurrentProfile,
    Query(query): Query<FeedQuery>,
) -> ApiResult<ListingView<R::Listed>> {
    let size = page_size(&state, query.page_size);
    let view = R::handles(&state)
        .listings
        .view(caller.profile.id, size)
        .await?;
    JsonApiResponse::ok(view)
}

async fn next_page<R: HasResource>(
    State(state): State<Arc<AppState>>,
    caller: CurrentProfile,
    Query(query): Query<FeedQuery>,
) -> ApiResult<Option<ListingView<R::Listed>>> {
    let size = page_size(&state, query.page_size);
    match R::handles(&state)
        .listings
        .fetch_next_page(caller.profile.id, size)
        .await?
    {
        Some(view) => JsonApiResponse::ok(Some(view)),
        None => JsonApiResponse::with_status(
            StatusCode::OK,
            "Listing changed while loading; reload it",
            None,
        ),
    }
}

async fn close_feed<R: HasResource>(
    State(state): State<Arc<AppState>>,
    caller: CurrentProfile,
    Query(query): Query<FeedQuery>,
) -> ApiResult<serde_json::Value> {
    let size = page_size(&state, query.page_size);
    R::handles(&state)
        .listings
        .teardown(caller.profile.id, size)?;
    JsonApiResponse::ok(serde_json::json!({ "page_size": size, "cached": false }))
}

async fn create<R: HasResource>(
    State(state): State<Arc<AppState>>,
    caller: CurrentProfile,
    Json(draft): Json<R::Draft>,
) -> ApiResult<R::Row> {
    let row = R::handles(&state)
        .gateway
        .create(caller.profile.id, draft)
        .await?;
    JsonApiResponse::with_status(StatusCode::CREATED, "created", row)
}

async fn update<R: HasResource>(
    State(state): State<Arc<AppState>>,
    caller: CurrentProfile,
    Path(id): Path<Uuid>,
    Json(patch): Json<R::Patch>,
) -> ApiResult<R::Row> {
    let row = R::handles(&state)
        .gateway
        .update(id, caller.profile.id, patch)
        .await?;
    JsonApiResponse::ok(row)
}

async fn remove<R: HasResource>(
    State(state): State<Arc<AppState>>,
    caller: CurrentProfile,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    R::handles(&state)
        .gateway
        .delete(id, caller.profile.id)
        .await?;
    JsonApiResponse::ok(serde_json::json!({ "id": id, "deleted": true }))
}
