use std::sync::Arc;

use axum::{
    Extension, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    auth::Session,
    response::{ApiResult, JsonApiResponse},
    state::AppState,
};

use super::pages::{PageName, PageShell, render};

fn localized_path(page: PageName) -> String {
    match page {
        PageName::Home => "/{locale}".to_string(),
        other => format!("/{{locale}}{}", other.path()),
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    PageName::ALL
        .into_iter()
        .fold(Router::<Arc<AppState>>::new(), |router, page| {
            router
                .route(
                    page.path(),
                    get(
                        move |State(state): State<Arc<AppState>>,
                              Extension(session): Extension<Session>| async move {
                            shell(&state, &session, None, page).await
                        },
                    ),
                )
                .route(
                    &localized_path(page),
                    get(
                        move |State(state): State<Arc<AppState>>,
                              Extension(session): Extension<Session>,
                              Path(locale): Path<String>| async move {
                            shell(&state, &session, Some(locale), page).await
                        },
                    ),
                )
        })
        .with_state(state)
}

async fn shell(
    state: &AppState,
    session: &Session,
    locale: Option<String>,
    page: PageName,
) -> ApiResult<PageShell> {
    JsonApiResponse::ok(render(state, session, locale, page).await?)
}
