use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

use crate::{
    auth::cookies::{append_set_cookies, session_cookies},
    config::SessionConfig,
    state::AppState,
};

/// Resolves the caller once per request and exposes the outcome as a
/// [`Session`](crate::auth::Session) extension. A rotated token pair is written
/// back unless the handler already set the session cookies itself.
pub async fn session_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let session = state.sessions.resolve(req.headers()).await;
    let renewed = session.renewed.clone();
    req.extensions_mut().insert(session);

    let mut response = next.run(req).await;

    if let Some(bundle) = renewed {
        let cfg = state.sessions.config();
        if !sets_session_cookie(response.headers(), cfg) {
            append_set_cookies(response.headers_mut(), session_cookies(cfg, &bundle));
        }
    }
    response
}

pub(crate) fn sets_session_cookie(headers: &HeaderMap, cfg: &SessionConfig) -> bool {
    let prefix = format!("{}=", cfg.refresh_cookie);
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.starts_with(&prefix))
}
