use std::{
    sync::Arc,
    task::{Context, Poll},
};

use axum::{
    body::Body,
    http::{HeaderMap, Request, header},
    response::{IntoResponse, Redirect, Response},
};
use futures_util::future::BoxFuture;
use tower::{Layer, Service};

use crate::{
    auth::{
        Session,
        cookies::{append_set_cookies, read_cookie, session_cookies},
    },
    config::RoutingConfig,
    state::AppState,
};

/// Pages reachable without a session, with or without a locale prefix.
pub const PUBLIC_PAGES: [&str; 4] = ["", "/", "/login", "/register"];

const EXCLUDED_PREFIXES: [&str; 3] = ["/api", "/static", "/assets"];

/// API calls and static files are never guarded.
pub fn is_excluded(path: &str) -> bool {
    EXCLUDED_PREFIXES
        .iter()
        .any(|prefix| path == *prefix || path.starts_with(&format!("{prefix}/")))
        || path.contains('.')
}

pub fn is_public(path: &str, routing: &RoutingConfig) -> bool {
    if PUBLIC_PAGES.contains(&path) {
        return true;
    }
    routing.locales.iter().any(|locale| {
        path.strip_prefix('/')
            .and_then(|rest| rest.strip_prefix(locale.as_str()))
            .is_some_and(|rest| PUBLIC_PAGES.contains(&rest))
    })
}

fn path_locale<'a>(path: &'a str, routing: &RoutingConfig) -> Option<&'a str> {
    let segment = path.trim_start_matches('/').split('/').next()?;
    routing.is_supported(segment).then_some(segment)
}

/// First supported language of an `Accept-Language` header, by weight.
fn accepted_locale(headers: &HeaderMap, routing: &RoutingConfig) -> Option<String> {
    let raw = headers.get(header::ACCEPT_LANGUAGE)?.to_str().ok()?;
    let mut ranked: Vec<(String, f32)> = raw
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let tag = parts.next()?.trim().to_ascii_lowercase();
            let weight = parts
                .find_map(|param| param.trim().strip_prefix("q="))
                .and_then(|q| q.parse::<f32>().ok())
                .unwrap_or(1.0);
            (!tag.is_empty() && weight > 0.0).then_some((tag, weight))
        })
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked.into_iter().find_map(|(tag, _)| {
        let primary = tag.split('-').next().unwrap_or_default();
        [tag.as_str(), primary]
            .into_iter()
            .find(|candidate| routing.is_supported(candidate))
            .map(str::to_string)
    })
}

/// Locale for a login redirect: path, then locale cookie, then
/// `Accept-Language`, then the configured default.
pub fn redirect_locale(
    path: &str,
    headers: &HeaderMap,
    routing: &RoutingConfig,
    locale_cookie: &str,
) -> String {
    if let Some(locale) = path_locale(path, routing) {
        return locale.to_string();
    }
    read_cookie(headers, locale_cookie)
        .filter(|locale| routing.is_supported(locale))
        .or_else(|| accepted_locale(headers, routing))
        .unwrap_or_else(|| routing.default_locale.clone())
}

#[derive(Clone)]
pub struct RouteGuardLayer {
    state: Arc<AppState>,
}

impl RouteGuardLayer {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

#[derive(Clone)]
pub struct RouteGuard<S> {
    inner: S,
    state: Arc<AppState>,
}

impl<S> Layer<S> for RouteGuardLayer {
    type Service = RouteGuard<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RouteGuard {
            inner,
            state: Arc::clone(&self.state),
        }
    }
}

impl<S> Service<Request<Body>> for RouteGuard<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let state = Arc::clone(&self.state);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let path = req.uri().path().to_string();
            let routing = &state.config.routing;
            if is_excluded(&path) || is_public(&path, routing) {
                return inner.call(req).await;
            }

            let existing = req.extensions().get::<Session>().cloned();
            let (session, resolved_here) = match existing {
                Some(session) => (session, false),
                None => {
                    let headers = req.headers().clone();
                    (state.sessions.resolve(&headers).await, true)
                }
            };

            let Some(identity) = session.identity.clone() else {
                let locale = redirect_locale(
                    &path,
                    req.headers(),
                    routing,
                    &state.config.session.locale_cookie,
                );
                tracing::debug!(%path, %locale, "redirecting anonymous page request to login");
                return Ok(Redirect::temporary(&format!("/{locale}/login")).into_response());
            };

            tracing::debug!(%path, user_id = %identity.user_id, "page request authenticated");
            req.extensions_mut().insert(identity);
            if resolved_here {
                req.extensions_mut().insert(session.clone());
            }

            let mut response = inner.call(req).await?;
            if let Some(bundle) = session.renewed.as_ref().filter(|_| resolved_here) {
                append_set_cookies(
                    response.headers_mut(),
                    session_cookies(state.sessions.config(), bundle),
                );
            }
            Ok(response)
        })
    }
}
