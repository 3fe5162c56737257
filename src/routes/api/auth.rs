use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::{
        Session, TokenBundle,
        cookies::{append_set_cookies, cleared_session_cookies, read_cookie, session_cookies},
    },
    error::AppError,
    response::JsonApiResponse,
    services::{ServiceContext, account_service::Registration},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `/refresh` and `/logout`; the refresh cookie is used when absent.
#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub user_id: Uuid,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: usize,
}

impl From<TokenBundle> for TokenResponse {
    fn from(bundle: TokenBundle) -> Self {
        Self {
            user_id: bundle.user_id,
            access_token: bundle.access_token,
            refresh_token: bundle.refresh_token,
            token_type: bundle.token_type,
            expires_in: bundle.expires_in,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .with_state(state)
}

fn token_response(
    state: &AppState,
    bundle: TokenBundle,
    status: StatusCode,
    message: &str,
) -> Result<Response, AppError> {
    let cookies = session_cookies(&state.config.session, &bundle);
    let mut response =
        JsonApiResponse::with_status(status, message, TokenResponse::from(bundle))?.into_response();
    append_set_cookies(response.headers_mut(), cookies);
    Ok(response)
}

fn refresh_token_from(state: &AppState, headers: &HeaderMap, body: &Bytes) -> Option<String> {
    let from_body = if body.is_empty() {
        None
    } else {
        serde_json::from_slice::<RefreshRequest>(body)
            .ok()
            .and_then(|request| request.refresh_token)
            .filter(|token| !token.trim().is_empty())
    };
    from_body.or_else(|| read_cookie(headers, &state.config.session.refresh_cookie))
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Registration>,
) -> Result<Response, AppError> {
    let services = ServiceContext::from_state(state.as_ref());
    let account = services.account(&state.auth_providers, &state.profiles, &state.bus);
    let bundle = account.register(body).await?;
    token_response(&state, bundle, StatusCode::CREATED, "registered")
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let services = ServiceContext::from_state(state.as_ref());
    let account = services.account(&state.auth_providers, &state.profiles, &state.bus);
    let bundle = account.login(&body.email, &body.password).await?;
    token_response(&state, bundle, StatusCode::OK, "ok")
}

async fn refresh(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    // the session layer may already have rotated the cookie for this request
    if let Some(bundle) = session.renewed {
        return token_response(&state, bundle, StatusCode::OK, "ok");
    }

    let token = refresh_token_from(&state, &headers, &body)
        .ok_or_else(|| AppError::unauthorized("Missing refresh token"))?;
    let services = ServiceContext::from_state(state.as_ref());
    let bundle = services.auth(&state.auth_providers).refresh(&token).await?;
    token_response(&state, bundle, StatusCode::OK, "ok")
}

async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let token = match session.renewed {
        Some(bundle) => Some(bundle.refresh_token),
        None => refresh_token_from(&state, &headers, &body),
    };

    let services = ServiceContext::from_state(state.as_ref());
    services
        .account(&state.auth_providers, &state.profiles, &state.bus)
        .logout(token.as_deref())
        .await?;

    let mut response =
        JsonApiResponse::ok(serde_json::json!({ "logged_out": true }))?.into_response();
    append_set_cookies(
        response.headers_mut(),
        cleared_session_cookies(&state.config.session),
    );
    Ok(response)
}
