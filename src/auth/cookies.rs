use axum::http::{HeaderMap, HeaderValue, header};

use super::TokenBundle;
use crate::config::SessionConfig;

/// Value of the first cookie called `name` across all `Cookie` headers.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn cookie(cfg: &SessionConfig, name: &str, value: &str, max_age: usize) -> Option<HeaderValue> {
    let mut raw = format!(
        "{name}={value}; Path=/; HttpOnly; SameSite={}; Max-Age={max_age}",
        cfg.same_site.as_str()
    );
    if cfg.secure {
        raw.push_str("; Secure");
    }
    HeaderValue::from_str(&raw).ok()
}

/// `Set-Cookie` values storing the access/refresh pair.
pub fn session_cookies(cfg: &SessionConfig, bundle: &TokenBundle) -> Vec<HeaderValue> {
    [
        cookie(
            cfg,
            &cfg.access_cookie,
            &bundle.access_token,
            bundle.expires_in,
        ),
        cookie(
            cfg,
            &cfg.refresh_cookie,
            &bundle.refresh_token,
            bundle.refresh_expires_in,
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// `Set-Cookie` values expiring both session cookies.
pub fn cleared_session_cookies(cfg: &SessionConfig) -> Vec<HeaderValue> {
    [
        cookie(cfg, &cfg.access_cookie, "", 0),
        cookie(cfg, &cfg.refresh_cookie, "", 0),
    ]
    .into_iter()
    .flatten()
    .collect()
}

pub fn append_set_cookies(headers: &mut HeaderMap, cookies: Vec<HeaderValue>) {
    for value in cookies {
        headers.append(header::SET_COOKIE, value);
    }
}
