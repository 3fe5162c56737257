use axum::http::{HeaderMap, header};

use super::{Identity, TokenBundle, cookies::read_cookie, providers::AuthProviders};
use crate::config::SessionConfig;

/// Outcome of resolving one request's credentials.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub identity: Option<Identity>,
    /// Present when the access token was rejected and the refresh cookie was
    /// rotated; the caller must hand the pair back to the client.
    pub renewed: Option<TokenBundle>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

#[derive(Clone)]
pub struct SessionResolver {
    providers: AuthProviders,
    cfg: SessionConfig,
}

impl SessionResolver {
    pub fn new(providers: AuthProviders, cfg: SessionConfig) -> Self {
        Self { providers, cfg }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.cfg
    }

    /// Never fails: anything short of a verified identity is an anonymous
    /// session.
    pub async fn resolve(&self, headers: &HeaderMap) -> Session {
        let provider = match self.providers.active() {
            Ok(provider) => provider,
            Err(err) => {
                tracing::debug!("session resolution skipped: {err}");
                return Session::anonymous();
            }
        };

        if let Some(token) = self.access_token(headers) {
            match provider.verify(&token).await {
                Ok(claims) => {
                    if let Some(identity) = Identity::from_claims(&claims) {
                        return Session {
                            identity: Some(identity),
                            renewed: None,
                        };
                    }
                    tracing::debug!("access token subject is not an identity id");
                }
                Err(err) => tracing::debug!("access token rejected: {err}"),
            }
        }

        let Some(refresh_token) = read_cookie(headers, &self.cfg.refresh_cookie) else {
            return Session::anonymous();
        };

        let bundle = match provider.refresh(&refresh_token).await {
            Ok(bundle) => bundle,
            Err(err) => {
                tracing::debug!("session refresh failed: {err}");
                return Session::anonymous();
            }
        };

        match provider.verify(&bundle.access_token).await {
            Ok(claims) => match Identity::from_claims(&claims) {
                Some(identity) => {
                    tracing::debug!(user_id = %identity.user_id, "session renewed");
                    Session {
                        identity: Some(identity),
                        renewed: Some(bundle),
                    }
                }
                None => Session::anonymous(),
            },
            Err(err) => {
                tracing::debug!("renewed access token rejected: {err}");
                Session::anonymous()
            }
        }
    }

    fn access_token(&self, headers: &HeaderMap) -> Option<String> {
        let bearer = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string);

        bearer.or_else(|| read_cookie(headers, &self.cfg.access_cookie))
    }
}
