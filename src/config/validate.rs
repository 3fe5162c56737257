use anyhow::{Result, bail};

use super::AppConfig;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if let Some(database) = cfg.database.as_ref() {
        if database.url.trim().is_empty() {
            errors.push("database.url must not be empty".to_string());
        }

        if database.min_idle > database.max_connections {
            errors.push(format!(
                "database.min_idle ({}) must be <= database.max_connections ({})",
                database.min_idle, database.max_connections
            ));
        }
    }

    if let Some(auth) = cfg.auth.as_ref() {
        if auth.admin_email.trim().is_empty() {
            errors.push("auth.admin_email must not be empty".to_string());
        }

        if auth.admin_password.len() < 8 {
            errors.push("auth.admin_password must be at least 8 characters".to_string());
        }

        if auth.jwt_secret.trim().is_empty() {
            errors.push("auth.jwt_secret must not be empty".to_string());
        }
    }

    let session = &cfg.session;
    for (key, name) in [
        ("session.access_cookie", &session.access_cookie),
        ("session.refresh_cookie", &session.refresh_cookie),
        ("session.locale_cookie", &session.locale_cookie),
    ] {
        if !is_cookie_token(name) {
            errors.push(format!("{key} must be a non-empty cookie token"));
        }
    }

    if session.access_cookie == session.refresh_cookie {
        errors.push("session.access_cookie and session.refresh_cookie must differ".to_string());
    }

    if matches!(session.same_site, super::SameSite::None) && !session.secure {
        errors.push("session.same_site = none requires session.secure = true".to_string());
    }

    let routing = &cfg.routing;
    if routing.locales.is_empty() {
        errors.push("routing.locales must contain at least one locale".to_string());
    }

    for locale in &routing.locales {
        if locale.is_empty() || !locale.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
        {
            errors.push(format!("routing.locales contains an invalid locale: {locale:?}"));
        }
    }

    if !routing.is_supported(&routing.default_locale) {
        errors.push(format!(
            "routing.default_locale ({}) must be one of routing.locales",
            routing.default_locale
        ));
    }

    let cache = &cfg.cache;
    if cache.max_page_size == 0 {
        errors.push("cache.max_page_size must be > 0".to_string());
    }

    if cache.default_page_size == 0 || cache.default_page_size > cache.max_page_size {
        errors.push(format!(
            "cache.default_page_size ({}) must be in 1..=cache.max_page_size ({})",
            cache.default_page_size, cache.max_page_size
        ));
    }

    if cache.max_fetch_attempts == 0 {
        errors.push("cache.max_fetch_attempts must be > 0".to_string());
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}

fn is_cookie_token(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'))
}

#[cfg(test)]
mod tests {
    use crate::config::{AppConfig, AuthConfig, SameSite};
    use crate::auth::providers::AuthProviderId;

    use super::validate;

    #[test]
    fn default_config_is_valid() {
        validate(&AppConfig::default()).expect("defaults should validate");
    }

    #[test]
    fn collects_every_error_into_one_message() {
        let mut cfg = AppConfig::default();
        cfg.auth = Some(AuthConfig {
            provider: AuthProviderId::Local,
            jwt_secret: " ".to_string(),
            admin_email: "admin@example.com".to_string(),
            admin_password: "short".to_string(),
        });
        cfg.cache.default_page_size = 0;

        let message = validate(&cfg).expect_err("config should be rejected").to_string();

        assert!(message.contains("auth.admin_password must be at least 8 characters"));
        assert!(message.contains("auth.jwt_secret must not be empty"));
        assert!(message.contains("cache.default_page_size (0)"));
    }

    #[test]
    fn default_locale_must_be_listed() {
        let mut cfg = AppConfig::default();
        cfg.routing.default_locale = "de".to_string();

        let message = validate(&cfg).expect_err("config should be rejected").to_string();

        assert!(message.contains("routing.default_locale (de) must be one of routing.locales"));
    }

    #[test]
    fn same_site_none_requires_secure_cookies() {
        let mut cfg = AppConfig::default();
        cfg.session.same_site = SameSite::None;
        cfg.session.secure = false;

        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn cookie_names_must_differ() {
        let mut cfg = AppConfig::default();
        cfg.session.refresh_cookie = cfg.session.access_cookie.clone();

        let message = validate(&cfg).expect_err("config should be rejected").to_string();

        assert!(message.contains("must differ"));
    }
}
