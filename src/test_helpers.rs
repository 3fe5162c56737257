use std::sync::Arc;

use axum::Router;
use chrono::{FixedOffset, TimeZone};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, prelude::DateTimeWithTimeZone};
use uuid::Uuid;

use crate::{
    auth::{
        Role,
        bootstrap::build_providers,
        jwt::{JwtKeys, encode_token, make_access_claims},
        providers::AuthProviderId,
    },
    config::{AppConfig, AuthConfig},
    db::entities::profile,
    resources::{MemoryStore, PartnerStationResource, RentalHistoryResource},
    routes::router,
    services::ServiceContext,
    state::AppState,
};

/// Router plus the in-memory stores backing its resources.
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub rentals: Arc<MemoryStore<RentalHistoryResource>>,
    pub stations: Arc<MemoryStore<PartnerStationResource>>,
    pub secret: Vec<u8>,
}

pub fn test_config(secret: &[u8]) -> AppConfig {
    AppConfig {
        auth: Some(AuthConfig {
            provider: AuthProviderId::Local,
            jwt_secret: String::from_utf8_lossy(secret).into_owned(),
            admin_email: "admin@example.com".to_string(),
            admin_password: "adminpassword".to_string(),
        }),
        ..AppConfig::default()
    }
}

pub fn test_app(secret: &[u8]) -> TestApp {
    test_app_with_db(
        secret,
        MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
    )
}

pub fn test_app_with_db(secret: &[u8], db: DatabaseConnection) -> TestApp {
    let cfg = test_config(secret);
    let services = ServiceContext::new(&db);
    let providers = build_providers(
        cfg.auth.as_ref().expect("auth config should be present"),
        &services,
    );
    let rentals = Arc::new(MemoryStore::new());
    let stations = Arc::new(MemoryStore::new());
    let state = AppState::with_stores(cfg, db, providers, rentals.clone(), stations.clone());
    TestApp {
        router: router(Arc::clone(&state)),
        state,
        rentals,
        stations,
        secret: secret.to_vec(),
    }
}

pub fn test_router(secret: &[u8]) -> Router {
    test_app(secret).router
}

impl TestApp {
    pub fn access_token(&self, user_id: Uuid, roles: Vec<Role>) -> String {
        let claims = make_access_claims(&user_id, roles, 300);
        encode_token(&JwtKeys::from_secret(&self.secret), &claims).expect("encode access token")
    }

    /// Puts a profile for `auth_user_id` in the profile cache so requests
    /// never reach the database for it.
    pub fn sign_in_profile(&self, auth_user_id: Uuid) -> profile::Model {
        let profile = profile_model(auth_user_id);
        let ticket = self.state.profiles.ticket();
        let stored = self.state.profiles.put(ticket, profile.clone());
        assert!(stored, "profile cache refused a fresh ticket");
        profile
    }
}

pub fn fixed_time(second: u32) -> DateTimeWithTimeZone {
    FixedOffset::east_opt(0)
        .expect("offset should be valid")
        .with_ymd_and_hms(2026, 4, 2, 10, 0, second)
        .single()
        .expect("timestamp should be valid")
}

pub fn profile_model(auth_user_id: Uuid) -> profile::Model {
    profile::Model {
        id: Uuid::new_v4(),
        created_at: fixed_time(0),
        updated_at: fixed_time(0),
        auth_user_id,
        username: Some("rider".to_string()),
        first_name: None,
        last_name: None,
        email: Some("rider@example.com".to_string()),
        phone: None,
        address: None,
        is_partner: false,
    }
}
