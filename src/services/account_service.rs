use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::TokenBundle,
    cache::{Invalidation, InvalidationBus, ProfileCache},
    db::entities::profile,
    error::AppError,
    resources::ResourceError,
    services::{
        auth_service::AuthService,
        profile_service::{ProfileDraft, ProfileService, ProfileSettings},
    },
};

#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    #[serde(flatten)]
    pub profile: ProfileDraft,
}

/// Session transitions and the caller's own profile. Every sign-in, sign-out
/// and registration publishes [`Invalidation::Session`].
pub struct AccountService<'a> {
    auth: AuthService<'a>,
    profiles: ProfileService,
    cache: &'a ProfileCache,
    bus: &'a InvalidationBus,
}

impl<'a> AccountService<'a> {
    pub fn new(
        auth: AuthService<'a>,
        profiles: ProfileService,
        cache: &'a ProfileCache,
        bus: &'a InvalidationBus,
    ) -> Self {
        Self {
            auth,
            profiles,
            cache,
            bus,
        }
    }

    /// Creates the identity, then its profile. A failed profile insert removes
    /// the identity again so no account is left without a profile.
    pub async fn register(&self, registration: Registration) -> Result<TokenBundle, AppError> {
        let Registration {
            email,
            password,
            profile,
        } = registration;
        let bundle = self.auth.register(&email, &password).await?;

        if let Err(err) = self.profiles.create(bundle.user_id, &email, profile).await {
            tracing::warn!(user_id = %bundle.user_id, "profile creation failed: {err}");
            if let Err(cleanup) = self.auth.remove_identity(&bundle.user_id).await {
                tracing::error!(
                    user_id = %bundle.user_id,
                    "failed to remove identity after profile failure: {cleanup}"
                );
            }
            return Err(err);
        }

        self.bus.publish(Invalidation::Session);
        Ok(bundle)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenBundle, AppError> {
        let bundle = self.auth.login(email, password).await?;
        self.bus.publish(Invalidation::Session);
        Ok(bundle)
    }

    pub async fn logout(&self, refresh_token: Option<&str>) -> Result<(), AppError> {
        if let Some(refresh_token) = refresh_token {
            self.auth.logout(refresh_token).await?;
        }
        self.bus.publish(Invalidation::Session);
        Ok(())
    }

    /// Profile of the signed-in identity. An identity without a profile is
    /// treated as not authenticated.
    pub async fn current_profile(&self, auth_user_id: &Uuid) -> Result<profile::Model, AppError> {
        if let Some(profile) = self.cache.get(auth_user_id) {
            return Ok(profile);
        }

        let ticket = self.cache.ticket();
        let profile = self
            .profiles
            .find_by_auth_user(auth_user_id)
            .await?
            .ok_or(ResourceError::NotAuthenticated)?;
        self.cache.put(ticket, profile.clone());
        Ok(profile)
    }

    pub async fn update_settings(
        &self,
        auth_user_id: &Uuid,
        settings: ProfileSettings,
    ) -> Result<profile::Model, AppError> {
        let profile = self.profiles.update_settings(auth_user_id, settings).await?;
        self.bus.publish(Invalidation::Profile);
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use async_trait::async_trait;
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, DatabaseConnection, DbErr, MockDatabase};
    use uuid::Uuid;

    use crate::{
        auth::{
            Claims, TokenBundle,
            providers::{AuthProvider, AuthProviderId, AuthProviders},
        },
        cache::{Invalidation, InvalidationBus, InvalidationSubscriber, ProfileCache},
        db::entities::profile,
        error::AppError,
        services::{ServiceContext, profile_service::ProfileDraft},
    };

    use super::{AccountService, Registration};

    struct StubProvider {
        user_id: Uuid,
        removed: AtomicUsize,
    }

    #[async_trait]
    impl AuthProvider for StubProvider {
        fn id(&self) -> AuthProviderId {
            AuthProviderId::Local
        }

        async fn register(&self, _email: &str, _password: &str) -> Result<TokenBundle, AppError> {
            Ok(TokenBundle {
                user_id: self.user_id,
                access_token: "access".to_string(),
                refresh_token: "refresh".to_string(),
                token_type: "Bearer",
                expires_in: 900,
                refresh_expires_in: 3600,
            })
        }

        async fn login(&self, email: &str, password: &str) -> Result<TokenBundle, AppError> {
            self.register(email, password).await
        }

        async fn refresh(&self, _refresh_token: &str) -> Result<TokenBundle, AppError> {
            Err(AppError::unauthorized("Invalid refresh token"))
        }

        async fn verify(&self, _access_token: &str) -> Result<Claims, AppError> {
            Err(AppError::unauthorized("Invalid or expired token"))
        }

        async fn logout(&self, _refresh_token: &str) -> Result<(), AppError> {
            Ok(())
        }

        async fn remove_identity(&self, _user_id: &Uuid) -> Result<(), AppError> {
            self.removed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Default)]
    struct Recorder(std::sync::Mutex<Vec<Invalidation>>);

    impl InvalidationSubscriber for Recorder {
        fn on_invalidate(&self, event: Invalidation) {
            self.0.lock().expect("recorder lock").push(event);
        }
    }

    struct Fixture {
        provider: Arc<StubProvider>,
        providers: AuthProviders,
        cache: ProfileCache,
        bus: InvalidationBus,
        recorder: Arc<Recorder>,
    }

    fn fixture() -> Fixture {
        let provider = Arc::new(StubProvider {
            user_id: Uuid::new_v4(),
            removed: AtomicUsize::new(0),
        });
        let providers = AuthProviders::new(AuthProviderId::Local)
            .with_provider(provider.clone());
        let bus = InvalidationBus::new();
        let recorder = Arc::new(Recorder::default());
        bus.subscribe(recorder.clone());
        Fixture {
            provider,
            providers,
            cache: ProfileCache::new(Duration::from_secs(300)),
            bus,
            recorder,
        }
    }

    fn account_for<'a>(db: &DatabaseConnection, fixture: &'a Fixture) -> AccountService<'a> {
        ServiceContext::new(db).account(&fixture.providers, &fixture.cache, &fixture.bus)
    }

    fn profile_model(auth_user_id: Uuid) -> profile::Model {
        let ts = FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 2, 1, 9, 30, 0)
            .single()
            .expect("timestamp should be valid");
        profile::Model {
            id: Uuid::new_v4(),
            created_at: ts,
            updated_at: ts,
            auth_user_id,
            username: None,
            first_name: None,
            last_name: None,
            email: Some("rider@example.com".to_string()),
            phone: None,
            address: None,
            is_partner: false,
        }
    }

    fn registration() -> Registration {
        Registration {
            email: "rider@example.com".to_string(),
            password: "password123".to_string(),
            profile: ProfileDraft::default(),
        }
    }

    #[tokio::test]
    async fn failed_profile_insert_removes_the_identity() {
        let fixture = fixture();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("insert failed".to_string())])
            .into_connection();
        let account = account_for(&db, &fixture);

        let err = account
            .register(registration())
            .await
            .expect_err("registration should fail");

        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(fixture.provider.removed.load(Ordering::SeqCst), 1);
        assert!(fixture.recorder.0.lock().expect("recorder lock").is_empty());
    }

    #[tokio::test]
    async fn registration_publishes_session_change() {
        let fixture = fixture();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[profile_model(fixture.provider.user_id)]])
            .into_connection();
        let account = account_for(&db, &fixture);

        let bundle = account
            .register(registration())
            .await
            .expect("registration should succeed");

        assert_eq!(bundle.user_id, fixture.provider.user_id);
        assert_eq!(fixture.provider.removed.load(Ordering::SeqCst), 0);
        assert_eq!(
            *fixture.recorder.0.lock().expect("recorder lock"),
            vec![Invalidation::Session]
        );
    }

    #[tokio::test]
    async fn current_profile_is_cached_between_calls() {
        let fixture = fixture();
        let auth_user_id = Uuid::new_v4();
        // a single result: a second query would fail
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[profile_model(auth_user_id)]])
            .into_connection();
        let account = account_for(&db, &fixture);

        let first = account
            .current_profile(&auth_user_id)
            .await
            .expect("first lookup should succeed");
        let second = account
            .current_profile(&auth_user_id)
            .await
            .expect("cached lookup should succeed");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn identity_without_profile_is_not_authenticated() {
        let fixture = fixture();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<profile::Model>::new()])
            .into_connection();
        let account = account_for(&db, &fixture);

        let err = account
            .current_profile(&Uuid::new_v4())
            .await
            .expect_err("lookup should fail");
        assert!(matches!(err, AppError::Unauthorized(_)));
        assert_eq!(err.message(), "Not authenticated");
    }

    #[tokio::test]
    async fn logout_without_token_still_ends_the_session() {
        let fixture = fixture();
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let account = account_for(&db, &fixture);

        account.logout(None).await.expect("logout should succeed");

        assert_eq!(
            *fixture.recorder.0.lock().expect("recorder lock"),
            vec![Invalidation::Session]
        );
    }
}
