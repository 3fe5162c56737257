use sea_orm::DatabaseConnection;

use crate::{
    auth::providers::AuthProviders,
    cache::{InvalidationBus, ProfileCache},
    db::dao::{DaoContext, RefreshTokenDao},
    resources::{MutationGateway, RentalHistoryResource},
    services::{
        account_service::AccountService, auth_service::AuthService,
        auth_user_service::AuthUserService, profile_service::ProfileService,
        rental_generator::RentalGenerator, scooter_service::ScooterService,
    },
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self {
            daos: DaoContext::new(db),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(&state.db)
    }

    pub fn daos(&self) -> &DaoContext {
        &self.daos
    }

    pub fn auth_user(&self) -> AuthUserService {
        AuthUserService::new(self.daos.auth_user())
    }

    pub fn profile(&self) -> ProfileService {
        ProfileService::new(self.daos.profile())
    }

    pub fn scooter(&self) -> ScooterService {
        ScooterService::new(self.daos.scooter())
    }

    pub fn auth<'a>(&self, providers: &'a AuthProviders) -> AuthService<'a> {
        AuthService::new(providers)
    }

    pub fn account<'a>(
        &self,
        providers: &'a AuthProviders,
        profiles: &'a ProfileCache,
        bus: &'a InvalidationBus,
    ) -> AccountService<'a> {
        AccountService::new(self.auth(providers), self.profile(), profiles, bus)
    }

    pub fn rental_generator<'a>(
        &self,
        gateway: &'a MutationGateway<RentalHistoryResource>,
    ) -> RentalGenerator<'a> {
        RentalGenerator::new(self.scooter(), gateway)
    }

    pub fn refresh_token_dao(&self) -> RefreshTokenDao {
        self.daos.refresh_token()
    }
}
