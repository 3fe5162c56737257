use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    auth::{SessionResolver, providers::AuthProviders},
    cache::{InvalidationBus, ListingCache, ProfileCache},
    config::{AppConfig, CacheConfig},
    db::dao::DaoContext,
    resources::{
        MutationGateway, PageFetcher, PartnerStationResource, PartnerStationStore,
        RentalHistoryResource, RentalHistoryStore, Resource, ResourceStore,
    },
};

/// Gateway and listing cache sharing one store.
pub struct ResourceHandles<R: Resource> {
    pub gateway: MutationGateway<R>,
    pub listings: Arc<ListingCache<R>>,
}

impl<R: Resource> Clone for ResourceHandles<R> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            listings: Arc::clone(&self.listings),
        }
    }
}

impl<R: Resource> ResourceHandles<R> {
    /// Wires the handles and subscribes the listing cache to `bus`.
    pub fn new(
        store: Arc<dyn ResourceStore<R>>,
        cfg: &CacheConfig,
        bus: &InvalidationBus,
    ) -> Self {
        let fetcher = PageFetcher::new(Arc::clone(&store), cfg.max_page_size);
        let listings = Arc::new(ListingCache::new(fetcher, cfg));
        bus.subscribe(listings.clone());
        Self {
            gateway: MutationGateway::new(store, bus.clone()),
            listings,
        }
    }
}

/// Picks the handles of one resource kind out of the state.
pub trait HasResource: Resource + Sized {
    fn handles(state: &AppState) -> &ResourceHandles<Self>;
}

impl HasResource for RentalHistoryResource {
    fn handles(state: &AppState) -> &ResourceHandles<Self> {
        &state.rentals
    }
}

impl HasResource for PartnerStationResource {
    fn handles(state: &AppState) -> &ResourceHandles<Self> {
        &state.stations
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub auth_providers: AuthProviders,
    pub sessions: SessionResolver,
    pub bus: InvalidationBus,
    pub profiles: Arc<ProfileCache>,
    pub rentals: ResourceHandles<RentalHistoryResource>,
    pub stations: ResourceHandles<PartnerStationResource>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db: DatabaseConnection,
        auth_providers: AuthProviders,
    ) -> Arc<Self> {
        let daos = DaoContext::new(&db);
        let rentals = Arc::new(RentalHistoryStore::new(&daos));
        let stations = Arc::new(PartnerStationStore::new(&daos));
        Self::with_stores(config, db, auth_providers, rentals, stations)
    }

    /// Same wiring as [`AppState::new`] over caller-provided stores.
    pub fn with_stores(
        config: AppConfig,
        db: DatabaseConnection,
        auth_providers: AuthProviders,
        rentals: Arc<dyn ResourceStore<RentalHistoryResource>>,
        stations: Arc<dyn ResourceStore<PartnerStationResource>>,
    ) -> Arc<Self> {
        let bus = InvalidationBus::new();
        let profiles = Arc::new(ProfileCache::new(config.cache.stale_after()));
        bus.subscribe(profiles.clone());

        Arc::new(Self {
            sessions: SessionResolver::new(auth_providers.clone(), config.session.clone()),
            rentals: ResourceHandles::new(rentals, &config.cache, &bus),
            stations: ResourceHandles::new(stations, &config.cache, &bus),
            profiles,
            bus,
            auth_providers,
            db,
            config,
        })
    }
}
