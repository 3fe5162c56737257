pub mod auth_user_dao;
pub mod base;
pub mod base_traits;
mod context;
pub mod error;
pub mod owned;
pub mod partner_station_dao;
pub mod profile_dao;
pub mod refresh_token_dao;
pub mod rental_history_dao;
pub mod scooter_dao;

pub use auth_user_dao::AuthUserDao;
pub use base::{DaoBase, PaginatedResponse};
pub use base_traits::{
    HasCreatedAtColumn, HasIdActiveModel, HasIdColumn, HasOwnerColumn, OwnedActiveModel,
    OwnedModel, TimestampedActiveModel,
};
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use owned::OwnedDao;
pub use partner_station_dao::PartnerStationDao;
pub use profile_dao::ProfileDao;
pub use refresh_token_dao::RefreshTokenDao;
pub use rental_history_dao::RentalHistoryDao;
pub use scooter_dao::ScooterDao;
