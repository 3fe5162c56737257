#[allow(unused_imports)]
pub mod prelude {
    pub use super::auth_user::Entity as AuthUser;
    pub use super::partner_station::Entity as PartnerStation;
    pub use super::profile::Entity as Profile;
    pub use super::refresh_token::Entity as RefreshToken;
    pub use super::rental_history::Entity as RentalHistory;
    pub use super::scooter::Entity as Scooter;
}

pub mod auth_user;
pub mod partner_station;
pub mod profile;
pub mod refresh_token;
pub mod rental_history;
pub mod scooter;
