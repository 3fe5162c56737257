pub mod admin;
pub mod auth;
pub mod listing;
pub mod partner_stations;
pub mod profile;
pub mod public;
pub mod rental_history;
mod router;

pub use router::router;
