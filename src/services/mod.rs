pub mod account_service;
pub mod auth_service;
pub mod auth_user_service;
pub mod context;
pub mod profile_service;
pub mod rental_generator;
pub mod scooter_service;

pub use context::ServiceContext;
