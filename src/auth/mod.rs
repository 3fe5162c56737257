pub mod bootstrap;
pub mod cookies;
pub mod jwt;
pub mod password;
pub mod providers;
pub mod session;
mod types;

pub use session::{Session, SessionResolver};
pub use types::{AdminRole, Claims, Identity, RequiredRole, Role, TokenBundle, UserRole};
