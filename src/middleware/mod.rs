mod guards;
mod json_error;
mod panic;
mod route_guard;
mod session;

pub use guards::{AuthRoleGuard, CurrentProfile};
pub use json_error::json_error_middleware;
pub use panic::catch_panic_layer;
pub use route_guard::{
    PUBLIC_PAGES, RouteGuard, RouteGuardLayer, is_excluded, is_public, redirect_locale,
};
pub use session::session_middleware;
