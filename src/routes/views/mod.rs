mod pages;
mod router;

pub use pages::{PageListing, PageName, PageShell};
pub use router::router;
