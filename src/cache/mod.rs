mod bus;
mod listing;
mod profile;

pub use bus::{Invalidation, InvalidationBus, InvalidationSubscriber};
pub use listing::{ListingCache, ListingKey, ListingView};
pub use profile::ProfileCache;
