mod error;
mod fetcher;
mod gateway;
mod kind;
mod memory;
mod page;
pub mod partner_station;
pub mod rental_history;
mod store;

pub use error::{ResourceError, StoreError};
pub use fetcher::PageFetcher;
pub use gateway::MutationGateway;
pub use kind::ResourceKind;
pub use memory::{MemoryStore, StoreOp};
pub use page::{Page, PageRequest};
pub use partner_station::{PartnerStationResource, PartnerStationStore, StationDraft, StationPatch};
pub use rental_history::{
    RentalDraft, RentalHistoryResource, RentalHistoryStore, RentalListing, RentalPatch,
    ScooterSummary,
};
pub use store::{Resource, ResourceStore};
