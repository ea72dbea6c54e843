use std::sync::Arc;

use artshop_core::{Address, ContractClient};

/// Trait that any contract backend must implement to run the conformance
/// suite.
///
/// The backend enforces caller authorization, so the suite needs three
/// distinct funded accounts to play the artist, adopter and shipper roles.
pub trait TestableContract: Send + Sync {
    /// The contract under test. Must start with no artworks the suite
    /// depends on; ids are read back from `create`.
    fn contract(&self) -> Arc<dyn ContractClient>;

    /// Account that creates, frames, lists and packs artworks.
    fn artist(&self) -> Address;

    /// Account that pays for adoption.
    fn adopter(&self) -> Address;

    /// Account that picks up, ships and delivers.
    fn shipper(&self) -> Address;
}
