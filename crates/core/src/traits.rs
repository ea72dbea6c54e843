use async_trait::async_trait;

use crate::address::Address;
use crate::error::{ContractError, ProviderError};
use crate::events::EventBatch;
use crate::record::{ArtistDetails, ArtworkDetails, NewArtwork, OwnerAndState};
use crate::units::MinorUnits;

/// The deployed artwork contract, as seen by the lifecycle client.
///
/// The contract is the sole authority on whether a transition is permitted.
/// Write methods carry the acting account (`from`); they return once the
/// call is confirmed, or with [`ContractError::Rejected`] carrying the
/// contract's message.
///
/// Implementations must be `Send + Sync` so a client can be shared across
/// tasks.
#[async_trait]
pub trait ContractClient: Send + Sync {
    // ── Writes ────────────────────────────────────────────────────────────────

    /// Register a new artwork with `from` as its origin artist. Returns the
    /// id assigned by the contract.
    async fn create(&self, from: Address, artwork: &NewArtwork) -> Result<u64, ContractError>;

    async fn frame(&self, from: Address, id: u64) -> Result<(), ContractError>;

    /// List the artwork for adoption at `price` minor units.
    async fn offer_for_adoption(
        &self,
        from: Address,
        id: u64,
        price: MinorUnits,
    ) -> Result<(), ContractError>;

    /// Adopt the artwork, sending `payment` minor units which the contract
    /// forwards to `recipient`.
    async fn adopt(
        &self,
        from: Address,
        id: u64,
        recipient: Address,
        payment: MinorUnits,
    ) -> Result<(), ContractError>;

    async fn pack(&self, from: Address, id: u64) -> Result<(), ContractError>;

    async fn pick_up(&self, from: Address, id: u64) -> Result<(), ContractError>;

    async fn ship(&self, from: Address, id: u64) -> Result<(), ContractError>;

    async fn deliver(&self, from: Address, id: u64) -> Result<(), ContractError>;

    // ── Reads ─────────────────────────────────────────────────────────────────

    async fn fetch_owner_and_state(&self, id: u64) -> Result<OwnerAndState, ContractError>;

    /// Returns `Err(ContractError::NotFound)` when the id does not resolve.
    async fn fetch_artwork_details(&self, id: u64) -> Result<ArtworkDetails, ContractError>;

    async fn fetch_artist_details(&self, id: u64) -> Result<ArtistDetails, ContractError>;

    // ── Events ────────────────────────────────────────────────────────────────

    /// Events emitted at or after `cursor`, in emission order, plus the
    /// cursor to pass on the next call.
    async fn events_since(&self, cursor: u64) -> Result<EventBatch, ContractError>;
}

/// Supplies the currently active signing account.
///
/// Queried before every transition, since the user may switch accounts
/// between actions.
#[async_trait]
pub trait AccountProvider: Send + Sync {
    async fn active_account(&self) -> Result<Address, ProviderError>;
}

/// An account provider that always returns the same account.
///
/// Useful for tests and for pinning the acting account explicitly.
pub struct StaticAccountProvider {
    account: Address,
}

impl StaticAccountProvider {
    pub fn new(account: Address) -> Self {
        Self { account }
    }
}

#[async_trait]
impl AccountProvider for StaticAccountProvider {
    async fn active_account(&self) -> Result<Address, ProviderError> {
        if self.account.is_zero() {
            return Err(ProviderError::NoAccounts);
        }
        Ok(self.account)
    }
}
