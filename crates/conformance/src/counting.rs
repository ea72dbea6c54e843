//! Instrumentation wrapped around a backend under test.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use artshop_core::{
    AccountProvider, Address, ArtistDetails, ArtworkDetails, ContractClient, ContractError,
    EventBatch, MinorUnits, NewArtwork, OwnerAndState, ProviderError,
};
use async_trait::async_trait;

/// Counts every call reaching the inner contract and can hold writes open
/// for a fixed delay, which keeps a transition in flight long enough to
/// observe it.
pub struct CountingContract {
    inner: Arc<dyn ContractClient>,
    calls: AtomicUsize,
    write_delay_ms: AtomicU64,
}

impl CountingContract {
    pub fn new(inner: Arc<dyn ContractClient>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            write_delay_ms: AtomicU64::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_write_delay(&self, delay: Duration) {
        let ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.write_delay_ms.store(ms, Ordering::SeqCst);
    }

    fn read(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    async fn write(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let ms = self.write_delay_ms.load(Ordering::SeqCst);
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }
}

#[async_trait]
impl ContractClient for CountingContract {
    async fn create(&self, from: Address, artwork: &NewArtwork) -> Result<u64, ContractError> {
        self.write().await;
        self.inner.create(from, artwork).await
    }

    async fn frame(&self, from: Address, id: u64) -> Result<(), ContractError> {
        self.write().await;
        self.inner.frame(from, id).await
    }

    async fn offer_for_adoption(
        &self,
        from: Address,
        id: u64,
        price: MinorUnits,
    ) -> Result<(), ContractError> {
        self.write().await;
        self.inner.offer_for_adoption(from, id, price).await
    }

    async fn adopt(
        &self,
        from: Address,
        id: u64,
        recipient: Address,
        payment: MinorUnits,
    ) -> Result<(), ContractError> {
        self.write().await;
        self.inner.adopt(from, id, recipient, payment).await
    }

    async fn pack(&self, from: Address, id: u64) -> Result<(), ContractError> {
        self.write().await;
        self.inner.pack(from, id).await
    }

    async fn pick_up(&self, from: Address, id: u64) -> Result<(), ContractError> {
        self.write().await;
        self.inner.pick_up(from, id).await
    }

    async fn ship(&self, from: Address, id: u64) -> Result<(), ContractError> {
        self.write().await;
        self.inner.ship(from, id).await
    }

    async fn deliver(&self, from: Address, id: u64) -> Result<(), ContractError> {
        self.write().await;
        self.inner.deliver(from, id).await
    }

    async fn fetch_owner_and_state(&self, id: u64) -> Result<OwnerAndState, ContractError> {
        self.read();
        self.inner.fetch_owner_and_state(id).await
    }

    async fn fetch_artwork_details(&self, id: u64) -> Result<ArtworkDetails, ContractError> {
        self.read();
        self.inner.fetch_artwork_details(id).await
    }

    async fn fetch_artist_details(&self, id: u64) -> Result<ArtistDetails, ContractError> {
        self.read();
        self.inner.fetch_artist_details(id).await
    }

    async fn events_since(&self, cursor: u64) -> Result<EventBatch, ContractError> {
        self.read();
        self.inner.events_since(cursor).await
    }
}

/// An account provider whose active account can be switched between
/// actions, like a wallet.
#[derive(Default)]
pub struct SwitchableAccount {
    active: Mutex<Address>,
}

impl SwitchableAccount {
    pub fn new(account: Address) -> Self {
        Self {
            active: Mutex::new(account),
        }
    }

    pub fn switch_to(&self, account: Address) {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        *active = account;
    }
}

#[async_trait]
impl AccountProvider for SwitchableAccount {
    async fn active_account(&self) -> Result<Address, ProviderError> {
        let active = *self.active.lock().unwrap_or_else(|e| e.into_inner());
        if active.is_zero() {
            return Err(ProviderError::NoAccounts);
        }
        Ok(active)
    }
}
