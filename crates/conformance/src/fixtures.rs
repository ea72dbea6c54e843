//! Test fixtures for the lifecycle conformance suite.
//!
//! `Harness` wires a backend under test to a `LifecycleClient` through a
//! `CountingContract` and a `SwitchableAccount`, and can drive a fresh
//! artwork to any lifecycle state using the backend's role accounts.

use std::sync::Arc;

use artshop_core::{
    Actor, Address, ArtworkRecord, LifecycleClient, LifecycleSession, LifecycleState, NewArtwork,
    Operation, Request, RequestArgs,
};
use rust_decimal::Decimal;

use crate::counting::{CountingContract, SwitchableAccount};
use crate::traits::TestableContract;

/// Listing price used by the suite: 2.5 major units.
pub fn price() -> Decimal {
    Decimal::new(25, 1)
}

/// Fully populated creation metadata.
pub fn sample_artwork() -> NewArtwork {
    NewArtwork {
        title: Some("Harbor at Dusk".into()),
        year: 1974,
        medium: Some("Oil on canvas".into()),
        style: Some("Impressionism".into()),
        artist_name: Some("M. Okafor".into()),
        artist_info: Some("Coastal painter".into()),
        artist_location: Some("Lagos".into()),
        notes: Some("Signed lower left".into()),
    }
}

/// A backend under test, instrumented and bound to a lifecycle client.
pub struct Harness {
    pub contract: Arc<CountingContract>,
    pub accounts: Arc<SwitchableAccount>,
    pub client: LifecycleClient,
    pub artist: Address,
    pub adopter: Address,
    pub shipper: Address,
}

impl Harness {
    pub fn new<C: TestableContract>(backend: &C) -> Self {
        let contract = Arc::new(CountingContract::new(backend.contract()));
        let accounts = Arc::new(SwitchableAccount::new(backend.artist()));
        let client = LifecycleClient::new(contract.clone(), accounts.clone());
        Self {
            contract,
            accounts,
            client,
            artist: backend.artist(),
            adopter: backend.adopter(),
            shipper: backend.shipper(),
        }
    }

    pub fn act_as(&self, account: Address) {
        self.accounts.switch_to(account);
    }

    /// A session sharing this harness's contract and accounts.
    pub fn session(&self) -> LifecycleSession {
        LifecycleSession::new(LifecycleClient::new(
            self.contract.clone(),
            self.accounts.clone(),
        ))
    }

    /// The role account that signs for `actor`.
    pub fn account_for(&self, actor: Actor) -> Address {
        match actor {
            Actor::Payer => self.adopter,
            Actor::Shipper => self.shipper,
            Actor::AnyAccount | Actor::OriginArtist | Actor::Reader => self.artist,
        }
    }

    /// Create a fresh artwork and drive it to `target` along the operation
    /// table, switching to the account each step requires.
    pub async fn advance_to(&self, target: LifecycleState) -> Result<ArtworkRecord, String> {
        self.act_as(self.artist);
        let mut record = self
            .client
            .create(&ArtworkRecord::empty(), sample_artwork())
            .await
            .map_err(|e| format!("create failed: {}", e))?;

        while record.state != target {
            if record.state.is_terminal() {
                return Err(format!("cannot advance past {}", record.state));
            }
            let operation = Operation::transition_from(record.state)
                .ok_or_else(|| format!("no transition leaves {}", record.state))?;
            self.act_as(self.account_for(operation.spec().actor));
            let args = RequestArgs {
                id: record.id,
                price: price(),
                ..RequestArgs::default()
            };
            let request = Request::from_code(operation.request_code(), args)
                .ok_or_else(|| format!("no request for {}", operation))?;
            record = self
                .client
                .dispatch(&record, request)
                .await
                .map_err(|e| format!("advancing from {}: {}", record.state, e))?;
        }
        Ok(record)
    }
}
