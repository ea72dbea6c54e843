//! In-memory reference implementation of the artwork contract.
//!
//! Applies the same business rules the deployed contract enforces, so the
//! lifecycle client can be exercised without a node. Each write is checked
//! in order: artwork exists, caller is authorized, artwork is in the
//! required source state, payment matches. Reads of unknown ids return the
//! zero-valued struct with `exists == false`, as the contract does.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use artshop_core::{
    Address, ArtistDetails, ArtworkDetails, ContractClient, ContractError, ContractEvent,
    EventBatch, LifecycleState, MinorUnits, NewArtwork, OwnerAndState,
};
use async_trait::async_trait;

/// Who may call a transition.
#[derive(Clone, Copy)]
enum Caller {
    OriginArtist,
    Shipper,
    Anyone,
}

#[derive(Default)]
struct Ledger {
    artworks: BTreeMap<u64, (ArtworkDetails, ArtistDetails)>,
    next_id: u64,
    block: u64,
    events: Vec<ContractEvent>,
    balances: HashMap<Address, MinorUnits>,
}

impl Ledger {
    fn emit(&mut self, name: &str) {
        self.block += 1;
        let event = ContractEvent {
            name: name.to_string(),
            transaction_hash: format!("0x{:064x}", self.block),
            block_number: self.block,
        };
        self.events.push(event);
    }
}

/// A contract living entirely in process memory.
pub struct InMemoryContract {
    ledger: Mutex<Ledger>,
    calls: AtomicUsize,
}

impl Default for InMemoryContract {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryContract {
    pub fn new() -> Self {
        Self {
            ledger: Mutex::new(Ledger {
                next_id: 1,
                ..Ledger::default()
            }),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of contract calls (reads and writes) received so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Total payments credited to `account`.
    pub fn balance_of(&self, account: Address) -> MinorUnits {
        let ledger = self.lock();
        ledger.balances.get(&account).copied().unwrap_or(0)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    /// Validate and apply one state transition.
    fn advance(
        &self,
        from: Address,
        id: u64,
        caller: Caller,
        required: LifecycleState,
        event: &str,
        apply: impl FnOnce(&mut ArtworkDetails, &mut HashMap<Address, MinorUnits>) -> Result<(), ContractError>,
    ) -> Result<(), ContractError> {
        self.record_call();
        let mut ledger = self.lock();
        let Ledger {
            artworks, balances, ..
        } = &mut *ledger;
        let (details, artist) = artworks
            .get_mut(&id)
            .ok_or_else(|| ContractError::Rejected(format!("artwork {} does not exist", id)))?;

        match caller {
            Caller::OriginArtist if from != artist.origin_artist => {
                return Err(ContractError::Rejected(
                    "caller is not the origin artist".to_string(),
                ));
            }
            Caller::Shipper if from != details.shipper => {
                return Err(ContractError::Rejected(
                    "caller is not the shipper".to_string(),
                ));
            }
            _ => {}
        }
        if details.state != required {
            return Err(ContractError::Rejected(format!(
                "artwork {} is not in state {}",
                id, required
            )));
        }

        apply(details, balances)?;
        details.state = required.next().unwrap_or(required);
        ledger.emit(event);
        Ok(())
    }
}

#[async_trait]
impl ContractClient for InMemoryContract {
    async fn create(&self, from: Address, artwork: &NewArtwork) -> Result<u64, ContractError> {
        self.record_call();
        let mut ledger = self.lock();
        let id = ledger.next_id;
        ledger.next_id += 1;
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let details = ArtworkDetails {
            exists: true,
            owner: from,
            title: text(&artwork.title),
            year: artwork.year,
            medium: text(&artwork.medium),
            style: text(&artwork.style),
            price: 0,
            notes: text(&artwork.notes),
            state: LifecycleState::Created,
            adopter: Address::ZERO,
            shipper: Address::ZERO,
        };
        let artist = ArtistDetails {
            origin_artist: from,
            name: text(&artwork.artist_name),
            info: text(&artwork.artist_info),
            location: text(&artwork.artist_location),
        };
        ledger.artworks.insert(id, (details, artist));
        ledger.emit("Created");
        Ok(id)
    }

    async fn frame(&self, from: Address, id: u64) -> Result<(), ContractError> {
        self.advance(
            from,
            id,
            Caller::OriginArtist,
            LifecycleState::Created,
            "Framed",
            |_, _| Ok(()),
        )
    }

    async fn offer_for_adoption(
        &self,
        from: Address,
        id: u64,
        price: MinorUnits,
    ) -> Result<(), ContractError> {
        self.advance(
            from,
            id,
            Caller::OriginArtist,
            LifecycleState::Framed,
            "ForAdoption",
            |details, _| {
                details.price = price;
                Ok(())
            },
        )
    }

    async fn adopt(
        &self,
        from: Address,
        id: u64,
        recipient: Address,
        payment: MinorUnits,
    ) -> Result<(), ContractError> {
        self.advance(
            from,
            id,
            Caller::Anyone,
            LifecycleState::AdoptionOffered,
            "Adopted",
            |details, balances| {
                if payment != details.price {
                    return Err(ContractError::Rejected(
                        "payment does not match the listed price".to_string(),
                    ));
                }
                *balances.entry(recipient).or_insert(0) += payment;
                details.owner = from;
                details.adopter = from;
                Ok(())
            },
        )
    }

    async fn pack(&self, from: Address, id: u64) -> Result<(), ContractError> {
        self.advance(
            from,
            id,
            Caller::OriginArtist,
            LifecycleState::Adopted,
            "Packed",
            |_, _| Ok(()),
        )
    }

    async fn pick_up(&self, from: Address, id: u64) -> Result<(), ContractError> {
        self.advance(
            from,
            id,
            Caller::Anyone,
            LifecycleState::Packed,
            "PickedUp",
            |details, _| {
                details.shipper = from;
                Ok(())
            },
        )
    }

    async fn ship(&self, from: Address, id: u64) -> Result<(), ContractError> {
        self.advance(
            from,
            id,
            Caller::Shipper,
            LifecycleState::PickedUp,
            "Shipped",
            |_, _| Ok(()),
        )
    }

    async fn deliver(&self, from: Address, id: u64) -> Result<(), ContractError> {
        self.advance(
            from,
            id,
            Caller::Shipper,
            LifecycleState::Shipped,
            "Delivered",
            |_, _| Ok(()),
        )
    }

    async fn fetch_owner_and_state(&self, id: u64) -> Result<OwnerAndState, ContractError> {
        self.record_call();
        let ledger = self.lock();
        let (details, _) = ledger
            .artworks
            .get(&id)
            .ok_or(ContractError::NotFound(id))?;
        Ok(OwnerAndState {
            owner: details.owner,
            state: details.state,
        })
    }

    async fn fetch_artwork_details(&self, id: u64) -> Result<ArtworkDetails, ContractError> {
        self.record_call();
        let ledger = self.lock();
        Ok(ledger
            .artworks
            .get(&id)
            .map(|(details, _)| details.clone())
            .unwrap_or_default())
    }

    async fn fetch_artist_details(&self, id: u64) -> Result<ArtistDetails, ContractError> {
        self.record_call();
        let ledger = self.lock();
        Ok(ledger
            .artworks
            .get(&id)
            .map(|(_, artist)| artist.clone())
            .unwrap_or_default())
    }

    async fn events_since(&self, cursor: u64) -> Result<EventBatch, ContractError> {
        self.record_call();
        let ledger = self.lock();
        let events = ledger
            .events
            .iter()
            .filter(|e| e.block_number >= cursor)
            .cloned()
            .collect();
        Ok(EventBatch {
            events,
            next_cursor: ledger.block + 1,
        })
    }
}
