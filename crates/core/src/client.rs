//! The lifecycle client: guarded dispatch of the nine operations.
//!
//! Every operation takes the caller's current [`ArtworkRecord`] and returns an
//! updated copy, or an error with the caller's record left untouched.
//! Execution of a transition follows:
//! 1. Precondition check against the cached record (no external call on failure)
//! 2. Single-flight claim on the artwork id
//! 3. Re-query of the active account
//! 4. The contract call
//! 5. Owner+state refresh read back from the contract

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::address::Address;
use crate::error::{ContractError, LifecycleError, PreconditionReason};
use crate::events::EventLog;
use crate::operation::{Operation, Precondition};
use crate::record::{ArtworkRecord, NewArtwork};
use crate::traits::{AccountProvider, ContractClient};
use crate::units::{self, MinorUnits};

/// Single-flight key used for artwork creation, which has no id yet.
const CREATE_SLOT: u64 = 0;

/// A fully specified request, addressed by operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Create(NewArtwork),
    Frame,
    OfferForAdoption {
        /// Listing price in major units.
        price: Decimal,
    },
    Adopt {
        /// Payment in major units. `None` pays the cached listed price.
        payment: Option<Decimal>,
    },
    Pack,
    PickUp,
    Ship,
    Deliver,
    FetchDetails {
        id: u64,
    },
}

/// Loose inputs from which a [`Request`] is built by request code.
#[derive(Debug, Clone, Default)]
pub struct RequestArgs {
    pub artwork: NewArtwork,
    pub id: u64,
    pub price: Decimal,
    pub payment: Option<Decimal>,
}

impl Request {
    pub fn operation(&self) -> Operation {
        match self {
            Request::Create(_) => Operation::Create,
            Request::Frame => Operation::Frame,
            Request::OfferForAdoption { .. } => Operation::OfferForAdoption,
            Request::Adopt { .. } => Operation::Adopt,
            Request::Pack => Operation::Pack,
            Request::PickUp => Operation::PickUp,
            Request::Ship => Operation::Ship,
            Request::Deliver => Operation::Deliver,
            Request::FetchDetails { .. } => Operation::FetchDetails,
        }
    }

    /// Build the request addressed by `code` (0–8). `None` for unknown codes.
    pub fn from_code(code: u8, args: RequestArgs) -> Option<Request> {
        let request = match Operation::from_request_code(code)? {
            Operation::Create => Request::Create(args.artwork),
            Operation::Frame => Request::Frame,
            Operation::OfferForAdoption => Request::OfferForAdoption { price: args.price },
            Operation::Adopt => Request::Adopt {
                payment: args.payment,
            },
            Operation::Pack => Request::Pack,
            Operation::PickUp => Request::PickUp,
            Operation::Ship => Request::Ship,
            Operation::Deliver => Request::Deliver,
            Operation::FetchDetails => Request::FetchDetails { id: args.id },
        };
        Some(request)
    }
}

/// A contract write, once the inputs have been validated and converted.
enum Call {
    Frame,
    Offer(MinorUnits),
    Adopt {
        recipient: Address,
        payment: MinorUnits,
    },
    Pack,
    PickUp,
    Ship,
    Deliver,
}

/// Removes its id from the in-flight set when dropped, whether the
/// transition succeeded or not.
struct InFlight<'a> {
    set: &'a Mutex<HashSet<u64>>,
    id: u64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut set = self.set.lock().unwrap_or_else(|e| e.into_inner());
        set.remove(&self.id);
    }
}

/// Guarded dispatcher over an injected contract and account provider.
pub struct LifecycleClient {
    contract: Arc<dyn ContractClient>,
    accounts: Arc<dyn AccountProvider>,
    in_flight: Mutex<HashSet<u64>>,
}

impl LifecycleClient {
    pub fn new(contract: Arc<dyn ContractClient>, accounts: Arc<dyn AccountProvider>) -> Self {
        Self {
            contract,
            accounts,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Route a request to its operation.
    pub async fn dispatch(
        &self,
        record: &ArtworkRecord,
        request: Request,
    ) -> Result<ArtworkRecord, LifecycleError> {
        match request {
            Request::Create(artwork) => self.create(record, artwork).await,
            Request::Frame => self.frame(record).await,
            Request::OfferForAdoption { price } => self.offer_for_adoption(record, price).await,
            Request::Adopt { payment } => self.adopt(record, payment).await,
            Request::Pack => self.pack(record).await,
            Request::PickUp => self.pick_up(record).await,
            Request::Ship => self.ship(record).await,
            Request::Deliver => self.deliver(record).await,
            Request::FetchDetails { id } => self.fetch_details(id).await,
        }
    }

    pub async fn create(
        &self,
        record: &ArtworkRecord,
        artwork: NewArtwork,
    ) -> Result<ArtworkRecord, LifecycleError> {
        let operation = Operation::Create;
        check_precondition(operation, record)?;
        let _claim = self.claim(operation, CREATE_SLOT)?;
        let origin = self.accounts.active_account().await?;

        let artwork = artwork.normalized();
        info!(operation = %operation, from = %origin, "dispatching");
        let id = self
            .contract
            .create(origin, &artwork)
            .await
            .map_err(|e| rejected(operation, e))?;

        let refresh = self
            .contract
            .fetch_owner_and_state(id)
            .await
            .map_err(|e| rejected(operation, e))?;

        let mut created = artwork.into_record(id, origin);
        created.apply_owner_and_state(&refresh);
        info!(artwork_id = id, state = %created.state, "artwork created");
        Ok(created)
    }

    pub async fn frame(&self, record: &ArtworkRecord) -> Result<ArtworkRecord, LifecycleError> {
        self.transition(record, Operation::Frame, || Ok(Call::Frame))
            .await
    }

    /// List the artwork at `price` major units.
    pub async fn offer_for_adoption(
        &self,
        record: &ArtworkRecord,
        price: Decimal,
    ) -> Result<ArtworkRecord, LifecycleError> {
        let operation = Operation::OfferForAdoption;
        let mut updated = self
            .transition(record, operation, || {
                units::to_minor(price)
                    .map(Call::Offer)
                    .map_err(|e| LifecycleError::precondition(operation, e.into()))
            })
            .await?;
        // Confirmed by the contract accepting the listing.
        updated.price = price.normalize();
        Ok(updated)
    }

    /// Adopt the artwork, paying `payment` (defaults to the listed price) to
    /// the origin artist.
    pub async fn adopt(
        &self,
        record: &ArtworkRecord,
        payment: Option<Decimal>,
    ) -> Result<ArtworkRecord, LifecycleError> {
        let operation = Operation::Adopt;
        let mut updated = self
            .transition(record, operation, || {
                let listed = record.price;
                let offered = payment.unwrap_or(listed);
                if offered != listed {
                    return Err(LifecycleError::precondition(
                        operation,
                        PreconditionReason::PaymentMismatch { listed, offered },
                    ));
                }
                let recipient = record.origin_artist.non_zero().ok_or_else(|| {
                    LifecycleError::precondition(
                        operation,
                        PreconditionReason::UnknownOriginArtist { id: record.id },
                    )
                })?;
                let payment = units::to_minor(offered)
                    .map_err(|e| LifecycleError::precondition(operation, e.into()))?;
                Ok(Call::Adopt { recipient, payment })
            })
            .await?;
        updated.adopter = updated.owner;
        Ok(updated)
    }

    pub async fn pack(&self, record: &ArtworkRecord) -> Result<ArtworkRecord, LifecycleError> {
        self.transition(record, Operation::Pack, || Ok(Call::Pack))
            .await
    }

    pub async fn pick_up(&self, record: &ArtworkRecord) -> Result<ArtworkRecord, LifecycleError> {
        self.transition(record, Operation::PickUp, || Ok(Call::PickUp))
            .await
    }

    pub async fn ship(&self, record: &ArtworkRecord) -> Result<ArtworkRecord, LifecycleError> {
        self.transition(record, Operation::Ship, || Ok(Call::Ship))
            .await
    }

    pub async fn deliver(&self, record: &ArtworkRecord) -> Result<ArtworkRecord, LifecycleError> {
        self.transition(record, Operation::Deliver, || Ok(Call::Deliver))
            .await
    }

    /// Read the artwork and artist details for `id` into a fresh record.
    pub async fn fetch_details(&self, id: u64) -> Result<ArtworkRecord, LifecycleError> {
        let operation = Operation::FetchDetails;
        if id == 0 {
            return Err(LifecycleError::NotFound { id });
        }
        debug!(artwork_id = id, "fetching details");
        let artwork = self
            .contract
            .fetch_artwork_details(id)
            .await
            .map_err(|e| rejected(operation, e))?;
        if !artwork.exists || !artwork.state.is_known() {
            return Err(LifecycleError::NotFound { id });
        }
        let artist = self
            .contract
            .fetch_artist_details(id)
            .await
            .map_err(|e| rejected(operation, e))?;

        let mut record = ArtworkRecord::empty();
        record
            .apply_details(id, artwork, artist)
            .map_err(|e| LifecycleError::ExternalCallRejected {
                operation,
                message: format!("contract returned an unrepresentable price: {e}"),
            })?;
        Ok(record)
    }

    /// Pull newly emitted contract events into `log`. Returns how many were appended.
    pub async fn poll_events(&self, log: &mut EventLog) -> Result<usize, LifecycleError> {
        let batch = self
            .contract
            .events_since(log.cursor())
            .await
            .map_err(|e| LifecycleError::ExternalCallRejected {
                operation: Operation::FetchDetails,
                message: e.to_string(),
            })?;
        Ok(log.append(batch))
    }

    /// Whether a transition for `id` is awaiting confirmation.
    pub fn is_pending(&self, id: u64) -> bool {
        let set = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        set.contains(&id)
    }

    // ── Internals ────────────────────────────────────────────────────────────

    async fn transition(
        &self,
        record: &ArtworkRecord,
        operation: Operation,
        prepare: impl FnOnce() -> Result<Call, LifecycleError>,
    ) -> Result<ArtworkRecord, LifecycleError> {
        check_precondition(operation, record)?;
        let call = prepare()?;
        let _claim = self.claim(operation, record.id)?;
        let from = self.accounts.active_account().await?;

        info!(artwork_id = record.id, operation = %operation, from = %from, "dispatching");
        self.submit(from, record.id, call)
            .await
            .map_err(|e| rejected(operation, e))?;

        let refresh = self
            .contract
            .fetch_owner_and_state(record.id)
            .await
            .map_err(|e| rejected(operation, e))?;

        let mut updated = record.clone();
        updated.apply_owner_and_state(&refresh);
        info!(artwork_id = record.id, state = %updated.state, "transition confirmed");
        Ok(updated)
    }

    async fn submit(&self, from: Address, id: u64, call: Call) -> Result<(), ContractError> {
        match call {
            Call::Frame => self.contract.frame(from, id).await,
            Call::Offer(price) => self.contract.offer_for_adoption(from, id, price).await,
            Call::Adopt { recipient, payment } => {
                self.contract.adopt(from, id, recipient, payment).await
            }
            Call::Pack => self.contract.pack(from, id).await,
            Call::PickUp => self.contract.pick_up(from, id).await,
            Call::Ship => self.contract.ship(from, id).await,
            Call::Deliver => self.contract.deliver(from, id).await,
        }
    }

    fn claim(&self, operation: Operation, id: u64) -> Result<InFlight<'_>, LifecycleError> {
        let mut set = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if !set.insert(id) {
            warn!(artwork_id = id, operation = %operation, "transition already in flight");
            return Err(LifecycleError::precondition(
                operation,
                PreconditionReason::TransitionPending { id },
            ));
        }
        Ok(InFlight {
            set: &self.in_flight,
            id,
        })
    }
}

/// Check the cached record against the operation's precondition.
pub fn check_precondition(
    operation: Operation,
    record: &ArtworkRecord,
) -> Result<(), LifecycleError> {
    match operation.spec().precondition {
        Precondition::Any => Ok(()),
        Precondition::EmptyRecord if record.is_empty() => Ok(()),
        Precondition::EmptyRecord => Err(LifecycleError::precondition(
            operation,
            PreconditionReason::AlreadyCreated { id: record.id },
        )),
        Precondition::State(_) if record.is_empty() => Err(LifecycleError::precondition(
            operation,
            PreconditionReason::NoArtworkSelected,
        )),
        Precondition::State(required) if record.state == required => Ok(()),
        Precondition::State(required) => Err(LifecycleError::precondition(
            operation,
            PreconditionReason::WrongState {
                required,
                actual: record.state,
            },
        )),
    }
}

fn rejected(operation: Operation, err: ContractError) -> LifecycleError {
    warn!(operation = %operation, error = %err, "contract call failed");
    match err {
        ContractError::NotFound(id) => LifecycleError::NotFound { id },
        ContractError::Rejected(message) | ContractError::Transport(message) => {
            LifecycleError::ExternalCallRejected { operation, message }
        }
    }
}
