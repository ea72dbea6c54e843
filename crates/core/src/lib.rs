//! Typed client for an artwork provenance contract.
//!
//! The contract owns the lifecycle state machine
//! (created → framed → offered → adopted → packed → picked up → shipped →
//! delivered). This crate mirrors one artwork locally, checks that a
//! requested operation is legal for the cached state before calling out,
//! and refreshes the mirror from the contract after every confirmed call.

mod address;
mod client;
mod error;
mod events;
mod operation;
mod record;
mod session;
mod state;
mod traits;
pub mod units;

pub use address::{Address, AddressError};
pub use client::{check_precondition, LifecycleClient, Request, RequestArgs};
pub use error::{ContractError, LifecycleError, PreconditionReason, ProviderError};
pub use events::{ContractEvent, EventBatch, EventLog, LoggedEvent};
pub use operation::{Actor, Operation, OperationSpec, Precondition, OPERATIONS};
pub use record::{ArtistDetails, ArtworkDetails, ArtworkRecord, NewArtwork, OwnerAndState};
pub use session::{LifecycleSession, Status};
pub use state::LifecycleState;
pub use traits::{AccountProvider, ContractClient, StaticAccountProvider};
pub use units::{AmountError, MinorUnits};
