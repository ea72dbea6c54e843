//! The nine user-triggered operations and their dispatch table.
//!
//! Each operation has a stable request code (0–8) and a static
//! [`OperationSpec`] describing what the cached record must look like before
//! the call is worth making, and which account the contract expects to act.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::LifecycleState;

/// A user-triggered operation against the artwork contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Frame,
    OfferForAdoption,
    Adopt,
    Pack,
    PickUp,
    Ship,
    Deliver,
    FetchDetails,
}

/// What the cached record must satisfy before an operation is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// No artwork selected (`id == 0`).
    EmptyRecord,
    /// Cached state must equal the given state.
    State(LifecycleState),
    /// Read-only; always permitted.
    Any,
}

/// The account the contract expects to act for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    /// Any account; for `create` it becomes the origin artist.
    AnyAccount,
    OriginArtist,
    /// Any account paying exactly the listed price.
    Payer,
    Shipper,
    /// Read-only, no signing account needed.
    Reader,
}

/// One row of the operation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSpec {
    pub operation: Operation,
    pub precondition: Precondition,
    pub actor: Actor,
}

/// The operation table, indexed by request code.
pub const OPERATIONS: [OperationSpec; 9] = [
    OperationSpec {
        operation: Operation::Create,
        precondition: Precondition::EmptyRecord,
        actor: Actor::AnyAccount,
    },
    OperationSpec {
        operation: Operation::Frame,
        precondition: Precondition::State(LifecycleState::Created),
        actor: Actor::OriginArtist,
    },
    OperationSpec {
        operation: Operation::OfferForAdoption,
        precondition: Precondition::State(LifecycleState::Framed),
        actor: Actor::OriginArtist,
    },
    OperationSpec {
        operation: Operation::Adopt,
        precondition: Precondition::State(LifecycleState::AdoptionOffered),
        actor: Actor::Payer,
    },
    OperationSpec {
        operation: Operation::Pack,
        precondition: Precondition::State(LifecycleState::Adopted),
        actor: Actor::OriginArtist,
    },
    OperationSpec {
        operation: Operation::PickUp,
        precondition: Precondition::State(LifecycleState::Packed),
        actor: Actor::Shipper,
    },
    OperationSpec {
        operation: Operation::Ship,
        precondition: Precondition::State(LifecycleState::PickedUp),
        actor: Actor::Shipper,
    },
    OperationSpec {
        operation: Operation::Deliver,
        precondition: Precondition::State(LifecycleState::Shipped),
        actor: Actor::Shipper,
    },
    OperationSpec {
        operation: Operation::FetchDetails,
        precondition: Precondition::Any,
        actor: Actor::Reader,
    },
];

impl Operation {
    pub const ALL: [Operation; 9] = [
        Operation::Create,
        Operation::Frame,
        Operation::OfferForAdoption,
        Operation::Adopt,
        Operation::Pack,
        Operation::PickUp,
        Operation::Ship,
        Operation::Deliver,
        Operation::FetchDetails,
    ];

    /// Look up an operation by its request code.
    pub fn from_request_code(code: u8) -> Option<Operation> {
        OPERATIONS.get(code as usize).map(|spec| spec.operation)
    }

    pub fn request_code(self) -> u8 {
        match self {
            Operation::Create => 0,
            Operation::Frame => 1,
            Operation::OfferForAdoption => 2,
            Operation::Adopt => 3,
            Operation::Pack => 4,
            Operation::PickUp => 5,
            Operation::Ship => 6,
            Operation::Deliver => 7,
            Operation::FetchDetails => 8,
        }
    }

    pub fn spec(self) -> &'static OperationSpec {
        &OPERATIONS[self.request_code() as usize]
    }

    /// True for every operation except the read-only fetch.
    pub fn is_write(self) -> bool {
        self != Operation::FetchDetails
    }

    /// The single state-advancing transition that leaves `state`.
    pub fn transition_from(state: LifecycleState) -> Option<Operation> {
        OPERATIONS
            .iter()
            .find(|spec| spec.precondition == Precondition::State(state))
            .map(|spec| spec.operation)
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Frame => "frame",
            Operation::OfferForAdoption => "offer_for_adoption",
            Operation::Adopt => "adopt",
            Operation::Pack => "pack",
            Operation::PickUp => "pick_up",
            Operation::Ship => "ship",
            Operation::Deliver => "deliver",
            Operation::FetchDetails => "fetch_details",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
