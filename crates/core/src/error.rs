use rust_decimal::Decimal;

use crate::operation::Operation;
use crate::state::LifecycleState;
use crate::units::AmountError;

/// Why a request was refused before reaching the contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionReason {
    #[error("requires state {required}, cached state is {actual}")]
    WrongState {
        required: LifecycleState,
        actual: LifecycleState,
    },

    #[error("artwork {id} is already selected; start a new lookup before creating")]
    AlreadyCreated { id: u64 },

    #[error("no artwork selected")]
    NoArtworkSelected,

    #[error("a transition for artwork {id} is still awaiting confirmation")]
    TransitionPending { id: u64 },

    #[error("origin artist of artwork {id} is unknown; fetch the artwork first")]
    UnknownOriginArtist { id: u64 },

    #[error("payment {offered} does not match listed price {listed}")]
    PaymentMismatch { listed: Decimal, offered: Decimal },

    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),
}

/// All errors surfaced by the lifecycle client.
///
/// Every variant is terminal for the triggering action; none is retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// The cached record does not permit the operation. No external call was made.
    #[error("cannot {operation}: {reason}")]
    PreconditionNotMet {
        operation: Operation,
        reason: PreconditionReason,
    },

    /// The contract (or the node in front of it) refused the call. The
    /// message is passed through verbatim.
    #[error("{message}")]
    ExternalCallRejected {
        operation: Operation,
        message: String,
    },

    /// A lookup by id resolved to no artwork.
    #[error("artwork {id} not found")]
    NotFound { id: u64 },

    /// No signing/account provider is reachable.
    #[error("account provider unavailable: {message}")]
    ProviderUnavailable { message: String },
}

impl LifecycleError {
    pub fn precondition(operation: Operation, reason: PreconditionReason) -> Self {
        LifecycleError::PreconditionNotMet { operation, reason }
    }

    /// Short machine-readable kind, used in JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            LifecycleError::PreconditionNotMet { .. } => "precondition_not_met",
            LifecycleError::ExternalCallRejected { .. } => "external_call_rejected",
            LifecycleError::NotFound { .. } => "not_found",
            LifecycleError::ProviderUnavailable { .. } => "provider_unavailable",
        }
    }
}

/// Errors returned by a [`ContractClient`](crate::ContractClient) implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    /// The contract reverted or the node refused the transaction.
    #[error("{0}")]
    Rejected(String),

    /// The queried artwork does not exist.
    #[error("artwork {0} does not exist")]
    NotFound(u64),

    /// The endpoint could not be reached or answered with garbage.
    #[error("contract endpoint error: {0}")]
    Transport(String),
}

/// Errors returned by an [`AccountProvider`](crate::AccountProvider) implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("no account provider detected: {0}")]
    Unreachable(String),

    #[error("provider exposes no accounts")]
    NoAccounts,
}

impl From<ProviderError> for LifecycleError {
    fn from(err: ProviderError) -> Self {
        LifecycleError::ProviderUnavailable {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_display() {
        let err = LifecycleError::precondition(
            Operation::Frame,
            PreconditionReason::WrongState {
                required: LifecycleState::Created,
                actual: LifecycleState::Framed,
            },
        );
        assert_eq!(
            err.to_string(),
            "cannot frame: requires state Created, cached state is Framed"
        );
        assert_eq!(err.kind(), "precondition_not_met");
    }

    #[test]
    fn rejected_message_is_verbatim() {
        let err = LifecycleError::ExternalCallRejected {
            operation: Operation::Pack,
            message: "VM Exception while processing transaction: revert".into(),
        };
        assert_eq!(
            err.to_string(),
            "VM Exception while processing transaction: revert"
        );
    }

    #[test]
    fn provider_error_converts() {
        let err: LifecycleError = ProviderError::NoAccounts.into();
        assert_eq!(
            err.to_string(),
            "account provider unavailable: provider exposes no accounts"
        );
    }
}
