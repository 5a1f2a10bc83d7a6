use crate::contract::Resolution;
use crate::types::ContractId;

/// HTLC engine errors.
///
/// Every variant is recoverable: the contract is left untouched and the
/// caller decides whether to retry or switch branches.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HtlcError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("contract {0} already funded")]
    AlreadyFunded(ContractId),

    #[error("contract {0} not funded yet")]
    NotFunded(ContractId),

    #[error("contract {id} already resolved: {resolution}")]
    AlreadyResolved {
        id: ContractId,
        resolution: Resolution,
    },

    #[error("deadline expired for contract {0}: claim no longer possible")]
    DeadlineExpired(ContractId),

    #[error("deadline not reached for contract {0}: refund not yet possible")]
    DeadlineNotReached(ContractId),

    #[error("preimage does not match commitment of contract {0}")]
    PreimageMismatch(ContractId),

    #[error("authorization failed for contract {0}")]
    AuthorizationFailed(ContractId),
}

/// Bare error discriminant, for callers that branch on the failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidParameter,
    AlreadyFunded,
    NotFunded,
    AlreadyResolved,
    DeadlineExpired,
    DeadlineNotReached,
    PreimageMismatch,
    AuthorizationFailed,
}

impl HtlcError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParameter(_) => ErrorKind::InvalidParameter,
            Self::AlreadyFunded(_) => ErrorKind::AlreadyFunded,
            Self::NotFunded(_) => ErrorKind::NotFunded,
            Self::AlreadyResolved { .. } => ErrorKind::AlreadyResolved,
            Self::DeadlineExpired(_) => ErrorKind::DeadlineExpired,
            Self::DeadlineNotReached(_) => ErrorKind::DeadlineNotReached,
            Self::PreimageMismatch(_) => ErrorKind::PreimageMismatch,
            Self::AuthorizationFailed(_) => ErrorKind::AuthorizationFailed,
        }
    }
}

pub type Result<T> = std::result::Result<T, HtlcError>;
