//! Error types for revocation registry operations.

use bth_chain::ChainError;
use bth_types::{Address, Bytes32};
use thiserror::Error;

/// Errors that abort a revocation registry call.
///
/// Every error leaves the registry exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevocationError {
    /// Caller is not the registry owner.
    #[error("not owner: {caller}")]
    NotOwner { caller: Address },

    /// Caller is not the bound verification contract (or none is bound yet).
    #[error("not verification contract: {caller}")]
    NotVerificationContract { caller: Address },

    /// The zero address was supplied where a real address is required.
    #[error("invalid address")]
    InvalidAddress,

    /// The verification contract has already been set.
    #[error("verification contract already set: {current}")]
    AlreadyBound { current: Address },

    #[error("already registered: {id}")]
    AlreadyRegistered { id: Bytes32 },

    #[error("not registered: {id}")]
    NotRegistered { id: Bytes32 },

    #[error("already revoked: {id}")]
    AlreadyRevoked { id: Bytes32 },

    /// `NONE` was supplied as a revocation reason.
    #[error("must provide reason")]
    MustProvideReason,

    /// A wire reason code outside this registry's reason enum.
    #[error("unknown revocation reason code: {0}")]
    UnknownReason(u8),

    /// A batch call with no identifiers.
    #[error("empty arrays")]
    EmptyArrays,

    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// Convenience type alias for revocation operations.
pub type Result<T> = std::result::Result<T, RevocationError>;
