use bth_chain::ChainError;
use bth_revocation::RevocationError;
use bth_types::{Address, Bytes32};
use thiserror::Error;

/// Errors that abort a verification registry call.
///
/// A failed call leaves both the verification registry and its paired
/// revocation registry unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("not owner: {caller}")]
    NotOwner { caller: Address },

    #[error("not admin: {caller}")]
    NotAdmin { caller: Address },

    /// The zero address was supplied as a new owner or admin.
    #[error("invalid address")]
    InvalidAddress,

    #[error("invalid registry address")]
    InvalidRegistryAddress,

    #[error("invalid admin address")]
    InvalidAdminAddress,

    /// A required content hash was zero. `field` names it, e.g. `"data hash"`.
    #[error("invalid {field}")]
    InvalidHash { field: &'static str },

    #[error("{category} already registered: {id}")]
    AlreadyRegistered { category: &'static str, id: Bytes32 },

    #[error("{category} not found: {id}")]
    NotFound { category: &'static str, id: Bytes32 },

    #[error("index out of bounds: {index} >= {count}")]
    IndexOutOfBounds { index: usize, count: usize },

    /// Parallel batch arrays disagree in length.
    #[error("array length mismatch: {field} has {actual} entries, expected {expected}")]
    ArrayLengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("empty arrays")]
    EmptyArrays,

    /// A write was attempted against a revocation registry other than the
    /// one this registry was constructed with.
    #[error("revocation registry mismatch: paired with {expected}, got {actual}")]
    RegistryMismatch { expected: Address, actual: Address },

    #[error(transparent)]
    Revocation(#[from] RevocationError),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// Convenience type alias for verification operations.
pub type Result<T> = std::result::Result<T, VerificationError>;
