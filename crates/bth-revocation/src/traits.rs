//! The seams a verification registry uses to talk to its revocation registry.
//!
//! [`RevocationRegistry`](crate::RevocationRegistry) implements both traits.
//! Verification registries are written against the traits so that the
//! cross-registry call is explicit in every signature.

use bth_chain::Transaction;
use bth_types::{Address, Bytes32};

use crate::error::Result;

/// Read-only view of revocation state. Never fails.
pub trait RevocationReader {
    /// Address of the registry instance.
    fn address(&self) -> Address;

    fn is_registered(&self, id: &Bytes32) -> bool;

    fn is_revoked(&self, id: &Bytes32) -> bool;

    /// `registered && !revoked`; `false` for unknown ids.
    fn is_valid(&self, id: &Bytes32) -> bool {
        self.is_registered(id) && !self.is_revoked(id)
    }
}

/// Write access reserved for the bound verification contract.
///
/// Callers invoke these inside [`Transaction::call`] so that the registry
/// sees the verification contract as the sender.
pub trait Registrar: RevocationReader {
    fn register(&mut self, tx: &mut Transaction, id: Bytes32) -> Result<()>;

    fn register_batch(&mut self, tx: &mut Transaction, ids: &[Bytes32]) -> Result<()>;
}
