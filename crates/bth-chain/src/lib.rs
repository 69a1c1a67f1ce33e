//! Execution substrate for the Blockthentic registries.
//!
//! Registries never own a global "current caller" or "current time". Every
//! state transition receives a [`Transaction`] explicitly: it carries the
//! immediate caller, the block time, nested call frames for contract-to-contract
//! calls, and the events buffered so far. A transaction's events reach the
//! [`EventLog`] only when the enclosing operation succeeds.
//!
//! # Modules
//!
//! - [`error`] -- Error types for log integrity and event encoding
//! - [`event`] -- The [`Event`] trait and buffered [`PendingEvent`]s
//! - [`log`] -- Hash-linked append-only [`EventLog`]
//! - [`transaction`] -- [`Transaction`] call frames and checkpoints
//! - [`journal`] -- Typed undo log ([`Journal`], [`Reversible`])
//! - [`clock`] -- Block time sources

pub mod clock;
pub mod error;
pub mod event;
pub mod journal;
pub mod log;
pub mod transaction;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ChainError, Result};
pub use event::{Event, PendingEvent};
pub use journal::{Journal, Reversible};
pub use log::{EventLog, LogEntry};
pub use transaction::{Checkpoint, Transaction};

use bth_types::Address;

/// Deterministic address for a contract deployed by `deployer` at `nonce`.
pub fn contract_address(deployer: &Address, nonce: u64) -> Address {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"bth-contract-v1:");
    hasher.update(deployer.as_bytes());
    hasher.update(&nonce.to_le_bytes());
    Address::from_digest(hasher.finalize().as_bytes())
}
