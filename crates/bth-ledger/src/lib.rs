//! Deployment facade for Blockthentic registry pairs.
//!
//! A [`Deployment`] owns one linked revocation/verification pair and the
//! hash-linked [`EventLog`](bth_chain::EventLog) of everything that pair has
//! emitted. Every write is executed as a single transaction whose events are
//! committed only when the whole operation succeeds, so the log can be
//! replayed offline to reconstruct any identifier's history and audited
//! against live state.
//!
//! ```
//! use std::sync::Arc;
//! use bth_chain::ManualClock;
//! use bth_ledger::Deployment;
//! use bth_types::{Address, BlockTime, Bytes32};
//! use bth_verification::{Dataset, DatasetFields, DatasetReason, Registration};
//!
//! let owner = Address::derive("owner");
//! let clock = Arc::new(ManualClock::new(BlockTime::from_secs(1_700_000_000)));
//! let mut d: Deployment<Dataset> =
//!     Deployment::deploy(owner, Address::derive("admin"), clock).unwrap();
//!
//! let id = Bytes32::from_label("DS-001");
//! let hash = Bytes32::digest(b"rows");
//! let fields = DatasetFields { dataset_type: "tabular".into() };
//! d.register(owner, Registration::new(id, hash, "ipfs://ds", fields)).unwrap();
//! assert!(d.verify(&id, &hash));
//!
//! d.revoke(owner, id, DatasetReason::Outdated).unwrap();
//! assert!(!d.verify(&id, &hash));
//! assert_eq!(d.history(&id).revoked.unwrap().reason, "OUTDATED");
//! assert!(d.audit().is_clean());
//! ```
//!
//! # Modules
//!
//! - [`deployment`] -- [`Deployment`], deploy-and-link plus atomic execution
//! - [`any`] -- [`AnyDeployment`], the category-agnostic form used by tooling
//! - [`audit`] -- Log replay into [`IdHistory`] and [`AuditReport`]
//! - [`store`] -- JSON persistence with atomic replace
//! - [`config`] -- [`LedgerConfig`] read from TOML
//! - [`error`] -- [`LedgerError`]

pub mod any;
pub mod audit;
pub mod config;
pub mod deployment;
pub mod error;
pub mod store;

pub use any::{AnyDeployment, DeploymentInfo, FieldArgs, RawRegistration, RecordView};
pub use audit::{AuditReport, Discrepancy, IdHistory, Replay, Revoked, Undecodable};
pub use config::{CategoryKind, ClockKind, LedgerConfig};
pub use deployment::{Contracts, Deployment};
pub use error::{LedgerError, LedgerResult};
