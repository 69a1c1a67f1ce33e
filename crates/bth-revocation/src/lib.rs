//! Revocation registry for the Blockthentic attestation ledger.
//!
//! The revocation registry is the category-agnostic source of truth for
//! whether an opaque 32-byte identifier exists and whether it is still
//! valid. Each identifier moves through a one-way state machine:
//!
//! ```text
//! UNREGISTERED --register--> REGISTERED (valid) --revoke--> REVOKED (invalid)
//! ```
//!
//! Registration is accepted only from the single verification contract bound
//! through [`RevocationRegistry::set_verification_contract`]; revocation is
//! accepted only from the registry owner. Nothing ever leaves `REVOKED`.
//!
//! # Modules
//!
//! - [`error`] -- [`RevocationError`]
//! - [`reason`] -- The category-scoped [`RevocationReason`] trait
//! - [`binding`] -- Set-once [`Binding`] to the authorized registrar
//! - [`record`] -- [`RevocationRecord`] and [`RevocationStatus`]
//! - [`event`] -- [`RevocationEvent`]
//! - [`traits`] -- [`RevocationReader`] / [`Registrar`] seams used by verification registries
//! - [`registry`] -- The [`RevocationRegistry`] itself

pub mod binding;
pub mod error;
pub mod event;
pub mod reason;
pub mod record;
pub mod registry;
pub mod traits;

pub use binding::{Binder, Binding, BoundRegistrar};
pub use error::{Result, RevocationError};
pub use event::RevocationEvent;
pub use reason::RevocationReason;
pub use record::{RevocationRecord, RevocationStatus};
pub use registry::RevocationRegistry;
pub use traits::{Registrar, RevocationReader};
