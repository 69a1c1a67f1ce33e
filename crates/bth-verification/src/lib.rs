//! Verification registries for the Blockthentic attestation ledger.
//!
//! A verification registry stores the record for a piece of content (its
//! hash, issuer, URI and category fields) and leaves existence and validity
//! to its paired revocation registry. `verify` is the authenticity check:
//! the record exists, the stored hash matches the candidate, and the
//! revocation registry still reports the id valid.
//!
//! One generic [`VerificationRegistry`] serves every [`Category`]; the
//! [`Document`], [`Image`] and [`Dataset`] modules supply the category
//! markers, their reason enums and the named operations.
//!
//! ```
//! use bth_chain::Transaction;
//! use bth_types::{Address, BlockTime, Bytes32};
//! use bth_verification::{DatasetRegistry, DatasetRevocationRegistry};
//!
//! let owner = Address::derive("owner");
//! let tx = || Transaction::new(owner, BlockTime::from_secs(1));
//!
//! let mut revocation = DatasetRevocationRegistry::new(Address::derive("rev"), owner);
//! let mut datasets = DatasetRegistry::new(
//!     Address::derive("ver"),
//!     owner,
//!     revocation.address(),
//!     Address::derive("admin"),
//! )
//! .unwrap();
//! revocation.set_verification_contract(&mut tx(), datasets.address()).unwrap();
//!
//! let id = Bytes32::from_label("DS-001");
//! let hash = Bytes32::digest(b"contents");
//! datasets
//!     .register_dataset(&mut tx(), &mut revocation, id, hash, "ipfs://ds", "tabular")
//!     .unwrap();
//! assert!(datasets.verify_dataset(&revocation, &id, &hash));
//! ```

pub mod access;
pub mod category;
pub mod dataset;
pub mod document;
pub mod error;
pub mod event;
pub mod image;
pub mod registry;

pub use access::AccessControl;
pub use category::{
    Category, Registration, VerificationEntry, VerificationRecord, VerificationStatus,
};
pub use dataset::{Dataset, DatasetFields, DatasetReason, DatasetRegistry, DatasetRevocationRegistry};
pub use document::{Document, DocumentReason, DocumentRegistry, DocumentRevocationRegistry};
pub use error::{Result, VerificationError};
pub use event::VerificationEvent;
pub use image::{
    Image, ImageExtended, ImageFields, ImageReason, ImageRegistry, ImageRevocationRegistry,
};
pub use registry::{RegistryUndo, VerificationRegistry};
