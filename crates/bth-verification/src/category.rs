use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use bth_revocation::RevocationReason;
use bth_types::{Address, BlockTime, Bytes32};

/// A content category served by its own verification registry.
///
/// Implemented by the zero-sized markers [`Document`](crate::Document),
/// [`Image`](crate::Image) and [`Dataset`](crate::Dataset).
pub trait Category: Clone + Copy + Debug + Default + PartialEq + Eq + Send + Sync + 'static {
    /// Lower-case noun used in errors and logs, e.g. `"dataset"`.
    const NAME: &'static str;

    /// Name of the content hash in errors, e.g. `"data hash"`.
    const HASH_FIELD: &'static str;

    /// This category's revocation reasons. Codes mean nothing outside it.
    type Reason: RevocationReason;

    /// Category-specific record fields beyond hash, issuer and URI.
    type Fields: Clone + Debug + PartialEq + Eq + Serialize + DeserializeOwned + Send + Sync + 'static;
}

/// A stored verification record. Never mutated after registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord<F> {
    pub id: Bytes32,
    pub content_hash: Bytes32,
    /// Owner at the time of registration.
    pub issuer: Address,
    /// Off-chain location; may be empty.
    pub uri: String,
    pub fields: F,
    pub registered_at: BlockTime,
}

/// Input to a registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration<F> {
    pub id: Bytes32,
    pub content_hash: Bytes32,
    pub uri: String,
    pub fields: F,
}

impl<F> Registration<F> {
    pub fn new(id: Bytes32, content_hash: Bytes32, uri: impl Into<String>, fields: F) -> Self {
        Self {
            id,
            content_hash,
            uri: uri.into(),
            fields,
        }
    }
}

/// Aggregate status read. All-false with a zero timestamp for unknown ids.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationStatus {
    pub exists: bool,
    pub valid: bool,
    pub revoked: bool,
    pub registered_at: BlockTime,
}

/// A stored record together with its live validity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationEntry<F> {
    #[serde(flatten)]
    pub record: VerificationRecord<F>,
    pub is_valid: bool,
}
