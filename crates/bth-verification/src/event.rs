use serde::{Deserialize, Serialize};

use bth_chain::Event;
use bth_types::{Address, BlockTime, Bytes32};

/// Events emitted by a verification registry.
///
/// Batches emit one `Registered` per record followed by a single
/// `BatchRegistered` summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum VerificationEvent<F> {
    Registered {
        id: Bytes32,
        content_hash: Bytes32,
        issuer: Address,
        uri: String,
        fields: F,
        timestamp: BlockTime,
    },
    BatchRegistered {
        ids: Vec<Bytes32>,
        count: usize,
        issuer: Address,
        timestamp: BlockTime,
    },
    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
    },
    AdminUpdated {
        previous_admin: Address,
        new_admin: Address,
    },
}

impl<F: Serialize> Event for VerificationEvent<F> {
    fn name(&self) -> &'static str {
        match self {
            Self::Registered { .. } => "Registered",
            Self::BatchRegistered { .. } => "BatchRegistered",
            Self::OwnershipTransferred { .. } => "OwnershipTransferred",
            Self::AdminUpdated { .. } => "AdminUpdated",
        }
    }
}
