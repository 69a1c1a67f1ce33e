use serde::{Deserialize, Serialize};

use bth_chain::Event;
use bth_types::{Address, BlockTime, Bytes32};

use crate::reason::RevocationReason;

/// Events emitted by a revocation registry.
///
/// Batch calls emit a single aggregate event listing every affected id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", bound = "R: RevocationReason")]
pub enum RevocationEvent<R> {
    VerificationContractSet {
        verification_contract: Address,
    },
    Registered {
        id: Bytes32,
        timestamp: BlockTime,
    },
    BatchRegistered {
        ids: Vec<Bytes32>,
        timestamp: BlockTime,
    },
    Revoked {
        id: Bytes32,
        reason: R,
        timestamp: BlockTime,
    },
    BatchRevoked {
        ids: Vec<Bytes32>,
        reason: R,
        timestamp: BlockTime,
    },
}

impl<R: RevocationReason> Event for RevocationEvent<R> {
    fn name(&self) -> &'static str {
        match self {
            Self::VerificationContractSet { .. } => "VerificationContractSet",
            Self::Registered { .. } => "Registered",
            Self::BatchRegistered { .. } => "BatchRegistered",
            Self::Revoked { .. } => "Revoked",
            Self::BatchRevoked { .. } => "BatchRevoked",
        }
    }
}
