use serde::{Deserialize, Serialize};

use bth_types::BlockTime;

use crate::reason::RevocationReason;

/// Registration and revocation state of one identifier.
///
/// Invariants: `revoked` implies `registered`, and `reason != NONE` exactly
/// when `revoked`. A record is never removed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "R: RevocationReason")]
pub struct RevocationRecord<R> {
    pub registered: bool,
    pub revoked: bool,
    pub reason: R,
    pub registered_at: BlockTime,
    pub revoked_at: Option<BlockTime>,
}

impl<R: RevocationReason> RevocationRecord<R> {
    pub(crate) fn registered_at(time: BlockTime) -> Self {
        Self {
            registered: true,
            revoked: false,
            reason: R::NONE,
            registered_at: time,
            revoked_at: None,
        }
    }

    pub(crate) fn revoke(&mut self, reason: R, time: BlockTime) {
        self.revoked = true;
        self.reason = reason;
        self.revoked_at = Some(time);
    }

    pub fn is_valid(&self) -> bool {
        self.registered && !self.revoked
    }
}

/// Aggregate status read; safe for unknown identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "R: RevocationReason")]
pub struct RevocationStatus<R> {
    pub exists: bool,
    pub valid: bool,
    pub reason: R,
}

impl<R: RevocationReason> RevocationStatus<R> {
    /// Status reported for an identifier that was never registered.
    pub fn unknown() -> Self {
        Self {
            exists: false,
            valid: false,
            reason: R::NONE,
        }
    }
}
