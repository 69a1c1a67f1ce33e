//! History reconstruction from the event log, and audits against live state.
//!
//! Nothing here reads registry state to build a history: every fact comes
//! from decoding committed log entries with the emitting contract's event
//! type. The audit then compares those facts with the live registries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use tracing::warn;

use bth_chain::{ChainError, EventLog, LogEntry};
use bth_revocation::{RevocationEvent, RevocationReason, RevocationRegistry};
use bth_types::{Address, BlockTime, Bytes32};
use bth_verification::{Category, VerificationEvent, VerificationRegistry};

/// Everything the log says about one id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdHistory {
    pub id: Bytes32,
    /// From the verification registry's `Registered` event.
    pub registered_at: Option<BlockTime>,
    pub issuer: Option<Address>,
    pub content_hash: Option<Bytes32>,
    /// From the revocation registry's `Registered`/`BatchRegistered` event.
    pub revocation_registered_at: Option<BlockTime>,
    pub revoked: Option<Revoked>,
}

impl IdHistory {
    pub fn new(id: Bytes32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Whether the log mentions the id at all.
    pub fn is_known(&self) -> bool {
        self.registered_at.is_some() || self.revocation_registered_at.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revoked {
    pub code: u8,
    pub reason: String,
    pub at: BlockTime,
}

/// A log entry from one of the deployment's contracts that does not decode
/// as that contract's event type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Undecodable {
    pub seq: u64,
    pub name: String,
    pub reason: String,
}

/// Output of [`replay`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Replay {
    pub histories: BTreeMap<Bytes32, IdHistory>,
    /// Entries skipped during replay, in log order.
    pub undecodable: Vec<Undecodable>,
}

/// Rebuild every id's history from the log entries of one deployment.
///
/// Entries that fail to decode are collected rather than ending the replay.
pub fn replay<C: Category>(log: &EventLog, verification: Address, revocation: Address) -> Replay {
    let mut out = Replay::default();
    let histories = &mut out.histories;
    for entry in log.entries() {
        if entry.emitter == verification {
            let event = match entry.decode::<VerificationEvent<C::Fields>>() {
                Ok(event) => event,
                Err(err) => {
                    out.undecodable.push(undecodable(entry, err));
                    continue;
                }
            };
            if let VerificationEvent::Registered {
                id,
                content_hash,
                issuer,
                timestamp,
                ..
            } = event
            {
                let h = at(histories, id);
                h.registered_at = Some(timestamp);
                h.issuer = Some(issuer);
                h.content_hash = Some(content_hash);
            }
        } else if entry.emitter == revocation {
            let event = match entry.decode::<RevocationEvent<C::Reason>>() {
                Ok(event) => event,
                Err(err) => {
                    out.undecodable.push(undecodable(entry, err));
                    continue;
                }
            };
            match event {
                RevocationEvent::Registered { id, timestamp } => {
                    at(histories, id).revocation_registered_at = Some(timestamp);
                }
                RevocationEvent::BatchRegistered { ids, timestamp } => {
                    for id in ids {
                        at(histories, id).revocation_registered_at = Some(timestamp);
                    }
                }
                RevocationEvent::Revoked {
                    id,
                    reason,
                    timestamp,
                } => {
                    at(histories, id).revoked = Some(revoked(reason, timestamp));
                }
                RevocationEvent::BatchRevoked {
                    ids,
                    reason,
                    timestamp,
                } => {
                    for id in ids {
                        at(histories, id).revoked = Some(revoked(reason, timestamp));
                    }
                }
                RevocationEvent::VerificationContractSet { .. } => {}
            }
        }
    }
    out
}

fn undecodable(entry: &LogEntry, err: ChainError) -> Undecodable {
    warn!(seq = entry.seq, name = %entry.name, error = %err, "skipping undecodable log entry");
    Undecodable {
        seq: entry.seq,
        name: entry.name.clone(),
        reason: err.to_string(),
    }
}

fn at(histories: &mut BTreeMap<Bytes32, IdHistory>, id: Bytes32) -> &mut IdHistory {
    histories.entry(id).or_insert_with(|| IdHistory::new(id))
}

fn revoked<R: RevocationReason>(reason: R, at: BlockTime) -> Revoked {
    Revoked {
        code: reason.code(),
        reason: reason.label().to_string(),
        at,
    }
}

/// A disagreement between the log and live state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    pub id: Bytes32,
    pub description: String,
}

/// Result of [`audit`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub entries: usize,
    /// Set when the hash chain fails to verify; no cross-check is done then.
    pub chain_error: Option<String>,
    pub ids_checked: usize,
    pub undecodable: Vec<Undecodable>,
    pub discrepancies: Vec<Discrepancy>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.chain_error.is_none() && self.undecodable.is_empty() && self.discrepancies.is_empty()
    }
}

/// Verify the log's hash chain and cross-check every reconstructed history
/// against the live registries.
pub fn audit<C: Category>(
    log: &EventLog,
    revocation: &RevocationRegistry<C::Reason>,
    verification: &VerificationRegistry<C>,
) -> AuditReport {
    let mut report = AuditReport {
        entries: log.len(),
        chain_error: None,
        ids_checked: 0,
        undecodable: Vec::new(),
        discrepancies: Vec::new(),
    };
    if let Err(err) = log.verify() {
        report.chain_error = Some(err.to_string());
        return report;
    }

    let Replay {
        histories,
        undecodable,
    } = replay::<C>(log, verification.address(), revocation.address());
    report.undecodable = undecodable;
    let mut flag = |id: Bytes32, description: String| {
        report.discrepancies.push(Discrepancy { id, description });
    };

    for record in verification.records() {
        let id = record.id;
        let empty = IdHistory::new(id);
        let history = histories.get(&id).unwrap_or(&empty);

        if history.registered_at != Some(record.registered_at) {
            flag(id, "registration time differs from log".into());
        }
        if history.content_hash != Some(record.content_hash) {
            flag(id, "content hash differs from log".into());
        }
        if history.issuer != Some(record.issuer) {
            flag(id, "issuer differs from log".into());
        }
        if history.revocation_registered_at.is_none() {
            flag(id, "no revocation-side registration in log".into());
        }

        let live = revocation.record(&id);
        match (live, &history.revoked) {
            (Some(live), Some(logged)) if live.revoked => {
                if live.reason.code() != logged.code {
                    flag(
                        id,
                        format!("revocation reason {} differs from log {}", live.reason, logged.reason),
                    );
                }
                if live.revoked_at != Some(logged.at) {
                    flag(id, "revocation time differs from log".into());
                }
            }
            (Some(live), None) if live.revoked => flag(id, "revoked without a logged revocation".into()),
            (_, Some(_)) => flag(id, "logged revocation not reflected in state".into()),
            (None, None) => flag(id, "missing from revocation registry".into()),
            _ => {}
        }
    }

    for (id, _) in revocation.records() {
        if !verification.exists(id) {
            flag(*id, "registered for revocation without a verification record".into());
        }
    }
    for id in histories.keys() {
        if !verification.exists(id) {
            flag(*id, "logged id missing from live state".into());
        }
    }

    report.ids_checked = verification.count();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use bth_chain::{ManualClock, PendingEvent};
    use bth_verification::{Dataset, DatasetFields, DatasetReason, Registration};

    use crate::Deployment;

    fn deployment() -> Deployment<Dataset> {
        let owner = Address::derive("owner");
        let clock = Arc::new(ManualClock::new(BlockTime::from_secs(1_700_000_000)));
        let mut d = Deployment::deploy(owner, Address::derive("admin"), clock).unwrap();
        let fields = DatasetFields {
            dataset_type: "tabular".into(),
        };
        let id = Bytes32::from_label("DS-1");
        d.register(owner, Registration::new(id, Bytes32::digest(b"rows"), "ipfs://ds", fields))
            .unwrap();
        d.revoke(owner, id, DatasetReason::Outdated).unwrap();
        d
    }

    #[test]
    fn undecodable_entry_is_reported_not_fatal() {
        let d = deployment();
        let mut log = d.log().clone();
        log.commit(vec![PendingEvent {
            emitter: d.verification().address(),
            name: "Bogus".into(),
            payload: serde_json::json!({ "event": "Bogus" }),
            block_time: BlockTime::from_secs(1_700_000_100),
        }]);

        let replayed = replay::<Dataset>(&log, d.verification().address(), d.revocation().address());
        assert_eq!(replayed.undecodable.len(), 1);
        assert_eq!(replayed.undecodable[0].name, "Bogus");
        assert_eq!(replayed.undecodable[0].seq, log.len() as u64);
        let id = Bytes32::from_label("DS-1");
        assert_eq!(replayed.histories[&id].revoked.as_ref().unwrap().reason, "OUTDATED");

        let report = audit::<Dataset>(&log, d.revocation(), d.verification());
        assert!(report.chain_error.is_none());
        assert_eq!(report.undecodable.len(), 1);
        assert!(report.discrepancies.is_empty());
        assert_eq!(report.ids_checked, 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn clean_log_has_nothing_undecodable() {
        let d = deployment();
        let report = audit::<Dataset>(d.log(), d.revocation(), d.verification());
        assert!(report.undecodable.is_empty());
        assert!(report.is_clean());
    }
}
