//! Append-only, hash-linked event log.
//!
//! Each [`LogEntry`] commits to its sequence number, block time, emitter,
//! event name, payload, and the hash of the entry before it. Editing or
//! dropping any entry breaks every hash after it, which [`EventLog::verify`]
//! reports with the sequence number of the first bad entry.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use bth_types::{Address, BlockTime};

use crate::error::{ChainError, Result};
use crate::event::PendingEvent;

/// A committed event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Position in the log, starting at 1.
    pub seq: u64,
    /// Block time of the transaction that emitted the event.
    pub block_time: BlockTime,
    /// Contract that emitted the event.
    pub emitter: Address,
    /// Event name.
    pub name: String,
    /// Encoded event body.
    pub payload: serde_json::Value,
    /// Hash of the previous entry (zero for the first entry).
    #[serde(with = "hex_array")]
    pub prev_hash: [u8; 32],
    /// Hash over this entry's content and `prev_hash`.
    #[serde(with = "hex_array")]
    pub entry_hash: [u8; 32],
}

impl LogEntry {
    fn seal(seq: u64, prev_hash: [u8; 32], event: PendingEvent) -> Self {
        let entry_hash = compute_entry_hash(
            seq,
            &event.block_time,
            &event.emitter,
            &event.name,
            &event.payload,
            &prev_hash,
        );
        Self {
            seq,
            block_time: event.block_time,
            emitter: event.emitter,
            name: event.name,
            payload: event.payload,
            prev_hash,
            entry_hash,
        }
    }

    /// Recompute the hash and compare it with the stored one.
    pub fn verify_hash(&self) -> bool {
        compute_entry_hash(
            self.seq,
            &self.block_time,
            &self.emitter,
            &self.name,
            &self.payload,
            &self.prev_hash,
        ) == self.entry_hash
    }

    /// Decode the payload with the emitting contract's event type.
    pub fn decode<E: DeserializeOwned>(&self) -> Result<E> {
        serde_json::from_value(self.payload.clone()).map_err(|e| ChainError::Decode {
            name: self.name.clone(),
            reason: e.to_string(),
        })
    }

    /// Short hex form of the entry hash.
    pub fn short_hash(&self) -> String {
        hex::encode(&self.entry_hash[..4])
    }
}

/// Append-only log of committed events.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    entries: Vec<LogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a successful transaction's events in emission order.
    ///
    /// Returns the sequence numbers assigned to them.
    pub fn commit(&mut self, events: Vec<PendingEvent>) -> std::ops::RangeInclusive<u64> {
        let first = self.next_seq();
        for event in events {
            let seq = self.next_seq();
            let entry = LogEntry::seal(seq, self.head_hash(), event);
            debug!(seq, name = %entry.name, emitter = %entry.emitter, "event committed");
            self.entries.push(entry);
        }
        first..=self.next_seq() - 1
    }

    /// Check sequence numbers, hash links, and every entry hash.
    pub fn verify(&self) -> Result<()> {
        let mut prev = [0u8; 32];
        for (index, entry) in self.entries.iter().enumerate() {
            let expected_seq = index as u64 + 1;
            if entry.seq != expected_seq {
                return Err(ChainError::IntegrityViolation {
                    seq: entry.seq,
                    reason: format!("expected seq {expected_seq}, found {}", entry.seq),
                });
            }
            if entry.prev_hash != prev {
                return Err(ChainError::IntegrityViolation {
                    seq: entry.seq,
                    reason: "previous hash link mismatch".into(),
                });
            }
            if !entry.verify_hash() {
                return Err(ChainError::IntegrityViolation {
                    seq: entry.seq,
                    reason: "entry hash mismatch".into(),
                });
            }
            prev = entry.entry_hash;
        }
        Ok(())
    }

    /// Hash of the newest entry, or zero when empty.
    pub fn head_hash(&self) -> [u8; 32] {
        self.entries.last().map(|e| e.entry_hash).unwrap_or([0u8; 32])
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries emitted by a given contract.
    pub fn by_emitter<'a>(&'a self, emitter: &'a Address) -> impl Iterator<Item = &'a LogEntry> {
        self.entries.iter().filter(move |e| &e.emitter == emitter)
    }

    /// Entries with a given event name.
    pub fn by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a LogEntry> {
        self.entries.iter().filter(move |e| e.name == name)
    }

    fn next_seq(&self) -> u64 {
        self.entries.len() as u64 + 1
    }
}

fn compute_entry_hash(
    seq: u64,
    block_time: &BlockTime,
    emitter: &Address,
    name: &str,
    payload: &serde_json::Value,
    prev_hash: &[u8; 32],
) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"bth-log-entry-v1:");
    hasher.update(&seq.to_le_bytes());
    hasher.update(&block_time.as_secs().to_le_bytes());
    hasher.update(emitter.as_bytes());
    hasher.update(&(name.len() as u64).to_le_bytes());
    hasher.update(name.as_bytes());
    // serde_json::Value keeps object keys sorted, so this encoding is stable.
    hasher.update(payload.to_string().as_bytes());
    hasher.update(prev_hash);
    *hasher.finalize().as_bytes()
}

mod hex_array {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("expected 32 bytes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pending(name: &str, n: u64) -> PendingEvent {
        PendingEvent {
            emitter: Address::derive("registry"),
            name: name.into(),
            payload: json!({ "n": n }),
            block_time: BlockTime::from_secs(1_000 + n),
        }
    }

    fn log_with(n: u64) -> EventLog {
        let mut log = EventLog::new();
        log.commit((1..=n).map(|i| pending("Registered", i)).collect());
        log
    }

    #[test]
    fn commit_assigns_consecutive_sequence_numbers() {
        let mut log = EventLog::new();
        let first = log.commit(vec![pending("A", 1), pending("B", 2)]);
        assert_eq!(first, 1..=2);
        let second = log.commit(vec![pending("C", 3)]);
        assert_eq!(second, 3..=3);
        assert_eq!(log.len(), 3);
        assert_eq!(log.entries()[2].prev_hash, log.entries()[1].entry_hash);
    }

    #[test]
    fn empty_commit_appends_nothing() {
        let mut log = log_with(2);
        let head = log.head_hash();
        let range = log.commit(Vec::new());
        assert!(range.is_empty());
        assert_eq!(log.len(), 2);
        assert_eq!(log.head_hash(), head);
    }

    #[test]
    fn fresh_log_verifies() {
        assert!(EventLog::new().verify().is_ok());
        assert!(log_with(5).verify().is_ok());
    }

    #[test]
    fn tampered_payload_is_detected() {
        let mut log = log_with(3);
        log.entries[1].payload = json!({ "n": 99 });
        let err = log.verify().unwrap_err();
        assert_eq!(
            err,
            ChainError::IntegrityViolation {
                seq: 2,
                reason: "entry hash mismatch".into()
            }
        );
    }

    #[test]
    fn dropped_entry_is_detected() {
        let mut log = log_with(3);
        log.entries.remove(1);
        assert!(matches!(
            log.verify(),
            Err(ChainError::IntegrityViolation { seq: 3, .. })
        ));
    }

    #[test]
    fn filters_by_emitter_and_name() {
        let mut log = log_with(2);
        let other = Address::derive("other");
        log.commit(vec![PendingEvent {
            emitter: other,
            name: "Revoked".into(),
            payload: json!({}),
            block_time: BlockTime::from_secs(5),
        }]);
        assert_eq!(log.by_emitter(&other).count(), 1);
        assert_eq!(log.by_name("Registered").count(), 2);
        assert_eq!(log.by_name("Missing").count(), 0);
    }

    #[test]
    fn decode_reports_schema_mismatch() {
        let log = log_with(1);
        let decoded: serde_json::Value = log.entries()[0].decode().unwrap();
        assert_eq!(decoded, json!({ "n": 1 }));
        let err = log.entries()[0].decode::<Vec<u8>>().unwrap_err();
        assert!(matches!(err, ChainError::Decode { .. }));
    }

    #[test]
    fn serde_roundtrip_keeps_chain_valid() {
        let log = log_with(4);
        let json = serde_json::to_string(&log).unwrap();
        let parsed: EventLog = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, log);
        assert!(parsed.verify().is_ok());
    }
}
