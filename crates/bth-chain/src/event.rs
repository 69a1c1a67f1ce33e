use serde::{Deserialize, Serialize};

use bth_types::{Address, BlockTime};

use crate::error::{ChainError, Result};

/// A state-transition notice emitted by a contract.
///
/// Events are encoded to JSON when emitted. The emitting contract's event
/// type is the decoding schema, so an offline reader can reconstruct history
/// with [`LogEntry::decode`](crate::LogEntry::decode) without touching live
/// state.
pub trait Event: Serialize {
    /// Stable event name, e.g. `"Revoked"`.
    fn name(&self) -> &'static str;

    /// Encode this event into a log payload.
    fn encode(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| ChainError::Encode {
            name: self.name(),
            reason: e.to_string(),
        })
    }
}

/// An event buffered inside a transaction, not yet part of the log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEvent {
    /// Contract that emitted the event.
    pub emitter: Address,
    /// Event name.
    pub name: String,
    /// Encoded event body.
    pub payload: serde_json::Value,
    /// Block time of the emitting transaction.
    pub block_time: BlockTime,
}
