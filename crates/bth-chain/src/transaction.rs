//! Transactions and call frames.
//!
//! A [`Transaction`] is the explicit context passed to every state
//! transition. Its `sender` is the immediate caller: the externally owned
//! account at the top level, or the calling contract inside a nested
//! [`Transaction::call`]. Events buffer inside the transaction until the
//! caller decides the whole unit of work succeeded.

use bth_types::{Address, BlockTime};

use crate::error::Result;
use crate::event::{Event, PendingEvent};

/// Marker into a transaction's event buffer; see [`Transaction::revert_to`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// Execution context for one atomic unit of work.
#[derive(Debug)]
pub struct Transaction {
    origin: Address,
    sender: Address,
    block_time: BlockTime,
    depth: usize,
    events: Vec<PendingEvent>,
}

impl Transaction {
    /// Start a transaction submitted by `origin` in a block stamped `block_time`.
    pub fn new(origin: Address, block_time: BlockTime) -> Self {
        Self {
            origin,
            sender: origin,
            block_time,
            depth: 0,
            events: Vec::new(),
        }
    }

    /// The account that submitted the transaction.
    pub fn origin(&self) -> Address {
        self.origin
    }

    /// The immediate caller of the currently executing contract.
    pub fn sender(&self) -> Address {
        self.sender
    }

    pub fn block_time(&self) -> BlockTime {
        self.block_time
    }

    /// Nesting depth of the current call frame (0 at the top level).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Run `f` as a nested call made by contract `caller`.
    ///
    /// Inside `f`, [`sender`](Self::sender) is `caller`; the previous sender
    /// is restored when `f` returns, whatever its result.
    pub fn call<T>(&mut self, caller: Address, f: impl FnOnce(&mut Self) -> T) -> T {
        let previous = std::mem::replace(&mut self.sender, caller);
        self.depth += 1;
        let out = f(self);
        self.depth -= 1;
        self.sender = previous;
        out
    }

    /// Buffer an event emitted by `emitter`.
    pub fn emit<E: Event>(&mut self, emitter: Address, event: &E) -> Result<()> {
        let payload = event.encode()?;
        self.events.push(PendingEvent {
            emitter,
            name: event.name().to_string(),
            payload,
            block_time: self.block_time,
        });
        Ok(())
    }

    /// Mark the current end of the event buffer.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.events.len())
    }

    /// Discard every event buffered after `checkpoint`.
    pub fn revert_to(&mut self, checkpoint: Checkpoint) {
        self.events.truncate(checkpoint.0);
    }

    /// Events buffered so far.
    pub fn events(&self) -> &[PendingEvent] {
        &self.events
    }

    /// Finish the transaction, yielding its buffered events.
    pub fn into_events(self) -> Vec<PendingEvent> {
        self.events
    }
}
