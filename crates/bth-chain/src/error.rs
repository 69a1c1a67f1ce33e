/// Errors produced by the execution substrate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    /// The event log failed an integrity check.
    #[error("integrity violation at seq {seq}: {reason}")]
    IntegrityViolation { seq: u64, reason: String },

    /// An event could not be encoded into a log payload.
    #[error("failed to encode event {name}: {reason}")]
    Encode { name: &'static str, reason: String },

    /// A log payload could not be decoded as the requested event type.
    #[error("failed to decode event {name}: {reason}")]
    Decode { name: String, reason: String },
}

/// Convenience alias used throughout the chain crate.
pub type Result<T> = std::result::Result<T, ChainError>;
