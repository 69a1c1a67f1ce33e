use std::path::PathBuf;

use thiserror::Error;

use bth_chain::ChainError;
use bth_revocation::RevocationError;
use bth_types::TypeError;
use bth_verification::VerificationError;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("verification error: {0}")]
    Verification(#[from] VerificationError),

    #[error("revocation error: {0}")]
    Revocation(#[from] RevocationError),

    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("invalid value: {0}")]
    Type(#[from] TypeError),

    /// A reason string that is neither a code nor a label of the category.
    #[error("unknown {category} revocation reason: {input}")]
    UnknownReason {
        category: &'static str,
        input: String,
    },

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown clock: {0}")]
    UnknownClock(String),

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("state file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
}

impl LedgerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
