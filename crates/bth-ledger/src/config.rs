use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use bth_chain::{Clock, ManualClock, SystemClock};
use bth_types::BlockTime;

use crate::error::{LedgerError, LedgerResult};

/// Content category of a deployment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    #[default]
    Document,
    Image,
    Dataset,
}

impl CategoryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Image => "image",
            Self::Dataset => "dataset",
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "document" | "doc" => Ok(Self::Document),
            "image" | "img" => Ok(Self::Image),
            "dataset" | "ds" => Ok(Self::Dataset),
            other => Err(LedgerError::UnknownCategory(other.to_string())),
        }
    }
}

/// Where block timestamps come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockKind {
    #[default]
    System,
    /// Fixed at `manual_time`; for reproducible runs.
    Manual,
}

impl FromStr for ClockKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "system" => Ok(Self::System),
            "manual" => Ok(Self::Manual),
            other => Err(LedgerError::UnknownClock(other.to_string())),
        }
    }
}

/// Ledger configuration, read from TOML.
///
/// ```toml
/// category = "dataset"
/// state_file = "registry.json"
/// clock = "manual"
/// manual_time = 1700000000
/// log_level = "debug"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Category used by `deploy` when none is given.
    pub category: CategoryKind,
    /// Persisted deployment state.
    pub state_file: PathBuf,
    pub clock: ClockKind,
    /// Start time of the manual clock, in seconds.
    pub manual_time: u64,
    /// `tracing` filter level.
    pub log_level: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            category: CategoryKind::Document,
            state_file: PathBuf::from("bth-state.json"),
            clock: ClockKind::System,
            manual_time: 1_700_000_000,
            log_level: "info".into(),
        }
    }
}

impl LedgerConfig {
    pub fn from_toml_str(s: &str) -> LedgerResult<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> LedgerResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> LedgerResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| LedgerError::io(path, e))?;
        Self::from_toml_str(&text)
    }

    /// Load `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> LedgerResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Build the configured clock.
    pub fn clock(&self) -> Arc<dyn Clock> {
        match self.clock {
            ClockKind::System => Arc::new(SystemClock),
            ClockKind::Manual => Arc::new(ManualClock::new(BlockTime::from_secs(self.manual_time))),
        }
    }
}
