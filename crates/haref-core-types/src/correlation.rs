//! Run identifiers for correlating log output
//!
//! `validate` tags its start and end events with a fresh `RunId`, which is
//! how the events of one document's run are told apart when several
//! documents are validated in the same process. Findings never carry it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Time-ordered identifier of one validation run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// UUIDv7, so ids sort by creation time in collected logs
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for RunId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
