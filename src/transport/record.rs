//! Outer transport record.

use serde::{Deserialize, Serialize};

/// One outer JSON object, as produced by the endpoint for each line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
}

impl TransportRecord {
    /// Parse a single line of decoded text.
    pub fn parse(line: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(line)?)
    }

    /// Whether the record carries any shell output payload.
    pub fn has_output(&self) -> bool {
        self.stdout.is_some() || self.stderr.is_some()
    }
}
