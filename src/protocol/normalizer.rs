//! Second framing stage: inner shell-output lines to [`ShellEvent`]s.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::event::{ControlCommand, ShellEvent};
use crate::transport::TransportRecord;

/// Which payload field is authoritative when a record carries both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamPrecedence {
    /// `stderr` wins when present, otherwise `stdout` is used.
    #[default]
    Stderr,
    /// Only `stdout` is ever read.
    Stdout,
}

impl FromStr for StreamPrecedence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stderr" => Ok(Self::Stderr),
            "stdout" => Ok(Self::Stdout),
            other => Err(format!("unknown stream precedence: {other}")),
        }
    }
}

impl fmt::Display for StreamPrecedence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stderr => f.write_str("stderr"),
            Self::Stdout => f.write_str("stdout"),
        }
    }
}

/// One inner JSON line of a `stdout`/`stderr` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InnerRecord {
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub environment: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub term_command: Option<String>,
}

impl InnerRecord {
    /// Collapse the record into a single event.
    ///
    /// A line naming several fields yields the first of `term_command`,
    /// `environment`, `output`. Unknown terminal commands and empty
    /// objects yield nothing.
    pub fn into_event(self) -> Option<ShellEvent> {
        let fields = [
            self.term_command.is_some(),
            self.environment.is_some(),
            self.output.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count();
        if fields > 1 {
            debug!("inner line carries {} fields, keeping one", fields);
        }

        if let Some(command) = self.term_command {
            return match command.as_str() {
                "clear" => Some(ShellEvent::Control(ControlCommand::Clear)),
                other => {
                    warn!(command = %other, "ignoring unknown terminal command");
                    None
                }
            };
        }
        if let Some(environment) = self.environment {
            return Some(ShellEvent::Environment(environment));
        }
        self.output.map(ShellEvent::Output)
    }
}

/// Flattens outer records into session events.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    precedence: StreamPrecedence,
}

impl Normalizer {
    pub fn new(precedence: StreamPrecedence) -> Self {
        Self { precedence }
    }

    pub fn precedence(&self) -> StreamPrecedence {
        self.precedence
    }

    /// Pick the authoritative payload of a record.
    pub fn select<'a>(&self, record: &'a TransportRecord) -> Option<&'a str> {
        match self.precedence {
            StreamPrecedence::Stderr => record.stderr.as_deref().or(record.stdout.as_deref()),
            StreamPrecedence::Stdout => record.stdout.as_deref(),
        }
    }

    /// Normalize one outer record.
    ///
    /// A record with neither `stdout` nor `stderr` but a `pid` announces
    /// the process start. An `exit_code` follows any output of the same
    /// record. Unparseable inner lines are skipped.
    pub fn normalize(&self, record: &TransportRecord) -> Vec<ShellEvent> {
        let mut events = Vec::new();

        if !record.has_output() {
            events.extend(record.pid.map(ShellEvent::Pid));
        } else if let Some(payload) = self.select(record) {
            events.extend(
                payload
                    .split('\n')
                    .filter(|line| !line.trim().is_empty())
                    .filter_map(|line| match serde_json::from_str::<InnerRecord>(line) {
                        Ok(inner) => inner.into_event(),
                        Err(e) => {
                            warn!(error = %e, line = %line, "skipping malformed shell output line");
                            None
                        }
                    }),
            );
        }

        events.extend(record.exit_code.map(ShellEvent::Exit));
        events
    }
}
