//! Normalized session events.

use std::collections::BTreeMap;

/// Terminal control requested by the remote shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Wipe everything displayed so far.
    Clear,
}

/// One unit of information consumed by the session controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    /// Text to append to the session output.
    Output(String),
    /// Full replacement snapshot of the execution context.
    Environment(BTreeMap<String, String>),
    /// Terminal control command.
    Control(ControlCommand),
    /// The remote command process has started with this pid.
    Pid(u32),
    /// The remote command process has exited with this status.
    Exit(i64),
}

impl ShellEvent {
    /// Output text carried by this event, if any.
    pub fn output(&self) -> Option<&str> {
        match self {
            ShellEvent::Output(text) => Some(text),
            _ => None,
        }
    }
}
