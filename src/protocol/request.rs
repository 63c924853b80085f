//! Request envelope sent to the shell endpoint.

use std::fmt;

use serde_json::Value;

/// Named actions understood by the remote shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Init,
    Execute,
    Completion,
    Signal,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Init => "init",
            Action::Execute => "execute",
            Action::Completion => "completion",
            Action::Signal => "signal",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action plus its positional parameters.
///
/// Serialized as the JSON array `[action, ...parameters]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellRequest {
    pub action: Action,
    pub params: Vec<Value>,
}

impl ShellRequest {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            params: Vec::new(),
        }
    }

    pub fn init() -> Self {
        Self::new(Action::Init)
    }

    pub fn execute(command: impl Into<String>) -> Self {
        Self::new(Action::Execute).param(command.into())
    }

    pub fn completion(partial: impl Into<String>) -> Self {
        Self::new(Action::Completion).param(partial.into())
    }

    pub fn signal(name: impl Into<String>, pid: Option<u32>) -> Self {
        let request = Self::new(Action::Signal).param(name.into());
        match pid {
            Some(pid) => request.param(pid),
            None => request,
        }
    }

    /// Append a positional parameter.
    pub fn param(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }

    /// Encode the request body.
    pub fn to_body(&self) -> String {
        let mut items = Vec::with_capacity(self.params.len() + 1);
        items.push(Value::from(self.action.as_str()));
        items.extend(self.params.iter().cloned());
        Value::Array(items).to_string()
    }
}
