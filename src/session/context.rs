//! Execution context threaded through every shell request.

use std::collections::BTreeMap;

/// Key under which the remote shell reports its working directory.
pub const CWD_KEY: &str = "CWD";

/// Execution context for a shell session.
///
/// The remote shell is stateless between requests: working directory and
/// variables live here, are sent with every call as query parameters, and
/// are replaced wholesale whenever the shell reports a new snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    vars: BTreeMap<String, String>,
}

impl ExecutionContext {
    /// Create a new empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context from an initial set of variables.
    pub fn with_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// All variables, in key order.
    pub fn vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }

    /// Get a specific variable.
    pub fn get_var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(|s| s.as_str())
    }

    /// Set a variable.
    pub fn set_var(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Remove a variable.
    pub fn remove_var(&mut self, key: &str) -> Option<String> {
        self.vars.remove(key)
    }

    /// Replace the whole context with a new snapshot.
    pub fn replace(&mut self, vars: BTreeMap<String, String>) {
        self.vars = vars;
    }

    /// The working directory reported by the shell.
    pub fn cwd(&self) -> Option<&str> {
        self.get_var(CWD_KEY)
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
