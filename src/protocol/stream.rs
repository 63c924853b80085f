//! Pull-based stream of session events for one request.

use std::collections::VecDeque;

use tracing::debug;

use super::event::ShellEvent;
use super::normalizer::Normalizer;
use crate::session::ExecutionContext;
use crate::transport::RecordStream;
use crate::Result;

/// Everything a finished command produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Concatenated output text.
    pub text: String,
    /// Last exit status the shell reported, if any.
    pub exit_code: Option<i64>,
}

impl CommandOutput {
    /// Exit status for the local process: `0` when none was reported,
    /// `1` when the remote status does not fit a byte.
    pub fn status_code(&self) -> u8 {
        match self.exit_code {
            None => 0,
            Some(code) => u8::try_from(code).unwrap_or(1),
        }
    }
}

/// Live events of one shell request.
///
/// Environment snapshots are applied to the caller's context as they are
/// pulled, and still handed out so the caller can observe them.
pub struct EventStream {
    records: RecordStream,
    normalizer: Normalizer,
    ready: VecDeque<ShellEvent>,
}

impl EventStream {
    pub fn new(records: RecordStream, normalizer: Normalizer) -> Self {
        Self {
            records,
            normalizer,
            ready: VecDeque::new(),
        }
    }

    /// Pull the next event, awaiting transport chunks as needed.
    pub async fn next(&mut self, context: &mut ExecutionContext) -> Option<Result<ShellEvent>> {
        loop {
            if let Some(event) = self.ready.pop_front() {
                if let ShellEvent::Environment(vars) = &event {
                    debug!("environment snapshot: {} vars", vars.len());
                    context.replace(vars.clone());
                }
                return Some(Ok(event));
            }

            match self.records.next().await? {
                Ok(record) => self.ready.extend(self.normalizer.normalize(&record)),
                Err(e) => return Some(Err(e)),
            }
        }
    }

    /// Drain the stream, concatenating every output event and keeping the
    /// last exit status.
    pub async fn collect(mut self, context: &mut ExecutionContext) -> Result<CommandOutput> {
        let mut output = CommandOutput::default();
        while let Some(event) = self.next(context).await {
            match event? {
                ShellEvent::Output(chunk) => output.text.push_str(&chunk),
                ShellEvent::Exit(code) => output.exit_code = Some(code),
                _ => {}
            }
        }
        Ok(output)
    }

    /// Drain the stream, concatenating every output event.
    pub async fn collect_output(self, context: &mut ExecutionContext) -> Result<String> {
        Ok(self.collect(context).await?.text)
    }
}
