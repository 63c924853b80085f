//! Shell client: named actions against the remote shell endpoint.
//!
//! Every call takes the session's [`ExecutionContext`] explicitly. It is
//! sent with the request, and calls that consume their response update it
//! from any environment snapshot the shell reports.
//!
//! # Example
//!
//! ```no_run
//! use shell_relay::client::ShellClient;
//! use shell_relay::session::ExecutionContext;
//! use shell_relay::transport::HttpTransport;
//!
//! #[tokio::main]
//! async fn main() -> shell_relay::Result<()> {
//!     let client = ShellClient::new(HttpTransport::new("http://127.0.0.1:8080/shell")?);
//!     let mut context = ExecutionContext::new();
//!
//!     let banner = client.init(&mut context).await?;
//!     let output = client.execute_collected(&mut context, "ls").await?;
//!     print!("{banner}{}", output.text);
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::protocol::{CommandOutput, EventStream, Normalizer, ShellRequest, StreamPrecedence};
use crate::session::ExecutionContext;
use crate::transport::{RecordStream, Transport};
use crate::Result;

/// Client for the remote shell's action protocol.
pub struct ShellClient<T> {
    transport: Arc<T>,
    normalizer: Normalizer,
}

impl<T: Transport> ShellClient<T> {
    /// Create a client with the default stream precedence.
    pub fn new(transport: T) -> Self {
        Self::with_precedence(transport, StreamPrecedence::default())
    }

    pub fn with_precedence(transport: T, precedence: StreamPrecedence) -> Self {
        Self {
            transport: Arc::new(transport),
            normalizer: Normalizer::new(precedence),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a request and open its event stream.
    pub async fn open(
        &self,
        context: &ExecutionContext,
        request: &ShellRequest,
    ) -> Result<EventStream> {
        debug!(action = %request.action, "opening shell request");
        let body = self.transport.post(context, request.to_body()).await?;
        Ok(EventStream::new(RecordStream::new(body), self.normalizer))
    }

    /// Fetch the banner/prompt text.
    pub async fn init(&self, context: &mut ExecutionContext) -> Result<String> {
        self.open(context, &ShellRequest::init())
            .await?
            .collect_output(context)
            .await
    }

    /// Start a command and return its live event stream.
    pub async fn execute(&self, context: &ExecutionContext, command: &str) -> Result<EventStream> {
        self.open(context, &ShellRequest::execute(command)).await
    }

    /// Run a command to completion and return its concatenated output
    /// and exit status.
    pub async fn execute_collected(
        &self,
        context: &mut ExecutionContext,
        command: &str,
    ) -> Result<CommandOutput> {
        self.execute(context, command)
            .await?
            .collect(context)
            .await
    }

    /// Ask for completion candidates of a partial input line.
    ///
    /// Output that is not a JSON array of strings means no candidates.
    pub async fn completion(
        &self,
        context: &mut ExecutionContext,
        partial: &str,
    ) -> Result<Vec<String>> {
        let text = self
            .open(context, &ShellRequest::completion(partial))
            .await?
            .collect_output(context)
            .await?;

        match serde_json::from_str::<Vec<String>>(text.trim()) {
            Ok(candidates) => Ok(candidates),
            Err(e) => {
                warn!(error = %e, "completion output is not a candidate list");
                Ok(Vec::new())
            }
        }
    }

    /// Best-effort interrupt of a remote process.
    ///
    /// The request is sent from a background task and the call returns
    /// at once. Failures are logged and dropped: the target may already
    /// have exited. Must be called within a tokio runtime.
    pub fn signal(
        &self,
        context: &ExecutionContext,
        name: &str,
        pid: Option<u32>,
    ) -> JoinHandle<()> {
        let transport = Arc::clone(&self.transport);
        let context = context.clone();
        let name = name.to_string();
        let body = ShellRequest::signal(&name, pid).to_body();

        tokio::spawn(async move {
            match transport.post(&context, body).await {
                Ok(_) => debug!(signal = %name, ?pid, "signal delivered"),
                Err(e) => debug!(signal = %name, ?pid, error = %e, "signal failed"),
            }
        })
    }
}
