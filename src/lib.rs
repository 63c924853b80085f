//! # shell-relay
//!
//! Streaming terminal session client for remote JSON-lines shell endpoints.
//!
//! A remote shell executable is driven over HTTP POST: each request names an
//! action (`init`, `execute`, `completion`, `signal`) and the response body is
//! a stream of JSON lines carrying nested output, environment snapshots and
//! terminal control commands. This crate decodes that stream incrementally
//! and runs an interactive terminal session on top of it.
//!
//! ## Features
//!
//! - **Incremental decoding**: records are produced as bytes arrive,
//!   independent of chunk boundaries
//! - **Explicit context**: the environment map travels with every request
//!   and is replaced by snapshots the shell reports
//! - **Session controller**: line editing, history, completion, and input
//!   queued while a command runs
//! - **Pluggable transport**: anything implementing [`Transport`] can stand
//!   in for HTTP
//!
//! ## Quick Start
//!
//! ```no_run
//! use shell_relay::{HttpTransport, ShellClient, TerminalSession};
//! use shell_relay::session::InputEvent;
//!
//! #[tokio::main]
//! async fn main() -> shell_relay::Result<()> {
//!     shell_relay::logging::try_init().ok();
//!
//!     let transport = HttpTransport::new("http://127.0.0.1:8080/~/system/bin/shell.aot")?;
//!     let mut session = TerminalSession::new(ShellClient::new(transport));
//!
//!     session.start().await;
//!     session.handle_input(InputEvent::Paste("ls".into())).await;
//!     session.handle_input(InputEvent::Enter).await;
//!     session.run_to_idle().await;
//!
//!     println!("{}", session.render());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod session;
pub mod transport;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use client::ShellClient;
pub use error::{RelayError, Result};
pub use protocol::{CommandOutput, ControlCommand, EventStream, ShellEvent, StreamPrecedence};
pub use session::{ExecutionContext, SessionState, TerminalSession};
pub use transport::{HttpTransport, Transport, TransportRecord};
