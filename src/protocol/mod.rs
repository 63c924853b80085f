//! Shell protocol: the request envelope and the inner output framing.
//!
//! Every `stdout`/`stderr` value of an outer [`TransportRecord`] is itself
//! a JSON-lines document. Decoding is two explicit stages:
//!
//! 1. [`RecordStream`] turns chunks into outer records.
//! 2. [`Normalizer`] turns each record into [`ShellEvent`]s.
//!
//! [`EventStream`] composes the two behind a single pull operation.
//!
//! [`TransportRecord`]: crate::transport::TransportRecord
//! [`RecordStream`]: crate::transport::RecordStream

mod event;
mod normalizer;
mod request;
mod stream;

pub use event::{ControlCommand, ShellEvent};
pub use normalizer::{InnerRecord, Normalizer, StreamPrecedence};
pub use request::{Action, ShellRequest};
pub use stream::{CommandOutput, EventStream};
