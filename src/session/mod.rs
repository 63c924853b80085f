//! Interactive terminal session.
//!
//! This module holds the session's editable buffer, command history,
//! execution context and the controller that turns input events into
//! shell requests and shell events into buffer updates.

mod buffer;
mod context;
mod controller;
mod driver;
mod history;
mod input;
mod state;
mod surface;

pub use buffer::{SessionBuffer, WorkingSnapshot, CURSOR_GLYPH};
pub use context::{ExecutionContext, CWD_KEY};
pub use controller::{SessionOptions, TerminalSession, DEFAULT_INTERRUPT_SIGNAL};
pub use driver::{drive, SurfaceEvent};
pub use history::{CommandHistory, Direction, DEFAULT_HISTORY_CAPACITY};
pub use input::InputEvent;
pub use state::SessionState;
pub use surface::{DisplaySurface, LineSurface};
