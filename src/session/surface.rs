//! Display surfaces that present a session buffer.

use std::io::Write;

use tracing::warn;

use super::buffer::SessionBuffer;
use super::input::InputEvent;
use super::state::SessionState;

/// Clear screen and home the cursor.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Something that shows the session to a user.
pub trait DisplaySurface {
    /// Called after every step that may have changed the buffer.
    fn refresh(&mut self, buffer: &SessionBuffer);

    /// Called with each input event before the session handles it, along
    /// with the state the session is in at that moment.
    fn input(&mut self, _event: &InputEvent, _state: SessionState) {}
}

/// Line-oriented surface for a cooked terminal or a pipe.
///
/// Only finalized text is written, incrementally. The working line is left
/// to the terminal's own echo, so a submitted line is not printed twice.
pub struct LineSurface<W> {
    out: W,
    shown: usize,
    clears: u64,
    working: String,
    echo: Option<String>,
}

impl<W: Write> LineSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            shown: 0,
            clears: 0,
            working: String::new(),
            echo: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_fresh(&mut self, buffer: &SessionBuffer) -> std::io::Result<()> {
        if buffer.clears() != self.clears {
            self.clears = buffer.clears();
            self.shown = 0;
            self.echo = None;
            self.out.write_all(CLEAR_SCREEN.as_bytes())?;
        }

        let finalized = buffer.finalized();
        if self.shown > finalized.len() || !finalized.is_char_boundary(self.shown) {
            self.shown = 0;
        }

        let mut fresh = &finalized[self.shown..];
        if !fresh.is_empty() {
            if let Some(echo) = self.echo.take() {
                fresh = fresh.strip_prefix(echo.as_str()).unwrap_or(fresh);
            }
        }

        self.out.write_all(fresh.as_bytes())?;
        self.out.flush()?;
        self.shown = finalized.len();
        self.working = buffer.working().to_string();
        Ok(())
    }
}

impl<W: Write> DisplaySurface for LineSurface<W> {
    fn refresh(&mut self, buffer: &SessionBuffer) {
        if let Err(e) = self.write_fresh(buffer) {
            warn!(error = %e, "display write failed");
        }
    }

    fn input(&mut self, event: &InputEvent, state: SessionState) {
        // A busy Enter with nothing typed submits nothing the terminal echoed.
        if event.is_enter() && (!state.is_busy() || !self.working.is_empty()) {
            self.echo = Some(format!("{}\n", self.working));
        }
    }
}
