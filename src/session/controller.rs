//! Terminal session controller.
//!
//! The session is either idle, applying input to its buffer, or busy with
//! exactly one command stream open. Input received while busy is queued
//! and replayed, in arrival order, once the command has finished.

use std::collections::VecDeque;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::buffer::SessionBuffer;
use super::context::ExecutionContext;
use super::history::{CommandHistory, Direction, DEFAULT_HISTORY_CAPACITY};
use super::input::InputEvent;
use super::state::SessionState;
use crate::client::ShellClient;
use crate::error::RelayError;
use crate::protocol::{ControlCommand, EventStream, ShellEvent};
use crate::transport::Transport;
use crate::Result;

/// Signal sent by [`TerminalSession::interrupt`] unless configured otherwise.
pub const DEFAULT_INTERRUPT_SIGNAL: &str = "SIGINT";

/// Tunables for a terminal session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub history_capacity: usize,
    pub interrupt_signal: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            interrupt_signal: DEFAULT_INTERRUPT_SIGNAL.to_string(),
        }
    }
}

/// The command currently in flight.
struct InFlight {
    /// `None` once the stream has ended or failed.
    events: Option<EventStream>,
    pending: VecDeque<InputEvent>,
    pid: Option<u32>,
}

enum Mode {
    Idle,
    Busy(InFlight),
}

impl Mode {
    fn state(&self) -> SessionState {
        match self {
            Mode::Idle => SessionState::Idle,
            Mode::Busy(_) => SessionState::Busy,
        }
    }
}

/// Interactive session over a remote shell.
pub struct TerminalSession<T> {
    client: ShellClient<T>,
    context: ExecutionContext,
    buffer: SessionBuffer,
    history: CommandHistory,
    mode: Mode,
    interrupt_signal: String,
    last_exit_code: Option<i64>,
}

impl<T: Transport> TerminalSession<T> {
    pub fn new(client: ShellClient<T>) -> Self {
        Self::with_options(client, SessionOptions::default())
    }

    pub fn with_options(client: ShellClient<T>, options: SessionOptions) -> Self {
        Self {
            client,
            context: ExecutionContext::new(),
            buffer: SessionBuffer::new(),
            history: CommandHistory::new(options.history_capacity),
            mode: Mode::Idle,
            interrupt_signal: options.interrupt_signal,
            last_exit_code: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.mode.state()
    }

    pub fn buffer(&self) -> &SessionBuffer {
        &self.buffer
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    pub fn client(&self) -> &ShellClient<T> {
        &self.client
    }

    /// Number of input events waiting for the running command to finish.
    pub fn pending_inputs(&self) -> usize {
        match &self.mode {
            Mode::Busy(flight) => flight.pending.len(),
            Mode::Idle => 0,
        }
    }

    /// Pid announced by the running command, if any.
    pub fn running_pid(&self) -> Option<u32> {
        match &self.mode {
            Mode::Busy(flight) => flight.pid,
            Mode::Idle => None,
        }
    }

    /// Exit status reported by the most recent command, if any.
    pub fn last_exit_code(&self) -> Option<i64> {
        self.last_exit_code
    }

    /// Display text with the cursor glyph.
    pub fn render(&self) -> String {
        self.buffer.render()
    }

    /// Print the initial banner.
    pub async fn start(&mut self) {
        self.print_banner().await;
    }

    /// Handle one keystroke or paste.
    pub async fn handle_input(&mut self, event: InputEvent) {
        match &mut self.mode {
            Mode::Busy(flight) => flight.pending.push_back(event),
            Mode::Idle => match event {
                InputEvent::Enter => self.submit().await,
                InputEvent::Tab => self.complete().await,
                other => self.apply_edit(other),
            },
        }
    }

    /// Apply the next event of the running command.
    ///
    /// Returns `false` once the command's stream is exhausted (or when
    /// idle); [`complete_command`](Self::complete_command) then finishes
    /// it. Cancelling the returned future between events loses nothing.
    pub async fn pump(&mut self) -> bool {
        let Mode::Busy(flight) = &mut self.mode else {
            return false;
        };
        let Some(events) = flight.events.as_mut() else {
            return false;
        };

        match events.next(&mut self.context).await {
            Some(Ok(event)) => {
                match event {
                    ShellEvent::Output(text) => self.buffer.emit(&text),
                    ShellEvent::Control(ControlCommand::Clear) => self.buffer.clear(),
                    ShellEvent::Environment(_) => {}
                    ShellEvent::Pid(pid) => {
                        debug!(pid, "command process started");
                        flight.pid = Some(pid);
                    }
                    ShellEvent::Exit(code) => {
                        debug!(code, "command process exited");
                        self.last_exit_code = Some(code);
                    }
                }
                true
            }
            Some(Err(e)) => {
                warn!(error = %e, "command stream failed");
                self.buffer.emit(&failure_text(&e));
                flight.events = None;
                false
            }
            None => {
                flight.events = None;
                false
            }
        }
    }

    /// Finish the running command: terminate its output, print a fresh
    /// banner, return to idle and replay queued input.
    ///
    /// Any events not yet pumped are abandoned. No-op when idle.
    pub async fn complete_command(&mut self) {
        if !self.state().is_busy() {
            return;
        }

        self.buffer.ensure_trailing_newline();
        self.print_banner().await;

        let flight = match self.transition(Mode::Idle) {
            Ok(Mode::Busy(flight)) => flight,
            Ok(Mode::Idle) => return,
            Err(e) => {
                warn!(error = %e, "cannot leave busy state");
                return;
            }
        };

        if !flight.pending.is_empty() {
            debug!("replaying {} queued input events", flight.pending.len());
        }
        for event in flight.pending {
            match event {
                InputEvent::Enter => debug!("dropping queued Enter"),
                InputEvent::Tab => self.complete().await,
                other => self.apply_edit(other),
            }
        }
    }

    /// Pump the running command to its end and finish it.
    pub async fn run_to_idle(&mut self) {
        while self.pump().await {}
        self.complete_command().await;
    }

    /// Ask the remote side to interrupt the running command.
    ///
    /// Targets the pid the command announced. The request is sent in the
    /// background and its delivery task returned; the running command
    /// keeps streaming meanwhile. No-op when idle or before the command
    /// has announced a pid.
    pub fn interrupt(&mut self) -> Option<JoinHandle<()>> {
        let Some(pid) = self.running_pid() else {
            debug!("interrupt ignored: no running process");
            return None;
        };
        info!(pid, signal = %self.interrupt_signal, "interrupting command");
        Some(
            self.client
                .signal(&self.context, &self.interrupt_signal, Some(pid)),
        )
    }

    fn transition(&mut self, target: Mode) -> Result<Mode> {
        let mut state = self.state();
        state.transition_to(target.state())?;
        debug!(to = ?state, "session transition");
        Ok(std::mem::replace(&mut self.mode, target))
    }

    fn apply_edit(&mut self, event: InputEvent) {
        match event {
            InputEvent::Char(c) => {
                let mut utf8 = [0u8; 4];
                self.buffer.insert(c.encode_utf8(&mut utf8));
            }
            InputEvent::Paste(text) => self.buffer.insert(&text),
            InputEvent::Backspace => self.buffer.delete_before(),
            InputEvent::Delete => self.buffer.delete_after(),
            InputEvent::Left => self.buffer.move_cursor(-1),
            InputEvent::Right => self.buffer.move_cursor(1),
            InputEvent::Home => self.buffer.cursor_to_start(),
            InputEvent::End => self.buffer.cursor_to_end(),
            InputEvent::Up => self.navigate(Direction::Up),
            InputEvent::Down => self.navigate(Direction::Down),
            InputEvent::Tab | InputEvent::Enter => {}
        }
    }

    fn navigate(&mut self, direction: Direction) {
        let current = self.buffer.working().to_string();
        if let Some(entry) = self.history.navigate(direction, &current) {
            self.buffer.set_working(entry);
        }
    }

    async fn submit(&mut self) {
        self.buffer.cursor_to_end();
        let command = self.buffer.working().trim_end().to_string();
        self.buffer.emit("\n");
        self.history.reset_navigation();

        if command.trim().is_empty() {
            return;
        }
        self.last_exit_code = None;
        self.history.push(command.as_str());
        info!(command = %command, "executing");

        let events = match self.client.execute(&self.context, &command).await {
            Ok(events) => Some(events),
            Err(e) => {
                warn!(error = %e, "execute request failed");
                self.buffer.emit(&failure_text(&e));
                None
            }
        };
        let failed = events.is_none();

        let flight = InFlight {
            events,
            pending: VecDeque::new(),
            pid: None,
        };
        if let Err(e) = self.transition(Mode::Busy(flight)) {
            warn!(error = %e, "cannot start command");
            return;
        }
        if failed {
            self.complete_command().await;
        }
    }

    async fn complete(&mut self) {
        let partial = self.buffer.working().to_string();
        let candidates = match self.client.completion(&mut self.context, &partial).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(error = %e, "completion request failed");
                Vec::new()
            }
        };

        match candidates.as_slice() {
            [] => {}
            [only] => self.buffer.replace_last_token(only),
            many => {
                let saved = self.buffer.snapshot();
                let mut listing = String::from("\n");
                for candidate in many {
                    listing.push_str(candidate);
                    listing.push('\n');
                }
                self.buffer.emit(&listing);
                self.print_banner().await;
                self.buffer.restore(saved);
            }
        }
    }

    async fn print_banner(&mut self) {
        let text = match self.client.init(&mut self.context).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "init request failed");
                failure_text(&e)
            }
        };
        self.buffer.emit(&text);
    }
}

fn failure_text(error: &RelayError) -> String {
    format!("shell exec failed: {error}\n")
}
