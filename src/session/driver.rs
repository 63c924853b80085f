//! Event loop tying a session to an input channel and a display surface.

use tokio::sync::mpsc;
use tracing::debug;

use super::controller::TerminalSession;
use super::input::InputEvent;
use super::surface::DisplaySurface;
use crate::transport::Transport;

/// Event produced by the user-facing side of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Input(InputEvent),
    /// Request to interrupt the running command.
    Interrupt,
}

enum Step {
    Event(Option<SurfaceEvent>),
    Pumped(bool),
}

/// Run a session until the input channel closes and the session is idle.
///
/// While a command runs, input and command events are interleaved with
/// input taking priority, so keystrokes and interrupts are never stuck
/// behind a chatty command.
pub async fn drive<T, S>(
    session: &mut TerminalSession<T>,
    mut inputs: mpsc::Receiver<SurfaceEvent>,
    surface: &mut S,
) where
    T: Transport,
    S: DisplaySurface,
{
    session.start().await;
    surface.refresh(session.buffer());

    let mut open = true;
    loop {
        let step = if session.state().is_busy() {
            tokio::select! {
                biased;
                event = inputs.recv(), if open => Step::Event(event),
                more = session.pump() => Step::Pumped(more),
            }
        } else if open {
            Step::Event(inputs.recv().await)
        } else {
            break;
        };

        match step {
            Step::Event(Some(SurfaceEvent::Input(event))) => {
                surface.input(&event, session.state());
                session.handle_input(event).await;
            }
            Step::Event(Some(SurfaceEvent::Interrupt)) => {
                session.interrupt();
            }
            Step::Event(None) => {
                debug!("input closed");
                open = false;
                continue;
            }
            Step::Pumped(true) => {}
            Step::Pumped(false) => session.complete_command().await,
        }
        surface.refresh(session.buffer());
    }
}
