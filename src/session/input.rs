//! Input events delivered by the display surface.

/// One keystroke or paste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Printable character (including space).
    Char(char),
    /// Pasted text, inserted at the cursor as-is.
    Paste(String),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Up,
    Down,
    Tab,
    Enter,
}

impl InputEvent {
    pub fn is_enter(&self) -> bool {
        matches!(self, InputEvent::Enter)
    }

    /// Map a typed string to character events.
    pub fn typed(text: &str) -> impl Iterator<Item = InputEvent> + '_ {
        text.chars().map(InputEvent::Char)
    }
}
