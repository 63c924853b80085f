//! Session state machine.

/// Whether a command is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Input is applied to the buffer immediately.
    #[default]
    Idle,
    /// One command stream is open; input is queued.
    Busy,
}

impl SessionState {
    /// Check if transition to target state is valid.
    ///
    /// Valid transitions:
    /// - Idle -> Busy
    /// - Busy -> Idle
    pub fn can_transition_to(&self, target: SessionState) -> bool {
        use SessionState::*;
        matches!((*self, target), (Idle, Busy) | (Busy, Idle))
    }

    /// Attempt to transition to a new state.
    ///
    /// Returns `Ok(())` if the transition is valid, or an error otherwise.
    pub fn transition_to(&mut self, target: SessionState) -> crate::Result<()> {
        if self.can_transition_to(target) {
            *self = target;
            Ok(())
        } else {
            Err(crate::error::RelayError::InvalidStateTransition {
                from: *self,
                to: target,
            })
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, SessionState::Busy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        let mut state = SessionState::Idle;
        assert!(state.transition_to(SessionState::Busy).is_ok());
        assert_eq!(state, SessionState::Busy);

        assert!(state.transition_to(SessionState::Idle).is_ok());
        assert_eq!(state, SessionState::Idle);
    }

    #[test]
    fn test_no_nested_busy() {
        let mut state = SessionState::Busy;
        assert!(state.transition_to(SessionState::Busy).is_err());
        assert_eq!(state, SessionState::Busy);
    }

    #[test]
    fn test_idle_to_idle_rejected() {
        let mut state = SessionState::Idle;
        assert!(state.transition_to(SessionState::Idle).is_err());
    }

    #[test]
    fn test_default_and_is_busy() {
        assert_eq!(SessionState::default(), SessionState::Idle);
        assert!(!SessionState::Idle.is_busy());
        assert!(SessionState::Busy.is_busy());
    }
}
