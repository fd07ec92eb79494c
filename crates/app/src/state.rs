//! State machine for TinySnip

/// Application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Idle state - ready for the next trigger
    Idle,
    /// A capture session is in flight
    Capturing,
}

impl AppState {
    /// Get display text for current state
    pub fn display_text(&self) -> &'static str {
        match self {
            AppState::Idle => "就绪",
            AppState::Capturing => "截图中...",
        }
    }

    /// Check if a new capture may start
    pub fn can_capture(&self) -> bool {
        matches!(self, AppState::Idle)
    }
}

/// State machine transitions
pub struct StateMachine {
    state: AppState,
}

impl StateMachine {
    /// Create a new state machine
    pub fn new() -> Self {
        Self {
            state: AppState::Idle,
        }
    }

    /// Get current state
    pub fn state(&self) -> AppState {
        self.state
    }

    /// Transition to capturing. Refused while a session is in flight, so
    /// repeated triggers collapse into the running capture.
    pub fn start_capture(&mut self) -> bool {
        if self.state.can_capture() {
            self.state = AppState::Capturing;
            true
        } else {
            false
        }
    }

    /// Session over, back to idle.
    pub fn finish_capture(&mut self) {
        self.state = AppState::Idle;
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_trigger_is_refused_while_capturing() {
        let mut machine = StateMachine::new();

        assert!(machine.start_capture());
        assert!(!machine.start_capture());
        assert_eq!(machine.state(), AppState::Capturing);
    }

    #[test]
    fn finish_returns_to_idle() {
        let mut machine = StateMachine::new();
        machine.start_capture();
        machine.finish_capture();

        assert_eq!(machine.state(), AppState::Idle);
        assert!(machine.start_capture());
    }
}
