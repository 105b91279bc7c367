mod input;

pub use input::InputState;

/// UI state that is not derived from the activity feed
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Input composer
    pub input: InputState,
    /// Last error reported by the transport, shown in the footer
    pub error: Option<String>,
    /// Set when the user asked to quit
    pub should_exit: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn request_exit(&mut self) {
        self.should_exit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_default() {
        let state = AppState::new();
        assert!(state.input.is_empty());
        assert!(state.error.is_none());
        assert!(!state.should_exit);
    }

    #[test]
    fn test_error_lifecycle() {
        let mut state = AppState::new();
        state.set_error("transport error: conversation has ended");
        assert_eq!(state.error.as_deref(), Some("transport error: conversation has ended"));

        state.clear_error();
        assert!(state.error.is_none());
    }
}
