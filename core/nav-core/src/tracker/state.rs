//! Process-wide tracker state.
//!
//! Owned by the host's composition root and lent to
//! [`NavigationTracker`](super::NavigationTracker), which is the only writer.
//!
//! ```text
//! initialized:    false ──► true          (one-way)
//! last_location:  None  ──► Some(loc) ──► Some(loc') ...   (never back to None)
//! ```

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerState {
    initialized: bool,
    last_location: Option<String>,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Most recently emitted location, if any.
    pub fn last_location(&self) -> Option<&str> {
        self.last_location.as_deref()
    }

    pub(super) fn mark_initialized(&mut self) {
        self.initialized = true;
    }

    pub(super) fn record_location(&mut self, location: &str) {
        self.last_location = Some(location.to_string());
    }

    pub(super) fn is_duplicate(&self, location: &str) -> bool {
        self.last_location.as_deref() == Some(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_blank() {
        let state = TrackerState::new();
        assert!(!state.is_initialized());
        assert_eq!(state.last_location(), None);
    }

    #[test]
    fn test_duplicate_compares_exactly() {
        let mut state = TrackerState::new();
        assert!(!state.is_duplicate("/a"));
        state.record_location("/a");
        assert!(state.is_duplicate("/a"));
        assert!(!state.is_duplicate("/a/"));
        assert!(!state.is_duplicate("/A"));
    }
}
