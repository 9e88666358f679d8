//! Debounced persistence.
//!
//! Autosave is a single pending deadline. Each trigger replaces it with
//! `now + delay`, so only the last trigger of a burst ever comes due. The
//! deadline is polled against the session clock; nothing runs in the
//! background.

use std::{
    fmt,
    time::{Duration, Instant},
};

/// Whether the session's source and title are in durable storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaveStatus {
    /// Everything is persisted.
    #[default]
    Saved,

    /// There are changes waiting for the autosave deadline.
    Dirty,
}

impl SaveStatus {
    pub fn is_saved(self) -> bool {
        matches!(self, Self::Saved)
    }

    pub fn is_dirty(self) -> bool {
        matches!(self, Self::Dirty)
    }
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saved => write!(f, "saved"),
            Self::Dirty => write!(f, "unsaved changes"),
        }
    }
}

/// Single-slot debounce timer.
#[derive(Debug, Clone)]
pub struct Autosave {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Autosave {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Arms the timer, replacing any pending deadline.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Disarms the timer.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` and disarms the timer if the deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(1000);

    #[test]
    fn test_fires_once_after_delay() {
        let start = Instant::now();
        let mut autosave = Autosave::new(DELAY);
        autosave.schedule(start);

        assert!(!autosave.take_due(start + Duration::from_millis(999)));
        assert!(autosave.take_due(start + DELAY));
        assert!(!autosave.take_due(start + DELAY * 2));
        assert!(!autosave.is_pending());
    }

    #[test]
    fn test_reschedule_replaces_deadline() {
        let start = Instant::now();
        let mut autosave = Autosave::new(DELAY);
        autosave.schedule(start);
        autosave.schedule(start + Duration::from_millis(600));

        assert!(!autosave.take_due(start + DELAY));
        assert_eq!(autosave.deadline(), Some(start + Duration::from_millis(1600)));
        assert!(autosave.take_due(start + Duration::from_millis(1600)));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut autosave = Autosave::new(DELAY);
        autosave.schedule(start);
        autosave.cancel();

        assert!(!autosave.take_due(start + DELAY));
    }

    #[test]
    fn test_save_status_display() {
        assert_eq!(SaveStatus::Saved.to_string(), "saved");
        assert!(SaveStatus::Dirty.is_dirty());
        assert!(SaveStatus::default().is_saved());
    }
}
