//! Trailing-edge debounce for the search input

use std::time::{Duration, Instant};

/// Quiet period that must elapse after the last keystroke before the
/// pending search term is committed
pub const DEBOUNCE_QUIET: Duration = Duration::from_millis(500);

/// Converts raw keystrokes into a rate-limited query signal.
///
/// Every call to [`input`](Self::input) restarts the timer; the pending
/// value is emitted by [`poll`](Self::poll) once the quiet period passes
/// with no further input (debounce, not throttle). The clock is injected so
/// callers and tests control time.
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    pending: Option<(String, Instant)>,
    committed: String,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            committed: String::new(),
        }
    }

    /// Record a keystroke, restarting the quiet-period timer
    pub fn input(&mut self, value: &str, now: Instant) {
        self.pending = Some((value.to_string(), now));
    }

    /// Commit and return the pending term once the quiet period has
    /// elapsed since the last keystroke; `None` otherwise.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let (_, at) = self.pending.as_ref()?;
        if now.duration_since(*at) < self.quiet {
            return None;
        }
        let (value, _) = self.pending.take()?;
        self.committed = value.clone();
        Some(value)
    }

    /// Drop any pending term without committing it
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Last committed search term
    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_QUIET)
    }
}
