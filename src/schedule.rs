//! Scheduler primitives behind the visibility recheck.
//!
//! Host-runtime callback patterns (timer debounce, frame-deferred reads) are
//! expressed as poll-driven values instead: callers pass the current
//! `Instant` into `poke`/`fire`, so tests drive a synthetic clock and never
//! need a real event loop.

use std::time::{Duration, Instant};

/// Coalesces a burst of trigger events into a single firing after a fixed
/// quiet window.
///
/// Trailing-edge semantics: every poke pushes the deadline out again, so the
/// last event in a burst decides when the task fires, and at most one firing
/// is ever in flight.
#[derive(Debug)]
pub struct DebouncedTask {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl DebouncedTask {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    /// Record a trigger event at `now`, (re)arming the deadline.
    pub fn poke(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once per armed burst, once the quiet window has elapsed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// One-shot latch that defers a layout-dependent read to the next frame.
///
/// Armed on the frame that decides to measure; consumed (`take`) on the
/// following frame, when the last completed layout pass has left a bounding
/// rectangle to measure.
#[derive(Debug, Default)]
pub struct LayoutProbe {
    armed: bool,
}

impl LayoutProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Consume the latch at a layout boundary.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.armed)
    }
}
