//! Rate limiting for progress notifications.
//!
//! Both output streams share one [`Debouncer`] owned by the session. Once
//! an event is dispatched the window is armed, and further lines are
//! dropped until it elapses. The session clears it on process exit.

use std::time::Duration;
use tokio::time::Instant;

/// A single debounce window.
#[derive(Debug, Clone)]
pub struct Debouncer {
    interval: Duration,
    window: Window,
}

#[derive(Debug, Clone, Copy)]
enum Window {
    Closed,
    Until(Instant),
    /// The interval does not fit in an `Instant`; only `clear` reopens it.
    Forever,
}

impl Debouncer {
    /// Create an unarmed debouncer with the given window length.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            window: Window::Closed,
        }
    }

    /// Length of the window.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start a new window from now.
    pub fn arm(&mut self) {
        self.window = match Instant::now().checked_add(self.interval) {
            Some(deadline) => Window::Until(deadline),
            None => Window::Forever,
        };
    }

    /// Whether a window is currently open.
    pub fn is_armed(&self) -> bool {
        match self.window {
            Window::Closed => false,
            Window::Until(deadline) => Instant::now() < deadline,
            Window::Forever => true,
        }
    }

    /// Drop the current window, if any.
    pub fn clear(&mut self) {
        self.window = Window::Closed;
    }

    /// Arm the window and return `true` unless it was already armed.
    pub fn try_acquire(&mut self) -> bool {
        if self.is_armed() {
            return false;
        }
        self.arm();
        true
    }
}
