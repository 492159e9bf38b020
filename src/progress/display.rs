//! Terminal rendering of [`ProgressEvent`]s.
//!
//! # Examples
//!
//! ```rust
//! use wget_relay::progress::{ProgressBarOpts, ProgressDisplay, ProgressEvent};
//!
//! let display = ProgressDisplay::new(ProgressBarOpts::hidden());
//! display.update(&ProgressEvent {
//!     downloaded: "1450K".into(),
//!     percent: 52,
//!     speed: "1.23M".into(),
//!     time_left: "12s".into(),
//! });
//! display.finish();
//! ```

use super::{ProgressBarOpts, ProgressEvent};
use indicatif::ProgressBar;

/// A single percent-based progress bar fed by progress events.
pub struct ProgressDisplay {
    bar: ProgressBar,
    opts: ProgressBarOpts,
}

impl ProgressDisplay {
    /// Create a display drawing a bar of length 100.
    pub fn new(opts: ProgressBarOpts) -> Self {
        let bar = opts.clone().to_progress_bar(100);
        Self { bar, opts }
    }

    /// Move the bar to the event's percentage.
    pub fn update(&self, event: &ProgressEvent) {
        self.bar.set_position(u64::from(event.percent));
        self.bar.set_message(message(event));
    }

    /// Current bar position.
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Finish the bar, clearing it if configured so.
    pub fn finish(&self) {
        if self.opts.clear {
            self.bar.finish_and_clear();
        } else {
            self.bar.finish();
        }
    }

    /// Leave the bar where it stopped, with a closing message.
    pub fn abandon(&self, msg: impl Into<String>) {
        self.bar.abandon_with_message(msg.into());
    }
}

fn message(event: &ProgressEvent) -> String {
    let mut msg = event.downloaded.clone();
    if !event.speed.is_empty() {
        msg.push_str(&format!(" {}/s", event.speed));
    }
    if !event.time_left.is_empty() {
        msg.push_str(&format!(" eta {}", event.time_left));
    }
    msg.trim_start().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message() {
        let event = ProgressEvent {
            downloaded: "1450K".into(),
            percent: 52,
            speed: "1.23M".into(),
            time_left: "12s".into(),
        };
        assert_eq!(message(&event), "1450K 1.23M/s eta 12s");
        assert_eq!(message(&ProgressEvent::default()), "");
    }

    #[test]
    fn test_update_moves_bar() {
        let display = ProgressDisplay::new(ProgressBarOpts::hidden());
        display.update(&ProgressEvent {
            percent: 40,
            ..ProgressEvent::default()
        });
        assert_eq!(display.position(), 40);
    }
}
