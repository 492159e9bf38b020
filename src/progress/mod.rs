//! Progress reporting.
//!
//! This module turns the fetch tool's textual output into structured
//! progress events and provides helpers to rate-limit and render them.
//!
//! # Overview
//!
//! - `event` - The [`ProgressEvent`] snapshot
//! - `parser` - Line normalisation and field mapping
//! - `debounce` - The shared debounce window
//! - `style` - Progress bar styling options
//! - `display` - Rendering events on an `indicatif` bar
//!
//! # Examples
//!
//! ```rust
//! use wget_relay::progress::parse_line;
//!
//! let event = parse_line("  1450K .......... .......... 42% 1.23M 12s");
//! assert_eq!(event.percent, 42);
//! assert_eq!(event.speed, "1.23M");
//! ```

pub(crate) mod debounce;
pub(crate) mod display;
pub(crate) mod event;
pub(crate) mod parser;
pub(crate) mod style;

pub use debounce::Debouncer;
pub use display::ProgressDisplay;
pub use event::ProgressEvent;
pub use parser::{normalize, parse_line, parse_percent};
pub use style::ProgressBarOpts;
