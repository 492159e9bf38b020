//! Builder pattern implementation for creating Downloader instances.
//!
//! # Examples
//!
//! ```rust
//! use wget_relay::downloader::DownloaderBuilder;
//! use std::time::Duration;
//!
//! let downloader = DownloaderBuilder::new()
//!     .resume_download(false)
//!     .download_speed_limit(500.0)
//!     .progress_update_interval(Duration::from_millis(250))
//!     .debug(true)
//!     .build();
//!
//! assert!(!downloader.resume_download());
//! ```

use super::{config::DownloaderConfig, downloader::Downloader};
use crate::archive::Extractor;
use crate::hash::ChecksumProvider;

use std::sync::Arc;
use std::time::Duration;

/// A builder used to create a [`Downloader`].
///
/// ```rust
/// # fn main()  {
/// use wget_relay::downloader::DownloaderBuilder;
///
/// let d = DownloaderBuilder::new().program("/usr/local/bin/wget").build();
/// # }
/// ```
#[derive(Default)]
pub struct DownloaderBuilder {
    config: DownloaderConfig,
}

impl DownloaderBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        DownloaderBuilder::default()
    }

    /// Use another fetch tool, by name or path.
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.config.program = program.into();
        self
    }

    /// Record the built command line in every result.
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Continue partially downloaded files by default.
    pub fn resume_download(mut self, resume: bool) -> Self {
        self.config.resume_download = resume;
        self
    }

    /// Cap the transfer rate by default.
    pub fn download_speed_limit(mut self, limit: f64) -> Self {
        self.config.download_speed_limit = Some(limit);
        self
    }

    /// Set the default unit of the rate cap.
    pub fn download_speed_limit_unit(mut self, unit: impl Into<String>) -> Self {
        self.config.download_speed_limit_unit = unit.into();
        self
    }

    /// Set the minimum time between two progress callbacks.
    pub fn progress_update_interval(mut self, interval: Duration) -> Self {
        self.config.progress_update_interval = interval;
        self
    }

    /// Set whether the destination directory is created before spawning.
    pub fn create_destination_dir(mut self, create: bool) -> Self {
        self.config.create_destination_dir = create;
        self
    }

    /// Replace the digest implementation.
    pub fn checksum(mut self, checksum: impl ChecksumProvider + 'static) -> Self {
        self.config.checksum = Arc::new(checksum);
        self
    }

    /// Replace the archive implementation.
    pub fn extractor(mut self, extractor: impl Extractor + 'static) -> Self {
        self.config.extractor = Arc::new(extractor);
        self
    }

    /// Create the [`Downloader`] with the specified options.
    pub fn build(self) -> Downloader {
        Downloader::new(self.config)
    }
}
