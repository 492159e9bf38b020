//! Configuration structures and defaults for the downloader.
//!
//! A [`DownloaderConfig`] holds the instance-wide defaults. Every
//! [`DownloadRequest`](crate::DownloadRequest) field left unset falls back
//! to the value configured here.
//!
//! # Examples
//!
//! ```rust
//! use wget_relay::downloader::DownloaderConfig;
//! use std::time::Duration;
//!
//! let config = DownloaderConfig::default();
//! assert_eq!(config.program, "wget");
//! assert!(config.resume_download);
//! assert_eq!(config.progress_update_interval, Duration::from_millis(1000));
//! ```

use crate::archive::{ArchiveExtractor, Extractor};
use crate::hash::{ChecksumProvider, Md5Checksum};
use crate::progress::ProgressEvent;
use crate::request::{DownloadResult, Outcome};

use std::sync::Arc;
use std::time::Duration;

/// Callback fired once with the terminal outcome of a download.
pub type CompletionCallback = Box<dyn FnOnce(&Outcome) + Send>;

/// Callback fired for progress updates, before the completion callback.
pub type ProgressCallback = Box<dyn Fn(&DownloadResult, &ProgressEvent) + Send + Sync>;

/// Configuration structure for the downloader
#[derive(Clone)]
pub struct DownloaderConfig {
    /// Name or path of the fetch tool.
    pub program: String,
    /// Record the built command line in every result.
    pub debug: bool,
    /// Continue partially downloaded files.
    pub resume_download: bool,
    /// Default transfer rate cap.
    pub download_speed_limit: Option<f64>,
    /// Unit suffix for the rate cap.
    pub download_speed_limit_unit: String,
    /// Minimum time between two progress callbacks.
    pub progress_update_interval: Duration,
    /// Create the destination directory before spawning.
    pub create_destination_dir: bool,
    /// Digest implementation used by the checksum step.
    pub checksum: Arc<dyn ChecksumProvider>,
    /// Archive implementation used by the extraction step.
    pub extractor: Arc<dyn Extractor>,
}

impl std::fmt::Debug for DownloaderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloaderConfig")
            .field("program", &self.program)
            .field("debug", &self.debug)
            .field("resume_download", &self.resume_download)
            .field("download_speed_limit", &self.download_speed_limit)
            .field("download_speed_limit_unit", &self.download_speed_limit_unit)
            .field("progress_update_interval", &self.progress_update_interval)
            .field("create_destination_dir", &self.create_destination_dir)
            .finish_non_exhaustive()
    }
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            program: "wget".to_string(),
            debug: false,
            resume_download: true,
            download_speed_limit: None,
            download_speed_limit_unit: "k".to_string(),
            progress_update_interval: Duration::from_millis(1000),
            create_destination_dir: true,
            checksum: Arc::new(Md5Checksum),
            extractor: Arc::new(ArchiveExtractor),
        }
    }
}
