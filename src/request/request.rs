//! The caller-supplied description of one download.
//!
//! # Examples
//!
//! ```rust
//! use wget_relay::DownloadRequest;
//!
//! let request = DownloadRequest::new("https://example.com/code.tar.gz", "./downloads")
//!     .file_name("code.tgz")
//!     .md5("44e66a2a072961590e54531b41289451")
//!     .extract_to("./downloads/code")
//!     .header("Accept-Language: en-us");
//!
//! assert!(request.validate().is_ok());
//! ```

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Represents a file to be downloaded by the external fetch tool.
///
/// Fields left as `None` fall back to the owning
/// [`Downloader`](crate::Downloader)'s defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownloadRequest {
    /// URI handed to the fetch tool as its last argument.
    pub uri: String,
    /// Directory the file is written into.
    pub destination_dir: PathBuf,
    /// File name on disk. Derived from the URI when absent.
    pub destination_file_name: Option<String>,
    /// Continue a partially downloaded file.
    pub resume_download: Option<bool>,
    /// Transfer rate cap, combined with the unit as `<value><unit>`.
    pub download_speed_limit: Option<f64>,
    /// Unit suffix for the rate cap, e.g. `"k"` or `"m"`.
    pub download_speed_limit_unit: Option<String>,
    /// Raw header strings, one `--header` flag each.
    pub headers: Vec<String>,
    /// Raw arguments passed verbatim to the fetch tool.
    pub extra_options: Vec<String>,
    /// Expected MD5 digest as lowercase hex.
    pub md5: Option<String>,
    /// Extract the downloaded archive into this directory.
    pub extract_dir: Option<PathBuf>,
    /// Minimum time between two progress callbacks.
    pub progress_update_interval: Option<Duration>,
    /// Record the exact command line in the result.
    pub debug: Option<bool>,
}

impl DownloadRequest {
    /// Creates a new [`DownloadRequest`] for `uri`, saved under `destination_dir`.
    pub fn new(uri: impl Into<String>, destination_dir: impl Into<PathBuf>) -> Self {
        Self {
            uri: uri.into(),
            destination_dir: destination_dir.into(),
            ..Self::default()
        }
    }

    /// Save the file under this name instead of the URI's last segment.
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.destination_file_name = Some(name.into());
        self
    }

    /// Override the downloader's resume policy.
    pub fn resume(mut self, resume: bool) -> Self {
        self.resume_download = Some(resume);
        self
    }

    /// Cap the transfer rate, in the downloader's default unit.
    pub fn speed_limit(mut self, limit: f64) -> Self {
        self.download_speed_limit = Some(limit);
        self
    }

    /// Cap the transfer rate with an explicit unit.
    pub fn speed_limit_with_unit(mut self, limit: f64, unit: impl Into<String>) -> Self {
        self.download_speed_limit = Some(limit);
        self.download_speed_limit_unit = Some(unit.into());
        self
    }

    /// Add one raw header, e.g. `Accept-Language: "en-us"`.
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.headers.push(header.into());
        self
    }

    /// Append one raw argument for the fetch tool.
    pub fn extra_option(mut self, option: impl Into<String>) -> Self {
        self.extra_options.push(option.into());
        self
    }

    /// Verify the downloaded file against this MD5 digest.
    pub fn md5(mut self, digest: impl Into<String>) -> Self {
        self.md5 = Some(digest.into());
        self
    }

    /// Extract the downloaded archive into `dir`.
    pub fn extract_to(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extract_dir = Some(dir.into());
        self
    }

    /// Override the progress debounce window.
    pub fn progress_interval(mut self, interval: Duration) -> Self {
        self.progress_update_interval = Some(interval);
        self
    }

    /// Override the downloader's debug flag.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Reject requests that cannot possibly run.
    ///
    /// This never touches the filesystem or spawns anything.
    pub fn validate(&self) -> Result<()> {
        if self.uri.trim().is_empty() {
            return Err(Error::MissingUri);
        }

        if self.destination_dir.as_os_str().is_empty() {
            return Err(Error::MissingDestination);
        }

        if let Some(limit) = self.download_speed_limit {
            if !limit.is_finite() || limit <= 0.0 {
                return Err(Error::InvalidLimit(limit));
            }
        }

        Ok(())
    }
}
