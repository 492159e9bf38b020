//! The accumulating result of one download.
//!
//! A [`DownloadResult`] is created before the fetch tool is spawned and is
//! handed forward through every stage: exit classification, checksum and
//! extraction each return an enriched copy. Whatever state was reached
//! travels with the error on failure.

use crate::error::Error;
use std::path::PathBuf;

/// Exact command line built for the fetch tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugInfo {
    /// Program followed by every argument, joined with single spaces.
    pub command: String,
}

/// Raw exit status of a fetch tool that did not exit cleanly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExitInfo {
    /// Exit code, absent when the process was killed by a signal.
    pub code: Option<i32>,
    /// Signal name such as `SIGTERM`.
    pub signal: Option<String>,
}

/// Represents the state a download reached.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadResult {
    /// Absolute path of the downloaded file.
    pub destination_file_path: PathBuf,
    /// Last known progress, 100 once the transfer succeeded.
    pub progress: u8,
    /// Whether the file matched the requested digest. Only set when a
    /// digest was requested.
    pub md5_matches: Option<bool>,
    /// Digest actually computed, only set on mismatch.
    pub md5_actual: Option<String>,
    /// Directory the archive was extracted into.
    pub extract_dir: Option<PathBuf>,
    /// Only present in debug mode.
    pub debug_info: Option<DebugInfo>,
    /// Only present when the process itself failed.
    pub error: Option<ExitInfo>,
}

impl DownloadResult {
    /// Create a new [`DownloadResult`] for a file that has not been fetched yet.
    pub fn new(destination_file_path: PathBuf) -> Self {
        Self {
            destination_file_path,
            progress: 0,
            md5_matches: None,
            md5_actual: None,
            extract_dir: None,
            debug_info: None,
            error: None,
        }
    }

    /// Whether the transfer ran to completion.
    pub fn is_complete(&self) -> bool {
        self.progress >= 100
    }

    /// Attach the failure to the result.
    pub fn fail(self, error: Error) -> Failure {
        Failure {
            error,
            result: self,
        }
    }
}

/// A failed download together with the state it reached.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct Failure {
    /// What went wrong.
    #[source]
    pub error: Error,
    /// Everything known about the download when it failed.
    pub result: DownloadResult,
}

/// Terminal value of a download, delivered exactly once.
pub type Outcome = std::result::Result<DownloadResult, Failure>;
