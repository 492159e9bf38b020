//! wget-relay runs downloads through the `wget` command line tool and turns
//! its output into structured progress, then verifies and unpacks the
//! result.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use wget_relay::{DownloadRequest, DownloaderBuilder};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = DownloaderBuilder::new().build();
//! let request = DownloadRequest::new(
//!     "https://github.com/seanmonstar/reqwest/archive/refs/tags/v0.11.9.zip",
//!     "output",
//! )
//! .extract_to("output/reqwest");
//!
//! let handle = downloader.download_with_progress(
//!     request,
//!     |outcome| println!("done: {}", outcome.is_ok()),
//!     |_, event| println!("{}%", event.percent),
//! )?;
//! let result = handle.wait().await?;
//! println!("extracted into {:?}", result.extract_dir);
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`request`] - What to download and the result it produces
//! - [`command`] - Request resolution and the fetch tool's argument vector
//! - [`progress`] - Progress line parsing, debouncing and display
//! - [`downloader`] - The `Downloader`, its builder and the process lifecycle
//! - [`pipeline`] - Post-download steps
//! - [`hash`] - MD5 digests
//! - [`archive`] - Archive detection and extraction
//! - [`error`] - Centralized error handling with the `Error` enum

pub mod archive;
pub mod command;
pub mod downloader;
pub mod error;
pub mod hash;
pub mod pipeline;
pub mod progress;
pub mod request;

pub use archive::{ArchiveExtractor, ArchiveFormat, Extractor};
pub use downloader::{DownloadHandle, Downloader, DownloaderBuilder, ExitReason};
pub use error::{Error, Result};
pub use hash::{ChecksumProvider, Md5Checksum};
pub use progress::{ProgressBarOpts, ProgressDisplay, ProgressEvent};
pub use request::{DebugInfo, DownloadRequest, DownloadResult, ExitInfo, Failure, Outcome};
