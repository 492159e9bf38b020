//! Downloader module containing the process lifecycle, builder pattern, and configuration.
//!
//! This module provides the main [`Downloader`] struct and its associated
//! builder for configuring and running downloads through the fetch tool.
//!
//! # Overview
//!
//! - `downloader` - Downloader struct, validation and spawning
//! - `session` - Output multiplexing, exit classification and post-processing
//! - `handle` - Control over a running download
//! - `exit` - Mapping of exit codes and signals to errors
//! - `builder` - DownloaderBuilder for flexible configuration
//! - `config` - Configuration structures and callback types
//!
//! # Examples
//!
//! ```rust,no_run
//! use wget_relay::downloader::DownloaderBuilder;
//! use wget_relay::DownloadRequest;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = DownloaderBuilder::new().build();
//! let handle = downloader.download(
//!     DownloadRequest::new("https://example.com/big.iso", "/tmp/downloads"),
//!     |_| {},
//! )?;
//!
//! tokio::time::sleep(Duration::from_secs(5)).await;
//! handle.terminate();
//!
//! let failure = handle.wait().await.unwrap_err();
//! assert!(failure.to_string().contains("SIGTERM"));
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
#[allow(clippy::module_inception)]
pub mod downloader;
pub mod exit;
pub mod handle;
mod session;

pub use builder::DownloaderBuilder;
pub use config::{CompletionCallback, DownloaderConfig, ProgressCallback};
pub use downloader::Downloader;
pub use exit::ExitReason;
pub use handle::DownloadHandle;
