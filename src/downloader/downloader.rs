//! Core downloader implementation.
//!
//! This module contains the main [`Downloader`] struct. It validates a
//! [`DownloadRequest`], locates the fetch tool, spawns it and hands the
//! child to a session task that reports progress and the final outcome.
//!
//! # Examples
//!
//! ## Basic Download
//!
//! ```rust,no_run
//! use wget_relay::downloader::DownloaderBuilder;
//! use wget_relay::DownloadRequest;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = DownloaderBuilder::new().build();
//! let request = DownloadRequest::new("https://example.com/file1.zip", "./downloads");
//!
//! let handle = downloader.download(request, |outcome| match outcome {
//!     Ok(result) => println!("Downloaded {:?}", result.destination_file_path),
//!     Err(failure) => eprintln!("Failed: {}", failure),
//! })?;
//! handle.wait().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Progress and Post-processing
//!
//! ```rust,no_run
//! use wget_relay::downloader::DownloaderBuilder;
//! use wget_relay::DownloadRequest;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = DownloaderBuilder::new()
//!     .progress_update_interval(Duration::from_millis(200))
//!     .build();
//! let request = DownloadRequest::new("https://example.com/code.zip", "./downloads")
//!     .md5("39df4a73bc1bd2a0e83bbe5a8d3a9a1e")
//!     .extract_to("./downloads/code");
//!
//! let handle = downloader.download_with_progress(
//!     request,
//!     |_outcome| {},
//!     |_result, event| println!("{}% at {}/s", event.percent, event.speed),
//! )?;
//! let result = handle.wait().await?;
//! assert_eq!(result.md5_matches, Some(true));
//! # Ok(())
//! # }
//! ```

use super::config::{CompletionCallback, DownloaderConfig, ProgressCallback};
use super::handle::DownloadHandle;
use super::session::Session;
use crate::command::{locate, Invocation, Job};
use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::progress::ProgressEvent;
use crate::request::{DebugInfo, DownloadRequest, DownloadResult, Outcome};

use std::fmt;
use std::fmt::Debug;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Represents the download controller.
///
/// A downloader can be created via its builder:
///
/// ```rust
/// # fn main()  {
/// use wget_relay::downloader::DownloaderBuilder;
///
/// let d = DownloaderBuilder::new().build();
/// # }
/// ```
#[derive(Clone)]
pub struct Downloader {
    config: DownloaderConfig,
    pipeline: Arc<Pipeline>,
}

impl Debug for Downloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downloader")
            .field("config", &self.config)
            .field("pipeline", &self.pipeline)
            .finish()
    }
}

impl Downloader {
    /// Creates a new Downloader with the given configuration.
    pub(crate) fn new(config: DownloaderConfig) -> Self {
        let pipeline = Pipeline::post_download(config.checksum.clone(), config.extractor.clone());
        Self {
            config,
            pipeline: Arc::new(pipeline),
        }
    }

    /// Gets the name or path of the fetch tool.
    pub fn program(&self) -> &str {
        &self.config.program
    }

    /// Gets whether command lines are recorded in results.
    pub fn debug(&self) -> bool {
        self.config.debug
    }

    /// Gets whether partial downloads are continued.
    pub fn resume_download(&self) -> bool {
        self.config.resume_download
    }

    /// Gets the default transfer rate cap.
    pub fn download_speed_limit(&self) -> Option<f64> {
        self.config.download_speed_limit
    }

    /// Gets the default unit of the rate cap.
    pub fn download_speed_limit_unit(&self) -> &str {
        &self.config.download_speed_limit_unit
    }

    /// Gets the minimum time between two progress callbacks.
    pub fn progress_update_interval(&self) -> Duration {
        self.config.progress_update_interval
    }

    /// Gets whether the destination directory is created before spawning.
    pub fn create_destination_dir(&self) -> bool {
        self.config.create_destination_dir
    }

    /// Gets the post-download steps.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Starts a download.
    ///
    /// Invalid requests, a missing fetch tool and an uncreatable destination
    /// directory are reported here. Everything that happens afterwards is
    /// delivered to `on_complete`, exactly once.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn download<C>(&self, request: DownloadRequest, on_complete: C) -> Result<DownloadHandle>
    where
        C: FnOnce(&Outcome) + Send + 'static,
    {
        self.start(request, Box::new(on_complete), None)
    }

    /// Starts a download and reports its progress.
    ///
    /// `on_progress` is rate limited by the progress update interval and
    /// never fires after `on_complete`.
    pub fn download_with_progress<C, P>(
        &self,
        request: DownloadRequest,
        on_complete: C,
        on_progress: P,
    ) -> Result<DownloadHandle>
    where
        C: FnOnce(&Outcome) + Send + 'static,
        P: Fn(&DownloadResult, &ProgressEvent) + Send + Sync + 'static,
    {
        self.start(request, Box::new(on_complete), Some(Box::new(on_progress)))
    }

    fn start(
        &self,
        request: DownloadRequest,
        on_complete: CompletionCallback,
        on_progress: Option<ProgressCallback>,
    ) -> Result<DownloadHandle> {
        let job = Job::resolve(request, &self.config)?;
        let program = locate(&self.config.program)?;

        if self.config.create_destination_dir {
            std::fs::create_dir_all(&job.request.destination_dir)?;
        }

        let invocation = Invocation::new(self.config.program.as_str(), &job);
        let mut result = DownloadResult::new(job.destination_file_path.clone());
        if job.debug {
            info!("Running {}", invocation);
            result.debug_info = Some(DebugInfo {
                command: invocation.command_line(),
            });
        }

        let spawned = Command::new(&program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let pid = spawned.as_ref().ok().and_then(|child| child.id());
        debug!("Spawned {} with pid {:?}", invocation.program, pid);

        let destination_file_path = job.destination_file_path.clone();
        let session = Session {
            job,
            program: invocation.program,
            result,
            pipeline: self.pipeline.clone(),
            on_progress,
        };

        let (control, requests) = mpsc::unbounded_channel();
        let task = tokio::spawn(session.run(spawned, requests, on_complete));

        Ok(DownloadHandle::new(pid, destination_file_path, control, task))
    }
}
