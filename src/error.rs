//! Error handling for the wget-relay library.
//!
//! This module provides the crate-wide [`Error`] enum. Configuration and
//! environment errors are returned synchronously by
//! [`Downloader::download`](crate::Downloader::download); everything that
//! happens once the fetch tool runs is delivered through the completion
//! callback wrapped in a [`Failure`](crate::Failure).

use crate::downloader::exit::ExitReason;
use std::io;
use thiserror::Error;

/// Errors that can happen when using wget-relay.
#[derive(Error, Debug)]
pub enum Error {
    /// The request has no URI.
    #[error("Download uri not specified")]
    MissingUri,

    /// The request has no destination directory.
    #[error("Destination dir not specified")]
    MissingDestination,

    /// The requested speed limit is not a positive number.
    #[error("Invalid download speed limit: {0}")]
    InvalidLimit(f64),

    /// The external fetch tool cannot be located.
    ///
    /// This is a deployment problem, retrying will not help.
    #[error("{0} command is not supported")]
    ToolNotFound(String),

    /// The operating system refused to start the fetch tool.
    #[error("Failed to start {program}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The running process failed at the OS level, e.g. one of its output
    /// streams errored.
    #[error("Process error: {source}")]
    Process {
        #[source]
        source: io::Error,
    },

    /// The fetch tool exited with a nonzero code or was killed by a signal.
    #[error("{0}")]
    Exit(ExitReason),

    /// The downloaded file does not have the requested MD5 digest.
    ///
    /// The file is left on disk.
    #[error("md5sum does not match")]
    ChecksumMismatch { expected: String, actual: String },

    /// I/O Error.
    #[error("I/O error")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// The archive could not be extracted.
    #[error("Archive error: {message}")]
    Archive {
        message: String,
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The downloaded file is not an archive format we know how to extract.
    #[error("Unsupported archive format: {0}")]
    UnsupportedArchive(String),

    /// Error from an underlying system.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Shorthand for an [`Error::Archive`] wrapping its cause.
    pub(crate) fn archive<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Archive {
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Whether the error was raised before any process existed.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::MissingUri | Error::MissingDestination | Error::InvalidLimit(_)
        )
    }
}

/// Result type alias for operations that can fail with a wget-relay error.
pub type Result<T> = std::result::Result<T, Error>;
