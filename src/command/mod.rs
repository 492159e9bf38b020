//! Turning a request into a fetch tool invocation.
//!
//! - [`job`] - Merges a request over the downloader defaults and fixes the
//!   destination path
//! - [`args`] - Builds the argument vector in its fixed order
//! - [`tool`] - Checks that the fetch tool exists
//!
//! # Examples
//!
//! ```rust
//! use wget_relay::command::{Invocation, Job};
//! use wget_relay::downloader::DownloaderConfig;
//! use wget_relay::DownloadRequest;
//!
//! # fn example() -> Result<(), wget_relay::Error> {
//! let request = DownloadRequest::new("https://x/code.zip", "/tmp/d").resume(false);
//! let job = Job::resolve(request, &DownloaderConfig::default())?;
//! let invocation = Invocation::new("wget", &job);
//! assert_eq!(invocation.command_line(), "wget -O /tmp/d/code.zip https://x/code.zip");
//! # Ok(())
//! # }
//! ```

pub mod args;
pub mod job;
pub mod tool;

pub use args::{build_args, header_arg, Invocation};
pub use job::{file_name_from_uri, Job};
pub use tool::locate;
