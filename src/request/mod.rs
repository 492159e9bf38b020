//! Request and result types.
//!
//! - [`request`] - The immutable [`DownloadRequest`] and its validation
//! - [`result`] - The [`DownloadResult`] built up while the download runs

#[allow(clippy::module_inception)]
pub mod request;
pub mod result;

pub use request::DownloadRequest;
pub use result::{DebugInfo, DownloadResult, ExitInfo, Failure, Outcome};
