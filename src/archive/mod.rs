//! Archive extraction functionality.
//!
//! The extraction step only needs "unpack this archive into that
//! directory", expressed by [`Extractor`]. [`ArchiveExtractor`] handles zip,
//! tar and gzip- or bzip2-compressed tar files on a blocking thread.

pub mod detect;
pub mod extract;

pub use detect::{detect_format, detect_from_extension, ArchiveFormat};
pub use extract::extract_archive;

use crate::error::{Error, Result};
use futures::future::{BoxFuture, FutureExt};
use std::path::Path;

/// Unpacks an archive into a directory.
pub trait Extractor: Send + Sync {
    /// Extract `archive` into `target`.
    ///
    /// Fails if the format is unrecognized or I/O fails.
    fn extract<'a>(&'a self, archive: &'a Path, target: &'a Path) -> BoxFuture<'a, Result<()>>;
}

/// The default [`Extractor`] for zip, tar, tar.gz/tgz and tar.bz2/tbz2 files.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveExtractor;

impl Extractor for ArchiveExtractor {
    fn extract<'a>(&'a self, archive: &'a Path, target: &'a Path) -> BoxFuture<'a, Result<()>> {
        let archive = archive.to_path_buf();
        let target = target.to_path_buf();
        async move {
            tokio::task::spawn_blocking(move || extract_archive(&archive, &target))
                .await
                .map_err(|e| Error::Internal(format!("extraction task failed: {}", e)))?
        }
        .boxed()
    }
}
