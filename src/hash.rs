//! File digests for checksum verification.
//!
//! The checksum step only needs "compute the digest of the file at this
//! path", expressed by [`ChecksumProvider`]. [`Md5Checksum`] is the default
//! implementation; it holds no state and can be shared freely.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::path::Path;
//! use wget_relay::hash::{ChecksumProvider, Md5Checksum};
//!
//! # async fn example() -> std::io::Result<()> {
//! let digest = Md5Checksum.digest(Path::new("downloads/code.zip")).await?;
//! println!("md5: {}", digest);
//! # Ok(())
//! # }
//! ```

use futures::future::{BoxFuture, FutureExt};
use md5::{Digest, Md5};
use std::fs::File;
use std::io;
use std::path::Path;

/// Computes the hex digest of a file.
pub trait ChecksumProvider: Send + Sync {
    /// Digest of the file at `path` as lowercase hex.
    ///
    /// Fails with an I/O error if the file cannot be read.
    fn digest<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, io::Result<String>>;
}

/// MD5 digests computed on a blocking thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Checksum;

impl ChecksumProvider for Md5Checksum {
    fn digest<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, io::Result<String>> {
        let path = path.to_path_buf();
        async move {
            tokio::task::spawn_blocking(move || md5_file(&path))
                .await
                .map_err(io::Error::other)?
        }
        .boxed()
    }
}

/// Synchronously compute the MD5 digest of a file.
pub fn md5_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Md5::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}
