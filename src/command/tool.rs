//! Locating the fetch tool on the system.

use crate::error::{Error, Result};
use std::path::PathBuf;
use tracing::debug;

/// Resolve `program` to an executable path.
///
/// Bare names are looked up in `PATH`, paths are checked directly.
pub fn locate(program: &str) -> Result<PathBuf> {
    match which::which(program) {
        Ok(path) => {
            debug!("Resolved {} to {:?}", program, path);
            Ok(path)
        }
        Err(e) => {
            debug!("Could not resolve {}: {}", program, e);
            Err(Error::ToolNotFound(program.to_string()))
        }
    }
}
