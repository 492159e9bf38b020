//! Unpacking zip and tar archives, plain or compressed with gzip or bzip2.

use super::detect::{detect_file, ArchiveFormat};
use crate::error::{Error, Result};

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Extract the archive at `archive` into `target`, creating `target` first.
///
/// Entries whose paths would land outside `target` are rejected.
pub fn extract_archive(archive: &Path, target: &Path) -> Result<()> {
    let format = detect_file(archive)?
        .ok_or_else(|| Error::UnsupportedArchive(archive.display().to_string()))?;

    debug!("Extracting {:?} ({:?}) into {:?}", archive, format, target);
    fs::create_dir_all(target)?;

    match format {
        ArchiveFormat::Zip => extract_zip(archive, target),
        ArchiveFormat::Tar => extract_tar(File::open(archive)?, target),
        ArchiveFormat::TarGz => extract_tar(GzDecoder::new(File::open(archive)?), target),
        ArchiveFormat::TarBz2 => extract_tar(BzDecoder::new(File::open(archive)?), target),
    }
}

fn extract_zip(archive: &Path, target: &Path) -> Result<()> {
    let file = File::open(archive)?;
    let mut zip = zip::ZipArchive::new(file)
        .map_err(|e| Error::archive("Failed to open zip archive", e))?;

    zip.extract(target)
        .map_err(|e| Error::archive("Failed to extract zip archive", e))
}

fn extract_tar<R: Read>(reader: R, target: &Path) -> Result<()> {
    let mut archive = tar::Archive::new(reader);
    let entries = archive
        .entries()
        .map_err(|e| Error::archive("Failed to read tar archive", e))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| Error::archive("Corrupted tar entry", e))?;
        let name = entry
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        let unpacked = entry
            .unpack_in(target)
            .map_err(|e| Error::archive(format!("Failed to unpack {}", name), e))?;
        if !unpacked {
            return Err(Error::Archive {
                message: format!("Entry {} escapes the target directory", name),
                cause: None,
            });
        }
    }

    Ok(())
}
