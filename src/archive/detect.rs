//! Archive format detection.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Archive formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    TarGz,
    TarBz2,
}

/// Detect a format from the first bytes of a file.
pub fn detect_format(data: &[u8]) -> Option<ArchiveFormat> {
    match data {
        [0x50, 0x4B, 0x03, 0x04, ..] | [0x50, 0x4B, 0x05, 0x06, ..] => Some(ArchiveFormat::Zip),
        [0x1F, 0x8B, ..] => Some(ArchiveFormat::TarGz),
        [b'B', b'Z', b'h', ..] => Some(ArchiveFormat::TarBz2),
        _ if is_tar_header(data) => Some(ArchiveFormat::Tar),
        _ => None,
    }
}

fn is_tar_header(data: &[u8]) -> bool {
    data.len() >= 263 && &data[257..262] == b"ustar"
}

/// Guess a format from the file name.
pub fn detect_from_extension(path: &Path) -> Option<ArchiveFormat> {
    let name = path.file_name()?.to_string_lossy().to_lowercase();

    if name.ends_with(".zip") {
        Some(ArchiveFormat::Zip)
    } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        Some(ArchiveFormat::TarGz)
    } else if name.ends_with(".tar.bz2") || name.ends_with(".tbz2") {
        Some(ArchiveFormat::TarBz2)
    } else if name.ends_with(".tar") {
        Some(ArchiveFormat::Tar)
    } else {
        None
    }
}

/// Detect the format of the file at `path`, by content first and by name
/// second.
pub fn detect_file(path: &Path) -> io::Result<Option<ArchiveFormat>> {
    let mut header = Vec::with_capacity(512);
    File::open(path)?.take(512).read_to_end(&mut header)?;
    Ok(detect_format(&header).or_else(|| detect_from_extension(path)))
}
