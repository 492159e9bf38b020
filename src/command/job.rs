//! Effective settings of one download.
//!
//! A [`Job`] merges a [`DownloadRequest`] over the downloader's defaults
//! and fixes the destination path. It is resolved once, before anything is
//! spawned, and never recomputed.

use crate::downloader::config::DownloaderConfig;
use crate::error::{Error, Result};
use crate::request::DownloadRequest;

use percent_encoding::percent_decode_str;
use reqwest::Url;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A validated request with every default filled in.
#[derive(Debug, Clone)]
pub struct Job {
    /// The request as the caller supplied it.
    pub request: DownloadRequest,
    /// Absolute path the fetch tool writes to.
    pub destination_file_path: PathBuf,
    pub resume: bool,
    /// Rate cap already formatted as `<value><unit>`.
    pub speed_limit: Option<String>,
    pub progress_interval: Duration,
    pub debug: bool,
}

impl Job {
    /// Validate `request` and resolve it against `config`.
    pub fn resolve(request: DownloadRequest, config: &DownloaderConfig) -> Result<Self> {
        request.validate()?;

        let file_name = match request.destination_file_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => file_name_from_uri(&request.uri),
        };
        let destination_file_path = absolute(&request.destination_dir.join(file_name))?;

        let unit = request
            .download_speed_limit_unit
            .as_deref()
            .unwrap_or(config.download_speed_limit_unit.as_str());
        let speed_limit = match request.download_speed_limit.or(config.download_speed_limit) {
            Some(limit) if !limit.is_finite() || limit <= 0.0 => {
                return Err(Error::InvalidLimit(limit));
            }
            Some(limit) => Some(format!("{}{}", limit, unit)),
            None => None,
        };

        Ok(Self {
            resume: request.resume_download.unwrap_or(config.resume_download),
            progress_interval: request
                .progress_update_interval
                .unwrap_or(config.progress_update_interval),
            debug: request.debug.unwrap_or(config.debug),
            destination_file_path,
            speed_limit,
            request,
        })
    }
}

/// Derive a file name from the last path segment of `uri`.
///
/// Absolute URLs have their last non-empty segment percent-decoded. Anything
/// else falls back to the last `/`-separated piece of the raw string, which
/// lets the fetch tool report the bad URI itself.
pub fn file_name_from_uri(uri: &str) -> String {
    let from_url = Url::parse(uri).ok().and_then(|url| {
        url.path_segments()?
            .filter(|segment| !segment.is_empty())
            .next_back()
            .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
    });

    match from_url {
        Some(name) if !name.is_empty() => name,
        _ => uri
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(uri)
            .to_string(),
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(std::path::absolute(path)?)
}
