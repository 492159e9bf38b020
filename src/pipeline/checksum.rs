//! Checksum verification step.

use super::Step;
use crate::error::Error;
use crate::hash::ChecksumProvider;
use crate::request::{DownloadRequest, DownloadResult, Outcome};

use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use tracing::{debug, warn};

/// Compares the downloaded file's digest with `request.md5`.
///
/// The comparison is an exact string match. On mismatch the file stays on
/// disk and the computed digest is recorded in `md5_actual`.
pub struct ChecksumStep {
    provider: Arc<dyn ChecksumProvider>,
}

impl ChecksumStep {
    pub fn new(provider: Arc<dyn ChecksumProvider>) -> Self {
        Self { provider }
    }
}

impl Step for ChecksumStep {
    fn name(&self) -> &'static str {
        "checksum"
    }

    fn run<'a>(
        &'a self,
        request: &'a DownloadRequest,
        mut result: DownloadResult,
    ) -> BoxFuture<'a, Outcome> {
        async move {
            let Some(expected) = request.md5.as_deref().filter(|m| !m.is_empty()) else {
                return Ok(result);
            };

            result.md5_matches = Some(false);
            let actual = match self.provider.digest(&result.destination_file_path).await {
                Ok(actual) => actual,
                Err(e) => return Err(result.fail(e.into())),
            };

            if actual == expected {
                debug!("Checksum of {:?} matches", result.destination_file_path);
                result.md5_matches = Some(true);
                Ok(result)
            } else {
                warn!(
                    "Checksum mismatch for {:?}: expected {}, got {}",
                    result.destination_file_path, expected, actual
                );
                result.md5_actual = Some(actual.clone());
                Err(result.fail(Error::ChecksumMismatch {
                    expected: expected.to_string(),
                    actual,
                }))
            }
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::{Path, PathBuf};

    struct Fixed(io::Result<&'static str>);

    impl ChecksumProvider for Fixed {
        fn digest<'a>(&'a self, _path: &'a Path) -> BoxFuture<'a, io::Result<String>> {
            let digest = match &self.0 {
                Ok(d) => Ok(d.to_string()),
                Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
            };
            async move { digest }.boxed()
        }
    }

    fn result() -> DownloadResult {
        DownloadResult::new(PathBuf::from("/tmp/d/code.zip"))
    }

    fn step(digest: io::Result<&'static str>) -> ChecksumStep {
        ChecksumStep::new(Arc::new(Fixed(digest)))
    }

    #[tokio::test]
    async fn test_skipped_without_md5() {
        let request = DownloadRequest::new("https://x/code.zip", "/tmp/d");
        let outcome = step(Ok("abc")).run(&request, result()).await.unwrap();
        assert_eq!(outcome.md5_matches, None);
        assert_eq!(outcome.md5_actual, None);
    }

    #[tokio::test]
    async fn test_match() {
        let request = DownloadRequest::new("https://x/code.zip", "/tmp/d").md5("abc");
        let outcome = step(Ok("abc")).run(&request, result()).await.unwrap();
        assert_eq!(outcome.md5_matches, Some(true));
        assert_eq!(outcome.md5_actual, None);
    }

    #[tokio::test]
    async fn test_mismatch() {
        let request = DownloadRequest::new("https://x/code.zip", "/tmp/d").md5("abcwrong");
        let failure = step(Ok("abc")).run(&request, result()).await.unwrap_err();

        assert!(matches!(failure.error, Error::ChecksumMismatch { .. }));
        assert_eq!(failure.result.md5_matches, Some(false));
        assert_eq!(failure.result.md5_actual.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_comparison_is_case_sensitive() {
        let request = DownloadRequest::new("https://x/code.zip", "/tmp/d").md5("ABC");
        let failure = step(Ok("abc")).run(&request, result()).await.unwrap_err();
        assert!(matches!(failure.error, Error::ChecksumMismatch { .. }));
    }

    #[tokio::test]
    async fn test_unreadable_file() {
        let request = DownloadRequest::new("https://x/code.zip", "/tmp/d").md5("abc");
        let failure = step(Err(io::Error::from(io::ErrorKind::NotFound)))
            .run(&request, result())
            .await
            .unwrap_err();

        assert!(matches!(failure.error, Error::IOError { .. }));
        assert_eq!(failure.result.md5_matches, Some(false));
        assert_eq!(failure.result.md5_actual, None);
    }
}
