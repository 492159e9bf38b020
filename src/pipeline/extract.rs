//! Archive extraction step.

use super::Step;
use crate::archive::Extractor;
use crate::request::{DownloadRequest, DownloadResult, Outcome};

use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use tracing::debug;

/// Extracts the downloaded file into `request.extract_dir`, if set.
pub struct ExtractStep {
    extractor: Arc<dyn Extractor>,
}

impl ExtractStep {
    pub fn new(extractor: Arc<dyn Extractor>) -> Self {
        Self { extractor }
    }
}

impl Step for ExtractStep {
    fn name(&self) -> &'static str {
        "extract"
    }

    fn run<'a>(
        &'a self,
        request: &'a DownloadRequest,
        mut result: DownloadResult,
    ) -> BoxFuture<'a, Outcome> {
        async move {
            let Some(target) = request.extract_dir.as_deref() else {
                return Ok(result);
            };

            debug!("Extracting {:?} into {:?}", result.destination_file_path, target);
            let extracted = self
                .extractor
                .extract(&result.destination_file_path, target)
                .await;

            match extracted {
                Ok(()) => {
                    result.extract_dir = Some(target.to_path_buf());
                    Ok(result)
                }
                Err(e) => Err(result.fail(e)),
            }
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
        fail: bool,
    }

    impl Extractor for Counting {
        fn extract<'a>(&'a self, _archive: &'a Path, _target: &'a Path) -> BoxFuture<'a, Result<()>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let fail = self.fail;
            async move {
                if fail {
                    Err(Error::UnsupportedArchive("code.zip".into()))
                } else {
                    Ok(())
                }
            }
            .boxed()
        }
    }

    fn result() -> DownloadResult {
        DownloadResult::new(PathBuf::from("/tmp/d/code.zip"))
    }

    #[tokio::test]
    async fn test_skipped_without_extract_dir() {
        let extractor = Arc::new(Counting::default());
        let request = DownloadRequest::new("https://x/code.zip", "/tmp/d");

        let outcome = ExtractStep::new(extractor.clone())
            .run(&request, result())
            .await
            .unwrap();

        assert_eq!(outcome.extract_dir, None);
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_extracts() {
        let extractor = Arc::new(Counting::default());
        let request = DownloadRequest::new("https://x/code.zip", "/tmp/d").extract_to("/tmp/d/zip");

        let outcome = ExtractStep::new(extractor.clone())
            .run(&request, result())
            .await
            .unwrap();

        assert_eq!(outcome.extract_dir, Some(PathBuf::from("/tmp/d/zip")));
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_propagates() {
        let extractor = Arc::new(Counting {
            fail: true,
            ..Counting::default()
        });
        let request = DownloadRequest::new("https://x/code.zip", "/tmp/d").extract_to("/tmp/d/zip");

        let failure = ExtractStep::new(extractor)
            .run(&request, result())
            .await
            .unwrap_err();

        assert!(matches!(failure.error, Error::UnsupportedArchive(_)));
        assert_eq!(failure.result.extract_dir, None);
    }
}
