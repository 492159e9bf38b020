//! Post-download processing.
//!
//! After a clean exit of the fetch tool the result runs through an ordered
//! list of [`Step`]s. Each step receives the request and the result built
//! so far and returns an enriched result or a [`Failure`]. The first failure
//! stops the chain.
//!
//! The default chain is [`ChecksumStep`] followed by [`ExtractStep`], so an
//! archive whose digest does not match is never extracted.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use wget_relay::archive::ArchiveExtractor;
//! use wget_relay::hash::Md5Checksum;
//! use wget_relay::pipeline::Pipeline;
//!
//! let pipeline = Pipeline::post_download(Arc::new(Md5Checksum), Arc::new(ArchiveExtractor));
//! assert_eq!(pipeline.step_names(), vec!["checksum", "extract"]);
//! ```

pub mod checksum;
pub mod extract;

pub use checksum::ChecksumStep;
pub use extract::ExtractStep;

use crate::archive::Extractor;
use crate::hash::ChecksumProvider;
use crate::request::{DownloadRequest, DownloadResult, Outcome};

use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// One fallible stage of post-processing.
pub trait Step: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Run the step. Steps that do not apply to `request` return `result`
    /// unchanged.
    fn run<'a>(
        &'a self,
        request: &'a DownloadRequest,
        result: DownloadResult,
    ) -> BoxFuture<'a, Outcome>;
}

/// An ordered list of steps that short-circuits on the first failure.
#[derive(Default)]
pub struct Pipeline {
    steps: Vec<Box<dyn Step>>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("steps", &self.step_names())
            .finish()
    }
}

impl Pipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checksum verification, then extraction.
    pub fn post_download(
        checksum: Arc<dyn ChecksumProvider>,
        extractor: Arc<dyn Extractor>,
    ) -> Self {
        Self::new()
            .step(ChecksumStep::new(checksum))
            .step(ExtractStep::new(extractor))
    }

    /// Append a step.
    pub fn step(mut self, step: impl Step + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Names of the steps in execution order.
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run every step in order.
    pub async fn run(&self, request: &DownloadRequest, mut result: DownloadResult) -> Outcome {
        for step in &self.steps {
            debug!("Running {} step", step.name());
            result = step.run(request, result).await?;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use futures::future::FutureExt;
    use std::path::PathBuf;
    use std::sync::Mutex;

    struct Record {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
        fail: bool,
    }

    impl Step for Record {
        fn name(&self) -> &'static str {
            self.name
        }

        fn run<'a>(
            &'a self,
            _request: &'a DownloadRequest,
            result: DownloadResult,
        ) -> BoxFuture<'a, Outcome> {
            async move {
                self.log.lock().unwrap().push(self.name);
                if self.fail {
                    Err(result.fail(Error::Internal(self.name.into())))
                } else {
                    Ok(result)
                }
            }
            .boxed()
        }
    }

    fn record(name: &'static str, log: &Arc<Mutex<Vec<&'static str>>>, fail: bool) -> Record {
        Record {
            name,
            log: log.clone(),
            fail,
        }
    }

    #[tokio::test]
    async fn test_runs_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::new()
            .step(record("first", &log, false))
            .step(record("second", &log, false));

        let request = DownloadRequest::new("https://x/code.zip", "/tmp/d");
        let outcome = pipeline
            .run(&request, DownloadResult::new(PathBuf::from("/tmp/d/code.zip")))
            .await;

        assert!(outcome.is_ok());
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_short_circuits() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::new()
            .step(record("first", &log, true))
            .step(record("second", &log, false));

        let request = DownloadRequest::new("https://x/code.zip", "/tmp/d");
        let failure = pipeline
            .run(&request, DownloadResult::new(PathBuf::from("/tmp/d/code.zip")))
            .await
            .unwrap_err();

        assert_eq!(failure.to_string(), "Internal error: first");
        assert_eq!(*log.lock().unwrap(), vec!["first"]);
    }

    #[tokio::test]
    async fn test_empty_pipeline_passes_through() {
        let request = DownloadRequest::new("https://x/code.zip", "/tmp/d");
        let result = DownloadResult::new(PathBuf::from("/tmp/d/code.zip"));
        let outcome = Pipeline::new().run(&request, result.clone()).await.unwrap();
        assert_eq!(outcome, result);
    }
}
