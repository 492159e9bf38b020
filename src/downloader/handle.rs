//! Handle to a running download.

use crate::error::Error;
use crate::request::{DownloadResult, Outcome};

use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Requests forwarded from a [`DownloadHandle`] to its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Control {
    /// Ask the fetch tool to stop (`SIGTERM`).
    Terminate,
    /// Force the fetch tool to stop (`SIGKILL`).
    Kill,
}

/// A started download.
///
/// Dropping the handle does not stop the download; the completion callback
/// still fires. Use [`terminate`](Self::terminate) or [`kill`](Self::kill)
/// to cancel it.
#[derive(Debug)]
pub struct DownloadHandle {
    pid: Option<u32>,
    destination_file_path: PathBuf,
    control: mpsc::UnboundedSender<Control>,
    task: JoinHandle<Outcome>,
}

impl DownloadHandle {
    pub(crate) fn new(
        pid: Option<u32>,
        destination_file_path: PathBuf,
        control: mpsc::UnboundedSender<Control>,
        task: JoinHandle<Outcome>,
    ) -> Self {
        Self {
            pid,
            destination_file_path,
            control,
            task,
        }
    }

    /// OS identifier of the fetch tool, absent if it failed to start.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Where the file is being written.
    pub fn destination_file_path(&self) -> &Path {
        &self.destination_file_path
    }

    /// Ask the fetch tool to stop.
    ///
    /// The download then completes with a signal failure. Returns `false`
    /// once the fetch tool has exited, including while the checksum and
    /// extraction steps still run.
    pub fn terminate(&self) -> bool {
        self.send(Control::Terminate)
    }

    /// Force the fetch tool to stop.
    pub fn kill(&self) -> bool {
        self.send(Control::Kill)
    }

    /// Whether the completion callback already ran.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the download and return the value the completion callback
    /// received.
    pub async fn wait(self) -> Outcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => Err(DownloadResult::new(self.destination_file_path)
                .fail(Error::Internal(e.to_string()))),
        }
    }

    fn send(&self, control: Control) -> bool {
        debug!("Sending {:?} to pid {:?}", control, self.pid);
        self.control.send(control).is_ok()
    }
}
