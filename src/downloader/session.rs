//! One running download.
//!
//! A session owns the child process for its whole life. A single task
//! multiplexes both output streams, the control channel of the
//! [`DownloadHandle`](super::DownloadHandle) and the exit of the child, so
//! the accumulated [`DownloadResult`] is never shared between threads.
//!
//! Output lines that contain a `%` are parsed into [`ProgressEvent`]s and
//! dispatched through a [`Debouncer`] common to both streams. Once the child
//! exits the window is cleared, the outcome is classified and, after a clean
//! exit, the result runs through the post-download [`Pipeline`]. The
//! completion callback fires exactly once, after every progress callback.

use super::config::{CompletionCallback, ProgressCallback};
use super::exit::{split_status, ExitReason};
use super::handle::Control;
use crate::command::Job;
use crate::error::Error;
use crate::pipeline::Pipeline;
use crate::progress::{parse_line, Debouncer, ProgressEvent};
use crate::request::{DownloadResult, ExitInfo, Outcome};

use std::io;
use std::process::ExitStatus;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

pub(crate) struct Session {
    pub(crate) job: Job,
    pub(crate) program: String,
    pub(crate) result: DownloadResult,
    pub(crate) pipeline: Arc<Pipeline>,
    pub(crate) on_progress: Option<ProgressCallback>,
}

impl Session {
    /// Drive the download to completion and fire `on_complete` once.
    pub(crate) async fn run(
        self,
        spawned: io::Result<Child>,
        control: UnboundedReceiver<Control>,
        on_complete: CompletionCallback,
    ) -> Outcome {
        let outcome = match spawned {
            Ok(child) => self.supervise(child, control).await,
            Err(source) => {
                warn!("Could not start {}: {}", self.program, source);
                let mut result = self.result;
                result.error = Some(ExitInfo::default());
                Err(result.fail(Error::Spawn {
                    program: self.program,
                    source,
                }))
            }
        };

        match &outcome {
            Ok(result) => info!("Downloaded {:?}", result.destination_file_path),
            Err(failure) => warn!(
                "Download of {:?} failed: {}",
                failure.result.destination_file_path, failure
            ),
        }

        on_complete(&outcome);
        outcome
    }

    async fn supervise(
        mut self,
        mut child: Child,
        control: UnboundedReceiver<Control>,
    ) -> Outcome {
        let mut stdout = child.stdout.take().map(|s| Lines::new(BufReader::new(s)));
        let mut stderr = child.stderr.take().map(|s| Lines::new(BufReader::new(s)));
        let mut control = Some(control);
        let mut process_error: Option<io::Error> = None;
        let mut progress = Progress::new(Debouncer::new(self.job.progress_interval));

        let status = loop {
            tokio::select! {
                biased;

                segment = next_segment(&mut stdout) => match segment {
                    Ok(Some(bytes)) => progress.feed(&bytes, &mut self.result, self.on_progress.as_ref()),
                    Ok(None) => stdout = None,
                    Err(e) => {
                        stdout = None;
                        capture(&mut child, &mut process_error, e);
                    }
                },
                segment = next_segment(&mut stderr) => match segment {
                    Ok(Some(bytes)) => progress.feed(&bytes, &mut self.result, self.on_progress.as_ref()),
                    Ok(None) => stderr = None,
                    Err(e) => {
                        stderr = None;
                        capture(&mut child, &mut process_error, e);
                    }
                },
                request = next_control(&mut control) => match request {
                    Some(request) => {
                        if let Err(e) = deliver(&mut child, request) {
                            warn!("Could not deliver {:?}: {}", request, e);
                        }
                    }
                    None => control = None,
                },
                status = child.wait() => break status,
            }
        };

        // Requests arriving during post-processing have no process to reach.
        drop(control);
        progress.debouncer.clear();
        let status = match status {
            Ok(status) => Some(status),
            Err(e) => {
                process_error.get_or_insert(e);
                None
            }
        };

        self.classify(status, process_error, progress.last).await
    }

    async fn classify(
        self,
        status: Option<ExitStatus>,
        process_error: Option<io::Error>,
        last: Option<ProgressEvent>,
    ) -> Outcome {
        let (code, signal) = status.as_ref().map(split_status).unwrap_or_default();
        debug!("{} exited with code {:?}, signal {:?}", self.program, code, signal);

        let mut result = self.result;

        if code == Some(0) && signal.is_none() {
            result.progress = 100;
            if let Some(on_progress) = self.on_progress.as_ref() {
                if last.as_ref().map_or(true, |event| event.percent < 100) {
                    on_progress(&result, &ProgressEvent::completed(last.as_ref()));
                }
            }
            return self.pipeline.run(&self.job.request, result).await;
        }

        let error = match process_error {
            Some(source) => Error::Process { source },
            None => Error::Exit(ExitReason::from_status(code, signal.as_deref())),
        };
        result.error = Some(ExitInfo { code, signal });
        Err(result.fail(error))
    }
}

/// Progress tracking shared by both output streams.
struct Progress {
    debouncer: Debouncer,
    last: Option<ProgressEvent>,
}

impl Progress {
    fn new(debouncer: Debouncer) -> Self {
        Self {
            debouncer,
            last: None,
        }
    }

    fn feed(
        &mut self,
        line: &[u8],
        result: &mut DownloadResult,
        on_progress: Option<&ProgressCallback>,
    ) {
        if !line.contains(&b'%') || !self.debouncer.try_acquire() {
            return;
        }

        let event = parse_line(&String::from_utf8_lossy(line));
        result.progress = event.percent;
        if let Some(on_progress) = on_progress {
            on_progress(result, &event);
        }
        self.last = Some(event);
    }
}

/// Splits a stream on `\n` and on `\r`.
///
/// Interactive bars redraw in place with carriage returns and may never
/// print a newline until the transfer ends.
struct Lines<R> {
    reader: R,
    pending: Vec<u8>,
}

impl<R: AsyncBufRead + Unpin> Lines<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            pending: Vec::new(),
        }
    }

    /// Next line without its terminator, `None` at end of stream.
    ///
    /// Cancel safe: partial input stays in `pending`.
    async fn next_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        loop {
            let available = self.reader.fill_buf().await?;
            if available.is_empty() {
                if self.pending.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(std::mem::take(&mut self.pending)));
            }

            match available.iter().position(|b| matches!(b, b'\n' | b'\r')) {
                Some(end) => {
                    self.pending.extend_from_slice(&available[..end]);
                    self.reader.consume(end + 1);
                    return Ok(Some(std::mem::take(&mut self.pending)));
                }
                None => {
                    let len = available.len();
                    self.pending.extend_from_slice(available);
                    self.reader.consume(len);
                }
            }
        }
    }
}

async fn next_segment<R>(reader: &mut Option<Lines<R>>) -> io::Result<Option<Vec<u8>>>
where
    R: AsyncBufRead + Unpin,
{
    match reader {
        Some(reader) => reader.next_line().await,
        None => std::future::pending().await,
    }
}

async fn next_control(control: &mut Option<UnboundedReceiver<Control>>) -> Option<Control> {
    match control {
        Some(control) => control.recv().await,
        None => std::future::pending().await,
    }
}

/// Keep the first process-level error and interrupt the child so that its
/// exit still gets observed.
fn capture(child: &mut Child, slot: &mut Option<io::Error>, error: io::Error) {
    warn!("Output stream failed: {}", error);
    if slot.is_some() {
        return;
    }
    *slot = Some(error);
    if let Err(e) = interrupt(child) {
        warn!("Could not interrupt process: {}", e);
    }
}

fn deliver(child: &mut Child, request: Control) -> io::Result<()> {
    match request {
        Control::Terminate => terminate(child),
        Control::Kill => child.start_kill(),
    }
}

#[cfg(unix)]
fn interrupt(child: &mut Child) -> io::Result<()> {
    send_signal(child, libc::SIGINT)
}

#[cfg(unix)]
fn terminate(child: &mut Child) -> io::Result<()> {
    send_signal(child, libc::SIGTERM)
}

#[cfg(not(unix))]
fn interrupt(child: &mut Child) -> io::Result<()> {
    child.start_kill()
}

#[cfg(not(unix))]
fn terminate(child: &mut Child) -> io::Result<()> {
    child.start_kill()
}

#[cfg(unix)]
fn send_signal(child: &Child, signal: libc::c_int) -> io::Result<()> {
    // `id` is `None` once the child has been reaped.
    let Some(pid) = child.id() else {
        return Ok(());
    };
    let pid = libc::pid_t::try_from(pid)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    // SAFETY: `kill` has no memory safety requirements and the pid belongs
    // to a child that has not been reaped yet.
    let rc = unsafe { libc::kill(pid, signal) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::time::Duration;

    fn collect() -> (Arc<Mutex<Vec<u8>>>, ProgressCallback) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let callback: ProgressCallback = Box::new(move |_result, event| {
            sink.lock().unwrap().push(event.percent);
        });
        (seen, callback)
    }

    #[tokio::test(start_paused = true)]
    async fn test_feed_dispatches_percent_lines() {
        let (seen, callback) = collect();
        let mut progress = Progress::new(Debouncer::new(Duration::ZERO));
        let mut result = DownloadResult::new(PathBuf::from("/tmp/d/code.zip"));

        progress.feed(b"Resolving example.com... 93.184.216.34", &mut result, Some(&callback));
        progress.feed(b"  1450K .......... 42% 1.23M 12s", &mut result, Some(&callback));

        assert_eq!(*seen.lock().unwrap(), vec![42]);
        assert_eq!(result.progress, 42);
        assert_eq!(progress.last.as_ref().map(|e| e.percent), Some(42));
    }

    async fn read_all<R: AsyncBufRead + Unpin>(reader: R) -> Vec<String> {
        let mut lines = Lines::new(reader);
        let mut out = Vec::new();
        while let Some(line) = lines.next_line().await.unwrap() {
            out.push(String::from_utf8(line).unwrap());
        }
        out
    }

    #[tokio::test]
    async fn test_lines_split_on_carriage_return_and_newline() {
        let input: &[u8] = b"code.zip  10%[=> ] 1M 9s\rcode.zip  40%[==> ] 1M 6s\rdone\nlast";
        assert_eq!(
            read_all(input).await,
            vec!["code.zip  10%[=> ] 1M 9s", "code.zip  40%[==> ] 1M 6s", "done", "last"]
        );
    }

    #[tokio::test]
    async fn test_lines_survive_small_buffers() {
        let input: &[u8] = b"  100K 10% 1M 9s\r\n  200K 20% 1M 8s\n";
        let reader = BufReader::with_capacity(3, input);
        assert_eq!(
            read_all(reader).await,
            vec!["  100K 10% 1M 9s", "", "  200K 20% 1M 8s"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_feed_is_debounced() {
        let (seen, callback) = collect();
        let mut progress = Progress::new(Debouncer::new(Duration::from_millis(100)));
        let mut result = DownloadResult::new(PathBuf::from("/tmp/d/code.zip"));

        progress.feed(b"  100K 10% 1M 9s", &mut result, Some(&callback));
        progress.feed(b"  200K 20% 1M 8s", &mut result, Some(&callback));
        tokio::time::advance(Duration::from_millis(100)).await;
        progress.feed(b"  300K 30% 1M 7s", &mut result, Some(&callback));

        assert_eq!(*seen.lock().unwrap(), vec![10, 30]);
        assert_eq!(result.progress, 30);
    }

    #[tokio::test(start_paused = true)]
    async fn test_feed_without_callback_tracks_progress() {
        let mut progress = Progress::new(Debouncer::new(Duration::ZERO));
        let mut result = DownloadResult::new(PathBuf::from("/tmp/d/code.zip"));

        progress.feed(b"  100K 55% 1M 9s", &mut result, None);
        assert_eq!(result.progress, 55);
    }

    fn session() -> Session {
        use crate::downloader::DownloaderConfig;
        use crate::request::DownloadRequest;

        let request = DownloadRequest::new("https://x/code.zip", "/tmp/d");
        let job = Job::resolve(request, &DownloaderConfig::default()).unwrap();
        Session {
            result: DownloadResult::new(job.destination_file_path.clone()),
            job,
            program: "wget".to_string(),
            pipeline: Arc::new(Pipeline::new()),
            on_progress: None,
        }
    }

    #[cfg(unix)]
    fn exited(code: i32) -> ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        ExitStatus::from_raw(code << 8)
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_error_wins_over_exit_code() {
        let stream_error = io::Error::new(io::ErrorKind::BrokenPipe, "stream closed");

        let failure = session()
            .classify(Some(exited(4)), Some(stream_error), None)
            .await
            .unwrap_err();

        assert!(matches!(failure.error, Error::Process { .. }));
        assert_eq!(
            failure.result.error,
            Some(ExitInfo {
                code: Some(4),
                signal: None
            })
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_code_without_process_error() {
        let failure = session()
            .classify(Some(exited(4)), None, None)
            .await
            .unwrap_err();

        assert_eq!(failure.to_string(), "Network failure");
        assert!(matches!(failure.error, Error::Exit(ExitReason::Network)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_clean_exit_with_process_error_succeeds() {
        let stream_error = io::Error::new(io::ErrorKind::BrokenPipe, "stream closed");

        let result = session()
            .classify(Some(exited(0)), Some(stream_error), None)
            .await
            .unwrap();

        assert_eq!(result.progress, 100);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_capture_keeps_first_error_and_interrupts() {
        let mut child = tokio::process::Command::new("sleep")
            .arg("30")
            .kill_on_drop(true)
            .spawn()
            .unwrap();
        let mut slot = None;

        capture(&mut child, &mut slot, io::Error::new(io::ErrorKind::BrokenPipe, "first"));
        capture(&mut child, &mut slot, io::Error::other("second"));

        assert_eq!(slot.as_ref().map(|e| e.to_string()).as_deref(), Some("first"));
        let status = child.wait().await.unwrap();
        let (code, signal) = split_status(&status);
        assert_eq!(code, None);
        assert_eq!(signal.as_deref(), Some("SIGINT"));
    }
}
