use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use wget_relay::{DownloadRequest, Downloader, DownloaderBuilder, Outcome, ProgressEvent};

// Common test constants
pub const TEST_URI: &str = "https://example.com/files/code.zip";
pub const HELLO_MD5: &str = "5d41402abc4b2a76b9719d911017c592";

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates a temporary file with the given content
pub fn create_temp_file(dir: &Path, filename: &str, content: &[u8]) -> PathBuf {
    let file_path = dir.join(filename);
    fs::write(&file_path, content).expect("Failed to write temporary file");
    file_path
}

/// Creates a tarball holding a single file
pub fn create_tar_fixture(dir: &Path, filename: &str, entry: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(filename);
    let file = fs::File::create(&path).expect("Failed to create tarball");
    let mut builder = tar::Builder::new(file);
    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder
        .append_data(&mut header, entry, content)
        .expect("Failed to append tar entry");
    builder.finish().expect("Failed to finish tarball");
    path
}

/// Asserts that a file exists at the given path
pub fn assert_file_exists(path: &Path) {
    assert!(path.exists(), "File should exist at path: {:?}", path);
}

// === Fake fetch tool ===

/// Behaviour of a generated stand-in for wget.
#[derive(Debug, Clone)]
pub struct FakeWget {
    /// Lines printed to stderr, the way wget reports progress.
    pub progress: Vec<String>,
    /// End progress lines with `\r` instead of `\n`, like an interactive bar.
    pub carriage_returns: bool,
    /// Content written to the `-O` path.
    pub body: String,
    /// File copied to the `-O` path instead of `body`.
    pub copy_from: Option<PathBuf>,
    /// File receiving the argument vector, one argument per line.
    pub record_args: Option<PathBuf>,
    /// Keep running instead of exiting.
    pub hang: bool,
    pub exit_code: i32,
}

impl Default for FakeWget {
    fn default() -> Self {
        Self {
            progress: Vec::new(),
            carriage_returns: false,
            body: "hello".to_string(),
            copy_from: None,
            record_args: None,
            hang: false,
            exit_code: 0,
        }
    }
}

impl FakeWget {
    pub fn with_progress(mut self, lines: &[&str]) -> Self {
        self.progress = lines.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn carriage_returns(mut self) -> Self {
        self.carriage_returns = true;
        self
    }

    pub fn exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    pub fn hang(mut self) -> Self {
        self.hang = true;
        self
    }

    pub fn copy_from(mut self, path: &Path) -> Self {
        self.copy_from = Some(path.to_path_buf());
        self
    }

    pub fn record_args(mut self, path: &Path) -> Self {
        self.record_args = Some(path.to_path_buf());
        self
    }

    fn script(&self) -> String {
        let mut script = String::from("#!/bin/sh\n");
        if let Some(ref path) = self.record_args {
            script.push_str(&format!("printf '%s\\n' \"$@\" > '{}'\n", path.display()));
        }
        script.push_str(
            "out=\"\"\nwhile [ $# -gt 0 ]; do\n  if [ \"$1\" = \"-O\" ]; then out=\"$2\"; shift; fi\n  shift\ndone\n",
        );
        script.push_str("printf 'Saving to: %s\\n' \"$out\" >&2\n");
        let end = if self.carriage_returns { "\\r" } else { "\\n" };
        for line in &self.progress {
            script.push_str(&format!("printf '%s{}' '{}' >&2\n", end, line));
        }
        match self.copy_from {
            Some(ref source) => script.push_str(&format!("cp '{}' \"$out\"\n", source.display())),
            None => script.push_str(&format!("printf '%s' '{}' > \"$out\"\n", self.body)),
        }
        if self.hang {
            script.push_str("exec sleep 30\n");
        }
        script.push_str(&format!("exit {}\n", self.exit_code));
        script
    }

    /// Write the script into `dir` and return its path.
    #[cfg(unix)]
    pub fn install(&self, dir: &Path) -> PathBuf {
        write_executable(dir, "fake-wget", &self.script())
    }
}

/// Write an executable file.
#[cfg(unix)]
pub fn write_executable(dir: &Path, name: &str, content: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("Failed to make script executable");
    path
}

/// Creates a downloader running `program` without progress debouncing
pub fn create_test_downloader(program: &Path) -> Downloader {
    DownloaderBuilder::new()
        .program(program.to_string_lossy())
        .progress_update_interval(Duration::ZERO)
        .build()
}

/// Creates a request for [`TEST_URI`] saved into `dir`
pub fn create_test_request(dir: &Path) -> DownloadRequest {
    DownloadRequest::new(TEST_URI, dir)
}

// === Callback recording ===

/// Everything the callbacks of one download observed, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Seen {
    Progress(ProgressEvent),
    Complete(bool),
}

/// Starts a download, waits for it and returns the outcome with the
/// callback log.
pub async fn run_download(downloader: &Downloader, request: DownloadRequest) -> (Outcome, Vec<Seen>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let on_complete = log.clone();
    let on_progress = log.clone();

    let handle = downloader
        .download_with_progress(
            request,
            move |outcome| {
                on_complete
                    .lock()
                    .unwrap()
                    .push(Seen::Complete(outcome.is_ok()));
            },
            move |_, event| {
                on_progress
                    .lock()
                    .unwrap()
                    .push(Seen::Progress(event.clone()));
            },
        )
        .expect("Download should start");

    let outcome = handle.wait().await;
    let seen = log.lock().unwrap().clone();
    (outcome, seen)
}

/// Percentages reported through the progress callback.
pub fn percents(seen: &[Seen]) -> Vec<u8> {
    seen.iter()
        .filter_map(|s| match s {
            Seen::Progress(event) => Some(event.percent),
            Seen::Complete(_) => None,
        })
        .collect()
}

/// Asserts the completion callback fired once, after every progress callback.
pub fn assert_completed_once_last(seen: &[Seen]) {
    let completions = seen
        .iter()
        .filter(|s| matches!(s, Seen::Complete(_)))
        .count();
    assert_eq!(completions, 1, "completion should fire once: {:?}", seen);
    assert!(
        matches!(seen.last(), Some(Seen::Complete(_))),
        "completion should fire last: {:?}",
        seen
    );
}
