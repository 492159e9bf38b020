//! Classification of the fetch tool's exit status.
//!
//! wget documents a small set of exit codes. Anything outside that table,
//! and every signal-terminated exit, is reported as [`ExitReason::Other`]
//! carrying the raw code and signal name.

use std::fmt;
use std::process::ExitStatus;

/// Why the fetch tool did not exit cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    /// Code 1, generic tool error.
    Generic,
    /// Code 2, parse error (bad command line or config).
    Parse,
    /// Code 3, file I/O error.
    FileIo,
    /// Code 4, network failure.
    Network,
    /// Code 5, SSL verification failure.
    Ssl,
    /// Code 6, username/password authentication failure.
    Auth,
    /// Code 7, protocol error.
    Protocol,
    /// Code 8, the server issued an error response.
    Server,
    /// Any other code, or termination by a signal.
    Other {
        code: Option<i32>,
        signal: Option<String>,
    },
}

impl ExitReason {
    /// Map a raw `(code, signal)` pair onto the taxonomy.
    ///
    /// A present signal always wins over the code table, so a process that
    /// was terminated reports the signal name.
    pub fn from_status(code: Option<i32>, signal: Option<&str>) -> Self {
        if signal.is_some() {
            return ExitReason::Other {
                code,
                signal: signal.map(String::from),
            };
        }

        match code {
            Some(1) => ExitReason::Generic,
            Some(2) => ExitReason::Parse,
            Some(3) => ExitReason::FileIo,
            Some(4) => ExitReason::Network,
            Some(5) => ExitReason::Ssl,
            Some(6) => ExitReason::Auth,
            Some(7) => ExitReason::Protocol,
            Some(8) => ExitReason::Server,
            code => ExitReason::Other { code, signal: None },
        }
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::Generic => f.write_str("Wget error"),
            ExitReason::Parse => f.write_str("Parse error"),
            ExitReason::FileIo => f.write_str("File I/O error"),
            ExitReason::Network => f.write_str("Network failure"),
            ExitReason::Ssl => f.write_str("SSL verification failure"),
            ExitReason::Auth => f.write_str("Username/password authentication failure"),
            ExitReason::Protocol => f.write_str("Protocol error"),
            ExitReason::Server => f.write_str("Server issued an error response"),
            ExitReason::Other { code, signal } => {
                f.write_str("Download error")?;
                if let Some(code) = code.filter(|c| *c != 0) {
                    write!(f, ". Code: {}", code)?;
                }
                if let Some(signal) = signal {
                    write!(f, ". Signal: {}", signal)?;
                }
                Ok(())
            }
        }
    }
}

/// Split an [`ExitStatus`] into its exit code and signal name.
pub(crate) fn split_status(status: &ExitStatus) -> (Option<i32>, Option<String>) {
    (status.code(), signal_of(status))
}

#[cfg(unix)]
fn signal_of(status: &ExitStatus) -> Option<String> {
    use std::os::unix::process::ExitStatusExt;
    status.signal().map(signal_name)
}

#[cfg(not(unix))]
fn signal_of(_status: &ExitStatus) -> Option<String> {
    None
}

/// Conventional name of a signal number.
#[cfg(unix)]
pub(crate) fn signal_name(signal: i32) -> String {
    let name = match signal {
        libc::SIGHUP => "SIGHUP",
        libc::SIGINT => "SIGINT",
        libc::SIGQUIT => "SIGQUIT",
        libc::SIGILL => "SIGILL",
        libc::SIGTRAP => "SIGTRAP",
        libc::SIGABRT => "SIGABRT",
        libc::SIGBUS => "SIGBUS",
        libc::SIGFPE => "SIGFPE",
        libc::SIGKILL => "SIGKILL",
        libc::SIGUSR1 => "SIGUSR1",
        libc::SIGSEGV => "SIGSEGV",
        libc::SIGUSR2 => "SIGUSR2",
        libc::SIGPIPE => "SIGPIPE",
        libc::SIGALRM => "SIGALRM",
        libc::SIGTERM => "SIGTERM",
        other => return format!("SIG{}", other),
    };
    name.to_string()
}
