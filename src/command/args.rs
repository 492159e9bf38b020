//! Argument vector for the fetch tool.
//!
//! The order of the produced arguments is stable and callers script around
//! it: resume flag, rate limit, headers, passthrough options, output path,
//! and the URI last.

use super::job::Job;
use std::fmt;

/// The program and arguments to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Build the invocation of `program` for `job`.
    pub fn new(program: impl Into<String>, job: &Job) -> Self {
        Self {
            program: program.into(),
            args: build_args(job),
        }
    }

    /// The literal command line, program and arguments joined by spaces.
    pub fn command_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Produce the argument vector for `job`.
pub fn build_args(job: &Job) -> Vec<String> {
    let request = &job.request;
    let mut args = Vec::with_capacity(request.headers.len() + request.extra_options.len() + 5);

    if job.resume {
        args.push("-c".to_string());
    }

    if let Some(ref limit) = job.speed_limit {
        args.push(format!("--limit-rate={}", limit));
    }

    args.extend(request.headers.iter().map(|header| header_arg(header)));
    args.extend(request.extra_options.iter().cloned());

    args.push("-O".to_string());
    args.push(job.destination_file_path.to_string_lossy().into_owned());

    args.push(request.uri.clone());

    args
}

/// Wrap a raw header in single quotes after turning its own single quotes
/// into double quotes.
pub fn header_arg(header: &str) -> String {
    format!("--header='{}'", header.replace('\'', "\""))
}
