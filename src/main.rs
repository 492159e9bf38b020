use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use wget_relay::{DownloadRequest, DownloaderBuilder, ProgressBarOpts, ProgressDisplay};

/// Download a file with wget, verify it and unpack it.
#[derive(Parser, Debug)]
#[command(name = "wget-relay", version, about)]
struct Cli {
    /// Address of the file to download.
    uri: String,
    /// Directory to save the file into.
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,
    /// File name, derived from the URI when omitted.
    #[arg(short, long)]
    output: Option<String>,
    /// Expected MD5 digest of the file.
    #[arg(long)]
    md5: Option<String>,
    /// Extract the downloaded archive into this directory.
    #[arg(long)]
    extract: Option<PathBuf>,
    /// Transfer rate cap.
    #[arg(long)]
    limit: Option<f64>,
    /// Unit of the rate cap, e.g. `k` or `m`.
    #[arg(long, requires = "limit")]
    limit_unit: Option<String>,
    /// Start over instead of continuing a partial file.
    #[arg(long)]
    no_resume: bool,
    /// Extra request header, e.g. `Authorization: Bearer abc`.
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,
    /// Option passed to wget as is.
    #[arg(long = "wget-option", allow_hyphen_values = true)]
    wget_options: Vec<String>,
    /// Minimum milliseconds between two progress updates.
    #[arg(long)]
    interval_ms: Option<u64>,
    /// Stop the transfer after this many seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Print the wget command line.
    #[arg(long)]
    debug: bool,
    /// Log more.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn request(&self) -> DownloadRequest {
        let mut request = DownloadRequest::new(self.uri.as_str(), self.dir.as_path());
        request.destination_file_name = self.output.clone();
        request.md5 = self.md5.clone();
        request.extract_dir = self.extract.clone();
        request.download_speed_limit = self.limit;
        request.download_speed_limit_unit = self.limit_unit.clone();
        request.headers = self.headers.clone();
        request.extra_options = self.wget_options.clone();
        request.progress_update_interval = self.interval_ms.map(Duration::from_millis);
        if self.no_resume {
            request.resume_download = Some(false);
        }
        if self.debug {
            request.debug = Some(true);
        }
        request
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "wget_relay=debug"
    } else {
        "wget_relay=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let downloader = DownloaderBuilder::new().build();
    let display = Arc::new(ProgressDisplay::new(ProgressBarOpts::default()));
    let (done, finished) = oneshot::channel();

    let bar = display.clone();
    let started = downloader.download_with_progress(
        cli.request(),
        move |_| {
            let _ = done.send(());
        },
        move |_, event| bar.update(event),
    );

    let handle = match started {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(secs) = cli.timeout_secs {
        tokio::select! {
            _ = finished => {}
            _ = tokio::time::sleep(Duration::from_secs(secs)) => {
                warn!("Timed out after {}s, stopping wget", secs);
                handle.terminate();
            }
        }
    }

    match handle.wait().await {
        Ok(result) => {
            display.finish();
            if let Some(info) = result.debug_info {
                println!("Command: {}", info.command);
            }
            println!("Saved {}", result.destination_file_path.display());
            if result.md5_matches == Some(true) {
                println!("MD5 verified");
            }
            if let Some(dir) = result.extract_dir {
                println!("Extracted into {}", dir.display());
            }
            ExitCode::SUCCESS
        }
        Err(failure) => {
            display.abandon(failure.to_string());
            if let Some(info) = &failure.result.debug_info {
                eprintln!("Command: {}", info.command);
            }
            eprintln!("Error: {}", failure);
            ExitCode::FAILURE
        }
    }
}
