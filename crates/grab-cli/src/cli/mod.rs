//! CLI for the `grab` downloader.

use anyhow::Result;
use clap::Parser;
use grab_core::config::{self, GrabConfig};
use grab_core::error::DownloadError;
use grab_core::progress;
use grab_core::transfer::{self, TransferSession};
use std::path::PathBuf;

/// Download a URL to a file, printing progress at a fixed interval.
#[derive(Debug, Parser)]
#[command(name = "grab", version)]
#[command(about = "Download a URL to a file, reporting progress at a fixed interval", long_about = None)]
pub struct Cli {
    /// The path to which the file will be downloaded (default: the URL's last path segment).
    #[arg(short = 'p', long = "path", value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Seconds between progress lines (must be >= 1; default from config, normally 1).
    #[arg(
        short = 'i',
        long = "interval",
        value_name = "SECONDS",
        allow_negative_numbers = true
    )]
    pub interval: Option<i64>,

    /// Absolute URL (scheme and host) to download.
    pub url: String,
}

/// Parses process arguments. Usage errors exit with status 1; `--help` and `--version` with 0.
pub fn parse_args() -> Cli {
    Cli::try_parse().unwrap_or_else(|err| {
        let code = if err.use_stderr() { 1 } else { 0 };
        let _ = err.print();
        std::process::exit(code);
    })
}

pub async fn run(cli: Cli) -> Result<()> {
    let cfg = config::load_or_init()
        .map_err(|e| DownloadError::Config(format!("load config: {:#}", e)))?;
    tracing::debug!("loaded config: {:?}", cfg);
    run_with_config(cli, &cfg).await
}

pub async fn run_with_config(cli: Cli, cfg: &GrabConfig) -> Result<()> {
    let session = TransferSession::from_args(&cli.url, cli.path, cli.interval, cfg)?;

    println!("Starting download of: {}", cli.url);
    let outcome = transfer::download(&session, |downloaded: u64, total: u64| {
        println!("{}", progress::progress_line(downloaded, total));
    })
    .await?;

    println!("Done! Downloaded {} bytes", outcome.bytes_written);
    println!(
        "You can find the downloaded file at {}",
        outcome.destination.display()
    );
    Ok(())
}
