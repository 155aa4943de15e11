//! Download pipeline: size probe, destination, streaming copy with progress.
//!
//! The copy runs on a blocking thread (libcurl) while a
//! [`ProgressNotifier`] reports on the tokio runtime. Whatever the copy
//! returns, the notifier is stopped and awaited before [`download`] returns.
//! Partial files are left on disk when the copy fails.

mod get;
mod session;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::DownloadError;
use crate::fetch_head;
use crate::progress::{NotifierSummary, ProgressCounter, ProgressNotifier, ProgressReporter, TeeWriter};

pub use session::{interval_from_secs, CurlOptions, TransferSession};

/// Result of a completed download.
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    pub destination: PathBuf,
    /// Bytes written to the destination (equals the counter's final value).
    pub bytes_written: u64,
    /// Size announced by the probe.
    pub total: u64,
    /// Progress reports made while the copy ran.
    pub reports: NotifierSummary,
}

/// Runs one download described by `session`, calling `reporter` every
/// `session.interval()` while the body streams.
///
/// Steps: probe the size (abort before touching the filesystem on failure),
/// create/truncate the destination, start the notifier, stream the GET through
/// the byte counter into the file, then stop the notifier and wait for it.
pub async fn download<R: ProgressReporter>(
    session: &TransferSession,
    reporter: R,
) -> Result<TransferOutcome, DownloadError> {
    let url = session.url().as_str().to_string();
    let curl = session.curl_options().clone();

    let total = tokio::task::spawn_blocking({
        let url = url.clone();
        let curl = curl.clone();
        move || fetch_head::probe(&url, &curl)
    })
    .await
    .map_err(|e| DownloadError::Probe {
        message: format!("probe task: {}", e),
        source: None,
    })??;

    let destination = session.destination().to_path_buf();
    let file = File::create(&destination).map_err(|source| DownloadError::Destination {
        path: destination.clone(),
        source,
    })?;
    tracing::info!(
        url = %url,
        total,
        destination = %destination.display(),
        "starting transfer"
    );

    let counter = Arc::new(ProgressCounter::new(total));
    let notifier =
        ProgressNotifier::new(Arc::clone(&counter), session.interval(), reporter).start();

    let copied = tokio::task::spawn_blocking({
        let counter = Arc::clone(&counter);
        move || {
            let mut tee = TeeWriter::new(file, counter);
            get::stream_to(&url, &curl, &mut tee)
        }
    })
    .await;

    let reports = notifier.stop().await;

    let bytes_written = match copied {
        Ok(result) => result,
        Err(e) => Err(DownloadError::Transfer {
            message: format!("transfer task: {}", e),
            source: None,
        }),
    }
    .map_err(|e| {
        tracing::warn!(
            downloaded = counter.downloaded(),
            total,
            "transfer failed, partial file left at {}: {}",
            destination.display(),
            e
        );
        e
    })?;

    if bytes_written != total {
        tracing::warn!(
            bytes_written,
            total,
            "body length differs from probed Content-Length"
        );
    }
    tracing::info!(
        bytes_written,
        ticks = reports.ticks,
        "transfer complete: {}",
        destination.display()
    );

    Ok(TransferOutcome {
        destination,
        bytes_written,
        total,
        reports,
    })
}
