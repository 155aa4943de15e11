//! Progress instrumentation for a single transfer.
//!
//! [`ProgressCounter`] is the pass-through byte counter fed by the copy loop
//! (through [`TeeWriter`]); [`ProgressNotifier`] is the background task that
//! reads it on a fixed interval and hands (downloaded, total) to a
//! [`ProgressReporter`] until the transfer sends its completion signal.

mod counter;
mod notifier;

pub use counter::{ProgressCounter, ProgressSnapshot, TeeWriter};
pub use notifier::{NotifierHandle, NotifierSummary, ProgressNotifier, ProgressReporter};

/// One mebibyte; progress lines report whole units of this.
pub const MB: u64 = 1 << 20;

/// Formats the per-tick progress line. Megabyte counts are truncated, not rounded.
pub fn progress_line(downloaded: u64, total: u64) -> String {
    format!(
        "Downloaded {} MB out of {} total MB",
        downloaded / MB,
        total / MB
    )
}
