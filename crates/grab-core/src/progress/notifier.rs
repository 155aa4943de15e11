//! Periodic progress reporting with a one-shot stop handshake.
//!
//! Lifecycle: [`ProgressNotifier`] (idle) → [`ProgressNotifier::start`] →
//! [`NotifierHandle`] (running) → [`NotifierHandle::stop`] → [`NotifierSummary`]
//! (stopped). `stop` consumes the handle, so the completion signal can be sent
//! only once, and it waits for the task to exit so the timer is gone before
//! the caller continues.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use super::ProgressCounter;

/// First-tick deadline for intervals that overflow `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Receives (downloaded, total) once per interval.
pub trait ProgressReporter: Send + Sync + 'static {
    fn on_tick(&self, downloaded: u64, total: u64);
}

impl<F> ProgressReporter for F
where
    F: Fn(u64, u64) + Send + Sync + 'static,
{
    fn on_tick(&self, downloaded: u64, total: u64) {
        self(downloaded, total)
    }
}

/// What the notifier did before it stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifierSummary {
    /// Number of reporter calls made.
    pub ticks: u64,
    /// Time from start until the completion signal was taken.
    pub elapsed: Duration,
}

/// A configured, not yet running notifier.
pub struct ProgressNotifier {
    counter: Arc<ProgressCounter>,
    interval: Duration,
    reporter: Arc<dyn ProgressReporter>,
}

impl ProgressNotifier {
    pub fn new<R: ProgressReporter>(
        counter: Arc<ProgressCounter>,
        interval: Duration,
        reporter: R,
    ) -> Self {
        Self {
            counter,
            interval,
            reporter: Arc::new(reporter),
        }
    }

    /// Spawns the reporting task on the current tokio runtime.
    ///
    /// The first report fires one full interval after start; there is no
    /// report at time zero and none on shutdown.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime, or with a zero interval.
    pub fn start(self) -> NotifierHandle {
        assert!(!self.interval.is_zero(), "progress interval must be non-zero");
        let (done_tx, done_rx) = oneshot::channel();
        let task = tokio::spawn(self.run(done_rx));
        NotifierHandle {
            done: Some(done_tx),
            task: Some(task),
        }
    }

    async fn run(self, mut done: oneshot::Receiver<()>) -> NotifierSummary {
        let start = Instant::now();
        // An interval too long to add to `start` never fires.
        let first = start
            .checked_add(self.interval)
            .unwrap_or_else(|| start + FAR_FUTURE);
        let mut ticker = time::interval_at(first, self.interval);
        let mut ticks = 0u64;

        loop {
            tokio::select! {
                biased;
                // A dropped sender also ends the loop.
                _ = &mut done => break,
                at = ticker.tick() => {
                    ticks += 1;
                    let elapsed = at.duration_since(start).as_secs();
                    tracing::debug!(elapsed_secs = elapsed, "running for {} seconds", elapsed);
                    let snapshot = self.counter.snapshot();
                    self.reporter.on_tick(snapshot.downloaded, snapshot.total);
                }
            }
        }

        drop(ticker);
        let summary = NotifierSummary {
            ticks,
            elapsed: start.elapsed(),
        };
        tracing::debug!(ticks = summary.ticks, "progress notifier stopped");
        summary
    }
}

/// A running notifier. Stop it with [`stop`](Self::stop).
///
/// Dropping the handle without stopping still sends the completion signal,
/// but nothing waits for the task to finish.
pub struct NotifierHandle {
    done: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<NotifierSummary>>,
}

impl NotifierHandle {
    /// Sends the completion signal and waits until the task has exited.
    pub async fn stop(mut self) -> NotifierSummary {
        if let Some(done) = self.done.take() {
            let _ = done.send(());
        }
        match self.task.take() {
            Some(task) => match task.await {
                Ok(summary) => summary,
                Err(e) => {
                    tracing::warn!("progress notifier task failed: {}", e);
                    NotifierSummary::default()
                }
            },
            None => NotifierSummary::default(),
        }
    }
}

impl Drop for NotifierHandle {
    fn drop(&mut self) {
        if let Some(done) = self.done.take() {
            let _ = done.send(());
        }
    }
}
