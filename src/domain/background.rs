//! Fire-and-forget work that must not hold up a response.
//!
//! Tasks are spawned onto a shared [`TaskTracker`]. Their failures are logged
//! and never reach the request that spawned them. On shutdown the tracker is
//! closed and drained so pending work (such as activation mail) completes
//! before the process exits.

use std::future::Future;
use std::time::Duration;

use tokio_util::task::TaskTracker;

/// Shared handle to the background task group.
#[derive(Clone, Default)]
pub struct BackgroundTasks {
    tracker: TaskTracker,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self {
            tracker: TaskTracker::new(),
        }
    }

    /// Spawns `task`. An `Err` outcome is logged under `name`.
    pub fn spawn<F>(&self, name: &'static str, task: F)
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.tracker.spawn(async move {
            match task.await {
                Ok(()) => tracing::debug!(task = name, "background task finished"),
                Err(e) => tracing::error!(task = name, error = %e, "background task failed"),
            }
        });
    }

    /// Number of tasks still running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    pub fn is_closed(&self) -> bool {
        self.tracker.is_closed()
    }

    /// Closes the group and waits for running tasks, up to `timeout`.
    ///
    /// Returns `true` if every task finished in time.
    pub async fn drain(&self, timeout: Duration) -> bool {
        self.tracker.close();
        let pending = self.tracker.len();
        if pending > 0 {
            tracing::info!(pending, "waiting for background tasks");
        }

        match tokio::time::timeout(timeout, self.tracker.wait()).await {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!(
                    pending = self.tracker.len(),
                    timeout_secs = timeout.as_secs(),
                    "background tasks did not finish before shutdown timeout"
                );
                false
            }
        }
    }
}
