// nfcservice/src/service/task.rs

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::warn;

use crate::service::shared::{Shared, Ticket};
use crate::{Error, Result};

/// An accepted power transition the caller may wait on.
///
/// Waiting is independent of the hardware work: when a wait times out the
/// state machine reverts and the worker keeps running; its late result is
/// discarded.
pub struct PendingTask {
    shared: Arc<Shared>,
    running: Option<(Ticket, Receiver<Result<()>>)>,
    budget: Duration,
}

impl PendingTask {
    pub(crate) fn running(
        shared: Arc<Shared>,
        ticket: Ticket,
        done: Receiver<Result<()>>,
        budget: Duration,
    ) -> Self {
        Self {
            shared,
            running: Some((ticket, done)),
            budget,
        }
    }

    /// A task that needed no hardware work.
    pub(crate) fn ready(shared: Arc<Shared>) -> Self {
        Self {
            shared,
            running: None,
            budget: Duration::ZERO,
        }
    }

    /// Whether the task was handed to the worker.
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Default wait for this task.
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Wait up to the task's default budget.
    pub fn wait(self) -> Result<()> {
        let budget = self.budget;
        self.wait_timeout(budget)
    }

    /// Wait up to `timeout`. On expiry the transition is reverted and
    /// `Error::Timeout` returned; the worker finishes in the background.
    pub fn wait_timeout(self, timeout: Duration) -> Result<()> {
        let Some((ticket, done)) = self.running else {
            return Ok(());
        };
        match done.recv_timeout(timeout) {
            Ok(outcome) => outcome,
            Err(RecvTimeoutError::Timeout) => {
                if self.shared.abandon(ticket) {
                    warn!("{} timed out after {:?}", ticket.task, timeout);
                    return Err(Error::Timeout);
                }
                // Committed just before the revert; the result is on its way.
                done.recv().unwrap_or_else(|_| {
                    Err(Error::Worker("task worker exited".to_string()))
                })
            }
            Err(RecvTimeoutError::Disconnected) => {
                self.shared.abandon(ticket);
                Err(Error::Worker(
                    "task worker exited before completion".to_string(),
                ))
            }
        }
    }

    /// Stop caring about the result.
    pub fn detach(self) {}

    /// Await the task's default budget without blocking the async runtime.
    #[cfg(feature = "async")]
    pub async fn wait_async(self) -> Result<()> {
        tokio::task::spawn_blocking(move || self.wait())
            .await
            .map_err(|e| Error::Worker(e.to_string()))?
    }
}
