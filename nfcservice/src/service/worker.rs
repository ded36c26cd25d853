// nfcservice/src/service/worker.rs

use std::panic::{AssertUnwindSafe, catch_unwind};

use crossbeam_channel::Sender;
use log::{debug, error};

use crate::{Error, Result};

pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

/// Single background thread running power-transition jobs in submission
/// order. The thread exits once every sender is gone and the queue drains;
/// a job in progress is never interrupted.
pub(crate) struct TaskWorker {
    tx: Sender<Job>,
}

impl TaskWorker {
    pub(crate) fn spawn(name: &str) -> Result<Self> {
        let (tx, rx) = crossbeam_channel::unbounded::<Job>();
        std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                for job in rx {
                    // A panicking job drops its completion sender, which the
                    // waiter observes as a disconnect.
                    if catch_unwind(AssertUnwindSafe(job)).is_err() {
                        error!("power transition job panicked");
                    }
                }
                debug!("task worker exiting");
            })
            .map_err(|e| Error::Worker(e.to_string()))?;
        Ok(Self { tx })
    }

    pub(crate) fn submit(&self, job: Job) -> Result<()> {
        self.tx
            .send(job)
            .map_err(|_| Error::Worker("task worker stopped".to_string()))
    }
}
