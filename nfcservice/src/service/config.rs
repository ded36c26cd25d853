//! Service configuration

use std::time::Duration;

use crate::types::NfcTask;
use crate::utils::{default_init_timeout, default_teardown_timeout};

/// Name of the power-transition worker thread
pub const WORKER_THREAD_NAME: &str = "nfc-task";

/// Wait budgets and boot behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Caller wait for TurnOn
    pub init_timeout: Duration,
    /// Caller wait for TurnOff
    pub teardown_timeout: Duration,
    /// Re-enable on `initialize` when the saved flag says the controller
    /// was last left on
    pub restore_saved_state: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            init_timeout: default_init_timeout(),
            teardown_timeout: default_teardown_timeout(),
            restore_saved_state: true,
        }
    }
}

impl ServiceConfig {
    /// Override the TurnOn wait.
    pub fn with_init_timeout(mut self, timeout: Duration) -> Self {
        self.init_timeout = timeout;
        self
    }

    /// Override the TurnOff wait.
    pub fn with_teardown_timeout(mut self, timeout: Duration) -> Self {
        self.teardown_timeout = timeout;
        self
    }

    /// Enable or disable the boot-time restore.
    pub fn with_restore_saved_state(mut self, restore: bool) -> Self {
        self.restore_saved_state = restore;
        self
    }

    /// Wait budget for `task`.
    pub fn timeout_for(&self, task: NfcTask) -> Duration {
        match task {
            NfcTask::TurnOn => self.init_timeout,
            NfcTask::TurnOff => self.teardown_timeout,
        }
    }
}
