//! Timeout helpers used across the crate.
//!
//! Centralizes the wait budgets for power transitions so the service
//! config and tests agree on the same values.

use std::time::Duration;

use crate::constants::{WAIT_MS_INIT, WAIT_MS_SET_ROUTE};

/// Convert milliseconds to Duration.
pub fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

/// Default budget for controller bring-up.
pub fn default_init_timeout() -> Duration {
    ms(WAIT_MS_INIT)
}

/// Default budget for controller teardown.
pub fn default_teardown_timeout() -> Duration {
    ms(WAIT_MS_SET_ROUTE)
}
