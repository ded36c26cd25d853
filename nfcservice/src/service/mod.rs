// nfcservice/src/service/mod.rs

/// Service construction.
pub mod builder;
/// Budgets and boot behaviour.
pub mod config;
mod handle;
mod shared;
mod task;
mod worker;

pub use builder::NfcServiceBuilder;
pub use config::ServiceConfig;
pub use handle::{Initialized, NfcService, Uninitialized};
pub use task::PendingTask;
