// nfcservice/src/lib.rs

//! nfcservice
//!
//! Service layer for an NFC controller: a serialized power state machine,
//! discovered-tag dispatch into technology sessions and state-change
//! listeners.
#![warn(missing_docs)]

/// Caller authorization for listener registration.
pub mod auth;
/// Event names, extras keys and wait budgets.
pub mod constants;
/// Error type, `Result` alias and the integer error surface.
pub mod error;
/// Controller-host contract and in-memory mocks.
pub mod host;
/// State-change listeners.
pub mod listener;
/// Common re-exports.
pub mod prelude;
/// The NFC service: power state machine, builder and task handles.
pub mod service;
/// Persisted enabled flag.
pub mod settings;
/// Discovered tags and technology sessions.
pub mod tag;
/// Mock wiring shared by unit and integration tests.
pub mod test_support;
/// Controller, task, screen and technology types.
pub mod types;
/// Hex and timeout helpers.
pub mod utils;

// Re-export common types at crate root so `crate::Error`, `crate::Result`
// and the enums in `types` are available for consumers and for the
// `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
