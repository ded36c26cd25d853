//! Utilities for nfcservice: small helpers used across the crate (hex
//! rendering of tag extras, wait budgets).

/// Hex rendering and parsing.
pub mod hex;
/// Duration helpers and default budgets.
pub mod timeout;

pub use self::hex::*;
pub use self::timeout::*;
