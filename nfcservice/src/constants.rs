// nfcservice/src/constants.rs
//! Common constants used across the crate

/// Listener type for controller power state changes
pub const EVENT_NFC_STATE_CHANGE: &str = "nfcStateChange";

/// ISO-DEP extras key: historical bytes (Type A)
pub const EXTRA_HISTORICAL_BYTES: &str = "HistoricalBytes";

/// ISO-DEP extras key: higher layer response (Type B)
pub const EXTRA_HILAYER_RESPONSE: &str = "HiLayerResponse";

/// NFC-A extras key: SAK
pub const EXTRA_SAK: &str = "Sak";
/// NFC-A extras key: ATQA
pub const EXTRA_ATQA: &str = "Atqa";

/// Milliseconds to wait for controller bring-up, firmware download included.
pub const WAIT_MS_INIT: u64 = 90 * 1000;

/// Milliseconds to wait for routing / teardown work.
pub const WAIT_MS_SET_ROUTE: u64 = 10 * 1000;
