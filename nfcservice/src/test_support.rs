//! Test support helpers intended for use by unit and integration tests.
//!
//! These helpers centralize common MockNfccHost wiring so tests across the
//! crate and tests/ directory can reuse the same logic.
#![allow(dead_code)]

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::constants::{EXTRA_HILAYER_RESPONSE, EXTRA_HISTORICAL_BYTES};
use crate::host::{MockNfccHost, MockTagHost, TagHost};
use crate::listener::NfcStateCallback;
use crate::service::{Initialized, NfcService, ServiceConfig};
use crate::tag::{ExtraValue, Extras};
use crate::types::{ControllerState, TagTechnology};
use crate::{Result, settings};

/// Route `log` output through env_logger's test writer. Safe to call from
/// every unit test; integration tests have their own copy in tests/common.
#[cfg(test)]
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Create and initialize a service backed by a clone of `host`.
#[doc(hidden)]
pub fn initialized_mock_service(
    host: &MockNfccHost,
    config: ServiceConfig,
) -> Result<NfcService<Initialized>> {
    crate::service::NfcServiceBuilder::new()
        .with_host(Box::new(host.clone()))
        .with_settings(Arc::new(settings::MemorySettings::new()))
        .with_config(config)
        .build()?
        .initialize()
}

/// Callback that records every state it is handed.
#[doc(hidden)]
pub fn state_recorder() -> (Arc<Mutex<Vec<ControllerState>>>, Arc<dyn NfcStateCallback>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let callback: Arc<dyn NfcStateCallback> = Arc::new(move |state: ControllerState| -> Result<()> {
        sink.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(state);
        Ok(())
    });
    (seen, callback)
}

/// Poll until `cond` holds or `timeout` passes.
#[doc(hidden)]
pub fn eventually(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    cond()
}

/// An ISO-DEP tag advertising NfcA + IsoDep with the given extras bytes.
#[doc(hidden)]
pub fn iso_dep_tag(uid: &[u8], historical: &[u8], hi_layer: &[u8]) -> Arc<dyn TagHost> {
    let extras = Extras::new()
        .with(EXTRA_HISTORICAL_BYTES, ExtraValue::Bytes(historical.to_vec()))
        .with(EXTRA_HILAYER_RESPONSE, ExtraValue::Bytes(hi_layer.to_vec()));
    Arc::new(
        MockTagHost::new(uid)
            .with_tech(TagTechnology::NfcA)
            .with_tech_extras(TagTechnology::IsoDep, extras),
    )
}
