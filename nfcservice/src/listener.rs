// nfcservice/src/listener.rs

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, error, warn};

use crate::Result;
use crate::types::{CallerToken, ControllerState};

/// Receiver of controller state changes.
pub trait NfcStateCallback: Send + Sync {
    /// Called once per committed state change. An `Err` is logged and
    /// does not affect other listeners.
    fn on_nfc_state_changed(&self, state: ControllerState) -> Result<()>;
}

impl<F> NfcStateCallback for F
where
    F: Fn(ControllerState) -> Result<()> + Send + Sync,
{
    fn on_nfc_state_changed(&self, state: ControllerState) -> Result<()> {
        self(state)
    }
}

/// Identifies a single registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u64);

/// One registration. (caller, event_type) is not unique.
#[derive(Clone)]
pub struct StateListenerRecord {
    /// Listener type, e.g. [`EVENT_NFC_STATE_CHANGE`](crate::constants::EVENT_NFC_STATE_CHANGE)
    pub event_type: String,
    /// Registering caller
    pub caller: CallerToken,
    /// Receiver of the changes
    pub callback: Arc<dyn NfcStateCallback>,
    handle: ListenerHandle,
}

impl StateListenerRecord {
    /// Handle for [`ListenerRegistry::remove`].
    pub fn handle(&self) -> ListenerHandle {
        self.handle
    }
}

impl std::fmt::Debug for StateListenerRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateListenerRecord")
            .field("event_type", &self.event_type)
            .field("caller", &self.caller)
            .field("handle", &self.handle)
            .finish()
    }
}

#[derive(Default)]
struct RegistryInner {
    records: Vec<StateListenerRecord>,
    next_id: u64,
}

/// Thread-safe store of state listeners with snapshot broadcast.
#[derive(Default)]
pub struct ListenerRegistry {
    inner: Mutex<RegistryInner>,
}

impl ListenerRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a registration. Authorization happens before this call.
    pub fn register(
        &self,
        caller: CallerToken,
        event_type: &str,
        callback: Arc<dyn NfcStateCallback>,
    ) -> ListenerHandle {
        let mut inner = self.lock();
        inner.next_id += 1;
        let handle = ListenerHandle(inner.next_id);
        inner.records.push(StateListenerRecord {
            event_type: event_type.to_string(),
            caller,
            callback,
            handle,
        });
        debug!("listener {:?} registered: caller={} type={}", handle, caller, event_type);
        handle
    }

    /// Remove every registration matching (caller, event_type). Returns the
    /// number removed; zero is not an error.
    pub fn unregister(&self, caller: CallerToken, event_type: &str) -> usize {
        self.remove_where(|r| r.caller == caller && r.event_type == event_type)
    }

    /// Remove every registration of `caller`.
    pub fn unregister_all(&self, caller: CallerToken) -> usize {
        self.remove_where(|r| r.caller == caller)
    }

    /// Remove a single registration.
    pub fn remove(&self, handle: ListenerHandle) -> bool {
        self.remove_where(|r| r.handle == handle) > 0
    }

    fn remove_where(&self, pred: impl Fn(&StateListenerRecord) -> bool) -> usize {
        let mut inner = self.lock();
        let before = inner.records.len();
        inner.records.retain(|r| !pred(r));
        before - inner.records.len()
    }

    /// Number of registrations across all callers and types.
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the registrations made by `caller`.
    pub fn records_for(&self, caller: CallerToken) -> Vec<StateListenerRecord> {
        self.lock()
            .records
            .iter()
            .filter(|r| r.caller == caller)
            .cloned()
            .collect()
    }

    /// Deliver `state` to every listener of `event_type`, in registration
    /// order, from a snapshot taken on entry. Callback errors and panics are
    /// logged and skipped. Returns the number of successful deliveries.
    pub fn broadcast(&self, event_type: &str, state: ControllerState) -> usize {
        let snapshot: Vec<StateListenerRecord> = self
            .lock()
            .records
            .iter()
            .filter(|r| r.event_type == event_type)
            .cloned()
            .collect();

        let mut delivered = 0;
        for record in &snapshot {
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                record.callback.on_nfc_state_changed(state)
            }));
            match outcome {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(e)) => warn!(
                    "listener {:?} (caller {}) failed on {}: {}",
                    record.handle, record.caller, state, e
                ),
                Err(_) => error!(
                    "listener {:?} (caller {}) panicked on {}",
                    record.handle, record.caller, state
                ),
            }
        }
        delivered
    }
}
