// nfcservice/src/host/mock.rs

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crossbeam_channel::{Receiver, Sender};

use crate::host::traits::{NfccHost, NfccHostListener, TagHost};
use crate::tag::Extras;
use crate::types::{ScreenState, TagTechnology, TechMask};
use crate::{Error, Result};

/// Calls recorded by [`MockNfccHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCall {
    /// `attach_listener`
    AttachListener,
    /// `initialize`
    Initialize,
    /// `deinitialize`
    Deinitialize,
    /// `set_screen_state`
    SetScreenState(ScreenState),
}

#[derive(Default)]
struct MockHostInner {
    calls: Vec<HostCall>,
    init_results: VecDeque<bool>,
    deinit_results: VecDeque<bool>,
    init_gate: Option<Receiver<()>>,
    deinit_gate: Option<Receiver<()>>,
    screen_gate: Option<Receiver<()>>,
    attach_fails: bool,
    listener: Option<Weak<dyn NfccHostListener>>,
    field: Vec<Arc<dyn TagHost>>,
}

/// Mock controller host for tests. Clones share state, so a test can keep
/// one clone to script results and inspect calls after handing another to
/// the service.
///
/// Unscripted `initialize`/`deinitialize` calls succeed.
#[derive(Clone, Default)]
pub struct MockNfccHost {
    inner: Arc<Mutex<MockHostInner>>,
}

impl MockNfccHost {
    /// Host with no scripted results.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockHostInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue the result of the next `initialize` call.
    pub fn push_init_result(&self, ok: bool) {
        self.lock().init_results.push_back(ok);
    }

    /// Queue the result of the next `deinitialize` call.
    pub fn push_deinit_result(&self, ok: bool) {
        self.lock().deinit_results.push_back(ok);
    }

    /// Make the next `initialize` block until the returned sender fires (or
    /// is dropped).
    pub fn hold_initialize(&self) -> Sender<()> {
        let (tx, rx) = crossbeam_channel::bounded(1);
        self.lock().init_gate = Some(rx);
        tx
    }

    /// Make the next `deinitialize` block until the returned sender fires
    /// (or is dropped).
    pub fn hold_deinitialize(&self) -> Sender<()> {
        let (tx, rx) = crossbeam_channel::bounded(1);
        self.lock().deinit_gate = Some(rx);
        tx
    }

    /// Make the next `set_screen_state` block, after recording the call,
    /// until the returned sender fires (or is dropped).
    pub fn hold_set_screen_state(&self) -> Sender<()> {
        let (tx, rx) = crossbeam_channel::bounded(1);
        self.lock().screen_gate = Some(rx);
        tx
    }

    /// Make `attach_listener` fail.
    pub fn fail_attach(&self) {
        self.lock().attach_fails = true;
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<HostCall> {
        self.lock().calls.clone()
    }

    /// How often `call` was made.
    pub fn count(&self, call: HostCall) -> usize {
        self.lock().calls.iter().filter(|c| **c == call).count()
    }

    /// Whether a live discovery listener is attached.
    pub fn has_listener(&self) -> bool {
        self.lock()
            .listener
            .as_ref()
            .is_some_and(|l| l.strong_count() > 0)
    }

    /// Put a tag in the field and report it to the attached listener.
    /// Returns false when no live listener is attached.
    pub fn discover(&self, tag: Arc<dyn TagHost>) -> bool {
        let listener = {
            let mut inner = self.lock();
            inner.field.push(tag.clone());
            inner.listener.as_ref().and_then(Weak::upgrade)
        };
        match listener {
            Some(listener) => {
                listener.on_tag_discovered(tag);
                true
            }
            None => false,
        }
    }

    /// Drop every tag handle the host owns; derived tag infos expire.
    pub fn clear_field(&self) {
        self.lock().field.clear();
    }
}

impl NfccHost for MockNfccHost {
    fn attach_listener(&mut self, listener: Weak<dyn NfccHostListener>) -> Result<()> {
        let mut inner = self.lock();
        inner.calls.push(HostCall::AttachListener);
        if inner.attach_fails {
            return Err(Error::HardwareFailure("hal service unavailable".to_string()));
        }
        inner.listener = Some(listener);
        Ok(())
    }

    fn initialize(&mut self) -> bool {
        let gate = {
            let mut inner = self.lock();
            inner.calls.push(HostCall::Initialize);
            inner.init_gate.take()
        };
        if let Some(gate) = gate {
            let _ = gate.recv();
        }
        self.lock().init_results.pop_front().unwrap_or(true)
    }

    fn deinitialize(&mut self) -> bool {
        let gate = {
            let mut inner = self.lock();
            inner.calls.push(HostCall::Deinitialize);
            inner.deinit_gate.take()
        };
        if let Some(gate) = gate {
            let _ = gate.recv();
        }
        self.lock().deinit_results.pop_front().unwrap_or(true)
    }

    fn set_screen_state(&mut self, state: ScreenState) {
        let gate = {
            let mut inner = self.lock();
            inner.calls.push(HostCall::SetScreenState(state));
            inner.screen_gate.take()
        };
        if let Some(gate) = gate {
            let _ = gate.recv();
        }
    }
}

/// Mock tag handle. Records transceived payloads and returns queued
/// responses.
#[derive(Default)]
pub struct MockTagHost {
    uid: Vec<u8>,
    mask: TechMask,
    extras: BTreeMap<TagTechnology, Extras>,
    extended_apdu: bool,
    connected: Mutex<Option<TagTechnology>>,
    /// Payloads passed to `transceive`
    pub sent: Mutex<Vec<Vec<u8>>>,
    /// Replies returned by `transceive`, front first
    pub responses: Mutex<VecDeque<Vec<u8>>>,
}

impl MockTagHost {
    /// Tag with `uid` and no technologies.
    pub fn new(uid: &[u8]) -> Self {
        Self {
            uid: uid.to_vec(),
            ..Self::default()
        }
    }

    /// Advertise a technology without extras.
    pub fn with_tech(mut self, tech: TagTechnology) -> Self {
        self.mask.insert(tech);
        self
    }

    /// Advertise a technology and the extras reported for it.
    pub fn with_tech_extras(mut self, tech: TagTechnology, extras: Extras) -> Self {
        self.mask.insert(tech);
        self.extras.insert(tech, extras);
        self
    }

    /// Report extended-length APDU support.
    pub fn with_extended_apdu(mut self, supported: bool) -> Self {
        self.extended_apdu = supported;
        self
    }

    /// Queue a `transceive` reply.
    pub fn push_response(&self, resp: Vec<u8>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(resp);
    }

    /// Technology selected by the last successful `connect`.
    pub fn connected_tech(&self) -> Option<TagTechnology> {
        *self.connected.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TagHost for MockTagHost {
    fn tech_mask(&self) -> TechMask {
        self.mask
    }

    fn tech_extras(&self, tech: TagTechnology) -> Option<Extras> {
        self.extras.get(&tech).cloned()
    }

    fn uid(&self) -> Vec<u8> {
        self.uid.clone()
    }

    fn connect(&self, tech: TagTechnology) -> Result<()> {
        if !self.mask.contains(tech) {
            return Err(Error::Unsupported(tech));
        }
        *self.connected.lock().unwrap_or_else(PoisonError::into_inner) = Some(tech);
        Ok(())
    }

    fn transceive(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(data.to_vec());
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .ok_or(Error::Timeout)
    }

    fn is_extended_apdu_supported(&self) -> bool {
        self.extended_apdu
    }
}
