// nfcservice/src/service/handle.rs

use std::sync::Arc;

use log::{info, warn};

use crate::auth::{AllowAll, Authorizer};
use crate::host::{NfccHost, NfccHostListener};
use crate::listener::{ListenerHandle, ListenerRegistry, NfcStateCallback};
use crate::service::config::{ServiceConfig, WORKER_THREAD_NAME};
use crate::service::shared::Shared;
use crate::service::task::PendingTask;
use crate::service::worker::TaskWorker;
use crate::settings::{MemorySettings, SettingsStore};
use crate::tag::TagDispatcher;
use crate::types::{CallerToken, ControllerState, NfcTask, ScreenState};
use crate::{Error, Result};

/// Type-state markers
pub struct Uninitialized;
/// Service with a running task worker.
pub struct Initialized {
    worker: TaskWorker,
}

/// NFC service handle. Only an initialized service accepts power tasks.
pub struct NfcService<State = Uninitialized> {
    shared: Arc<Shared>,
    state: State,
}

impl NfcService<Uninitialized> {
    /// Create a service around an existing host with in-memory settings,
    /// no authorization and default budgets. Primarily intended for tests
    /// where a MockNfccHost is provided.
    pub fn new_with_host(host: Box<dyn NfccHost>) -> Self {
        Self::from_parts(
            host,
            Arc::new(MemorySettings::new()),
            Arc::new(AllowAll),
            ServiceConfig::default(),
        )
    }

    pub(crate) fn from_parts(
        host: Box<dyn NfccHost>,
        settings: Arc<dyn SettingsStore>,
        authorizer: Arc<dyn Authorizer>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            shared: Arc::new(Shared::new(host, settings, authorizer, config)),
            state: Uninitialized,
        }
    }

    /// Wire the discovery callback and start the task worker. The
    /// controller stays Off unless the saved flag asks for a restore.
    pub fn initialize(self) -> Result<NfcService<Initialized>> {
        let listener: Arc<dyn NfccHostListener> = self.shared.clone();
        self.shared
            .lock_host()
            .attach_listener(Arc::downgrade(&listener))?;

        let worker = TaskWorker::spawn(WORKER_THREAD_NAME)?;
        let service = NfcService {
            shared: self.shared,
            state: Initialized { worker },
        };
        info!("nfc service initialized");

        if service.shared.config.restore_saved_state
            && service.shared.settings.load_enabled_flag() == Some(true)
        {
            info!("restoring saved enabled state");
            match service.submit(NfcTask::TurnOn, false) {
                Ok(pending) => pending.detach(),
                Err(e) => warn!("restore TurnOn not started: {}", e),
            }
        }
        Ok(service)
    }

    /// Current state; always Off before initialization.
    pub fn nfc_state(&self) -> ControllerState {
        self.shared.nfc_state()
    }
}

impl NfcService<Initialized> {
    /// Start a power transition on the worker without waiting.
    ///
    /// Returns `Error::Busy` while another transition is in flight. With
    /// `save_state` the requested intent is persisted for the next boot.
    pub fn submit(&self, task: NfcTask, save_state: bool) -> Result<PendingTask> {
        let ticket = self.shared.begin(task)?;
        if save_state {
            self.shared.save_enabled(task.enables());
        }
        let Some(ticket) = ticket else {
            return Ok(PendingTask::ready(self.shared.clone()));
        };

        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        let shared = self.shared.clone();
        let job = Box::new(move || {
            let outcome = shared.run_task(ticket);
            let _ = done_tx.send(outcome);
        });
        if let Err(e) = self.state.worker.submit(job) {
            self.shared.complete(ticket, &Err(e.clone()));
            return Err(e);
        }

        Ok(PendingTask::running(
            self.shared.clone(),
            ticket,
            done_rx,
            self.shared.config.timeout_for(task),
        ))
    }

    /// Start a transition and wait for it up to the task's budget.
    pub fn execute_task(&self, task: NfcTask, save_state: bool) -> Result<()> {
        self.submit(task, save_state)?.wait()
    }

    /// Enable the controller and remember it.
    pub fn turn_on(&self) -> Result<()> {
        self.execute_task(NfcTask::TurnOn, true)
    }

    /// Disable the controller and remember it.
    pub fn turn_off(&self) -> Result<()> {
        self.execute_task(NfcTask::TurnOff, true)
    }

    /// Current controller state. Transitional only while a task is in flight.
    pub fn nfc_state(&self) -> ControllerState {
        self.shared.nfc_state()
    }

    /// True only when the controller is fully On.
    pub fn is_nfc_enabled(&self) -> bool {
        self.nfc_state() == ControllerState::On
    }

    /// Record the screen state; reconfigures discovery only while On.
    pub fn handle_screen_changed(&self, screen: ScreenState) {
        self.shared.handle_screen_changed(screen);
    }

    /// Discovered tags and typed sessions.
    pub fn tag_dispatcher(&self) -> &TagDispatcher {
        &self.shared.dispatcher
    }

    /// Registered state listeners.
    pub fn listeners(&self) -> &ListenerRegistry {
        &self.shared.registry
    }

    fn authorize(&self, caller: CallerToken, event_type: &str) -> Result<()> {
        if self.shared.authorizer.is_permitted(caller, event_type) {
            Ok(())
        } else {
            warn!("caller {} denied for '{}'", caller, event_type);
            Err(Error::Unauthorized {
                caller,
                event_type: event_type.to_string(),
            })
        }
    }

    /// Add a state listener for `caller` after checking authorization.
    /// A caller may register the same type more than once.
    ///
    /// Callbacks run on the thread that committed the change and may
    /// submit a new task. Waiting on that task from inside the callback
    /// can stall the worker until the wait ends in `Error::Timeout`.
    pub fn register_state_listener(
        &self,
        caller: CallerToken,
        event_type: &str,
        callback: Arc<dyn NfcStateCallback>,
    ) -> Result<ListenerHandle> {
        self.authorize(caller, event_type)?;
        Ok(self.shared.registry.register(caller, event_type, callback))
    }

    /// Remove the caller's listeners of `event_type`; none is fine.
    pub fn unregister_state_listener(&self, caller: CallerToken, event_type: &str) -> Result<()> {
        self.authorize(caller, event_type)?;
        self.shared.registry.unregister(caller, event_type);
        Ok(())
    }

    /// Drop everything a caller registered (caller died or lost access).
    pub fn revoke_caller(&self, caller: CallerToken) {
        let removed = self.shared.registry.unregister_all(caller);
        info!("revoked caller {}: {} listener(s) removed", caller, removed);
    }
}
