// nfcservice/src/service/shared.rs

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};

use crate::auth::Authorizer;
use crate::constants::EVENT_NFC_STATE_CHANGE;
use crate::host::{NfccHost, NfccHostListener, TagHost};
use crate::listener::ListenerRegistry;
use crate::service::config::ServiceConfig;
use crate::settings::SettingsStore;
use crate::tag::TagDispatcher;
use crate::types::{ControllerState, NfcTask, ScreenState};
use crate::{Error, Result};

/// An accepted power transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ticket {
    pub(crate) id: u64,
    pub(crate) task: NfcTask,
}

/// Whether a worker completion was applied to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Completion {
    Committed,
    Stale,
}

#[derive(Debug, Default)]
struct StateMachine {
    nfc: ControllerState,
    screen: ScreenState,
    // Last screen state handed to the host.
    applied_screen: Option<ScreenState>,
    accepted: u64,
    in_flight: Option<Ticket>,
}

/// Committed state changes waiting to be broadcast, in commit order.
#[derive(Debug, Default)]
struct Notifications {
    queue: VecDeque<ControllerState>,
    draining: bool,
}

/// State shared between callers, the task worker and the host's discovery
/// callback.
pub(crate) struct Shared {
    state: Mutex<StateMachine>,
    notifications: Mutex<Notifications>,
    host: Mutex<Box<dyn NfccHost>>,
    pub(crate) registry: ListenerRegistry,
    pub(crate) dispatcher: TagDispatcher,
    pub(crate) settings: Arc<dyn SettingsStore>,
    pub(crate) authorizer: Arc<dyn Authorizer>,
    pub(crate) config: ServiceConfig,
}

impl Shared {
    pub(crate) fn new(
        host: Box<dyn NfccHost>,
        settings: Arc<dyn SettingsStore>,
        authorizer: Arc<dyn Authorizer>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            state: Mutex::new(StateMachine::default()),
            notifications: Mutex::new(Notifications::default()),
            host: Mutex::new(host),
            registry: ListenerRegistry::new(),
            dispatcher: TagDispatcher::new(),
            settings,
            authorizer,
            config,
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, StateMachine> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn lock_host(&self) -> MutexGuard<'_, Box<dyn NfccHost>> {
        self.host.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn nfc_state(&self) -> ControllerState {
        self.lock_state().nfc
    }

    pub(crate) fn screen_state(&self) -> ScreenState {
        self.lock_state().screen
    }

    fn lock_notifications(&self) -> MutexGuard<'_, Notifications> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Atomically decide and swap the controller state, then broadcast the
    /// change. The swap is visible to readers before any listener runs.
    ///
    /// Changes are queued under the state lock and delivered by whichever
    /// thread is not already delivering, with no lock held, so a listener
    /// may submit a new task from its callback. A nested change is queued
    /// behind the one being delivered.
    fn update_nfc_state<R>(
        &self,
        decide: impl FnOnce(&mut StateMachine) -> (R, Option<ControllerState>),
    ) -> R {
        let (result, change) = {
            let mut sm = self.lock_state();
            let old = sm.nfc;
            let (result, next) = decide(&mut sm);
            let change = next.filter(|n| *n != old).map(|n| {
                sm.nfc = n;
                self.lock_notifications().queue.push_back(n);
                (old, n)
            });
            (result, change)
        };

        if let Some((old, new)) = change {
            if !old.can_transition_to(new) {
                warn!("unexpected state jump {} -> {}", old, new);
            }
            info!("nfc state {} -> {}", old, new);
            if new == ControllerState::Off {
                self.dispatcher.clear();
            }
            self.deliver_notifications();
        }
        result
    }

    fn deliver_notifications(&self) {
        {
            let mut pending = self.lock_notifications();
            if pending.draining {
                return;
            }
            pending.draining = true;
        }
        loop {
            let next = {
                let mut pending = self.lock_notifications();
                match pending.queue.pop_front() {
                    Some(state) => state,
                    None => {
                        pending.draining = false;
                        return;
                    }
                }
            };
            // broadcast catches callback panics, so draining is always reset
            self.registry.broadcast(EVENT_NFC_STATE_CHANGE, next);
        }
    }

    /// Busy gate. `Ok(None)` means the controller is already where the task
    /// would take it.
    pub(crate) fn begin(&self, task: NfcTask) -> Result<Option<Ticket>> {
        self.update_nfc_state(|sm| {
            if let Some(running) = sm.in_flight {
                debug!("{} rejected, {} still in flight", task, running.task);
                return (Err(Error::Busy), None);
            }
            if sm.nfc == task.success_state() {
                debug!("{} requested while already {}", task, sm.nfc);
                return (Ok(None), None);
            }
            sm.accepted += 1;
            let ticket = Ticket {
                id: sm.accepted,
                task,
            };
            sm.in_flight = Some(ticket);
            (Ok(Some(ticket)), Some(task.transitional_state()))
        })
    }

    /// Apply a worker result if its ticket is still the one in flight.
    pub(crate) fn complete(&self, ticket: Ticket, outcome: &Result<()>) -> Completion {
        self.update_nfc_state(|sm| {
            if sm.in_flight != Some(ticket) {
                return (Completion::Stale, None);
            }
            sm.in_flight = None;
            let next = match outcome {
                Ok(()) => ticket.task.success_state(),
                Err(_) => ticket.task.failure_state(),
            };
            (Completion::Committed, Some(next))
        })
    }

    /// Caller gave up waiting: revert and reopen the gate. False when the
    /// worker already committed.
    pub(crate) fn abandon(&self, ticket: Ticket) -> bool {
        self.update_nfc_state(|sm| {
            if sm.in_flight != Some(ticket) {
                return (false, None);
            }
            sm.in_flight = None;
            (true, Some(ticket.task.failure_state()))
        })
    }

    /// Worker body for one accepted task.
    pub(crate) fn run_task(&self, ticket: Ticket) -> Result<()> {
        let outcome = {
            let mut host = self.lock_host();
            match ticket.task {
                NfcTask::TurnOn => self.do_turn_on(&mut **host),
                NfcTask::TurnOff => self.do_turn_off(&mut **host),
            }
        };

        match self.complete(ticket, &outcome) {
            Completion::Committed => {
                if ticket.task == NfcTask::TurnOn && outcome.is_ok() {
                    // catch screen changes recorded while bring-up finished
                    self.sync_screen();
                }
            }
            Completion::Stale => {
                warn!(
                    "late {} completion (ticket {}) discarded: {:?}",
                    ticket.task, ticket.id, outcome
                );
                if outcome.is_ok() {
                    self.undo(ticket.task);
                }
            }
        }
        outcome
    }

    fn do_turn_on(&self, host: &mut dyn NfccHost) -> Result<()> {
        if !host.initialize() {
            return Err(Error::HardwareFailure(
                "controller initialization failed".to_string(),
            ));
        }
        let screen = self.screen_state();
        host.set_screen_state(screen);
        self.lock_state().applied_screen = Some(screen);
        Ok(())
    }

    fn do_turn_off(&self, host: &mut dyn NfccHost) -> Result<()> {
        if !host.deinitialize() {
            return Err(Error::HardwareFailure(
                "controller failed to quiesce".to_string(),
            ));
        }
        Ok(())
    }

    // Bring the hardware back in line with the reverted state.
    fn undo(&self, task: NfcTask) {
        let mut host = self.lock_host();
        let restored = match task {
            NfcTask::TurnOn => host.deinitialize(),
            NfcTask::TurnOff => host.initialize(),
        };
        if !restored {
            warn!("could not undo late {}", task);
        }
    }

    pub(crate) fn save_enabled(&self, enabled: bool) {
        if let Err(e) = self.settings.save_enabled_flag(enabled) {
            warn!("failed to persist enabled flag {}: {}", enabled, e);
        }
    }

    pub(crate) fn handle_screen_changed(&self, screen: ScreenState) {
        let apply = {
            let mut sm = self.lock_state();
            sm.screen = screen;
            sm.nfc == ControllerState::On
        };
        if apply {
            self.sync_screen();
        } else {
            debug!("screen {} recorded, controller not on", screen);
        }
    }

    /// Push the recorded screen state to the host if it is On and has not
    /// seen it yet. Read under the host lock so the newest value wins.
    fn sync_screen(&self) {
        let mut host = self.lock_host();
        let pending = {
            let mut sm = self.lock_state();
            let stale = sm.applied_screen != Some(sm.screen);
            if sm.nfc == ControllerState::On && stale {
                sm.applied_screen = Some(sm.screen);
                Some(sm.screen)
            } else {
                None
            }
        };
        if let Some(screen) = pending {
            host.set_screen_state(screen);
        }
    }
}

impl NfccHostListener for Shared {
    fn on_tag_discovered(&self, tag: Arc<dyn TagHost>) {
        let state = self.nfc_state();
        if state != ControllerState::On {
            debug!("tag discovery dropped while {}", state);
            return;
        }
        self.dispatcher.dispatch(&tag);
    }
}
