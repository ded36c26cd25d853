#[path = "../common/mod.rs"]
mod common;

use std::sync::{Arc, Mutex};
use std::thread;

use nfcservice::constants::EVENT_NFC_STATE_CHANGE;
use nfcservice::listener::{ListenerRegistry, NfcStateCallback};
use nfcservice::{CallerToken, ControllerState, Result};

fn counter() -> (Arc<Mutex<usize>>, Arc<dyn NfcStateCallback>) {
    let hits = Arc::new(Mutex::new(0usize));
    let h = hits.clone();
    let cb: Arc<dyn NfcStateCallback> = Arc::new(move |_s: ControllerState| -> Result<()> {
        *h.lock().unwrap() += 1;
        Ok(())
    });
    (hits, cb)
}

#[test]
fn unregister_unknown_caller_is_noop() {
    let reg = ListenerRegistry::new();
    assert_eq!(reg.unregister(CallerToken::new(5), EVENT_NFC_STATE_CHANGE), 0);
    assert_eq!(reg.unregister_all(CallerToken::new(5)), 0);
}

#[test]
fn concurrent_register_and_broadcast() {
    common::init_logging();
    let reg = Arc::new(ListenerRegistry::new());
    let (hits, cb) = counter();

    let workers: Vec<_> = (0..4)
        .map(|i| {
            let reg = reg.clone();
            let cb = cb.clone();
            thread::spawn(move || {
                for _ in 0..25 {
                    reg.register(CallerToken::new(i), EVENT_NFC_STATE_CHANGE, cb.clone());
                    reg.broadcast(EVENT_NFC_STATE_CHANGE, ControllerState::On);
                }
            })
        })
        .collect();
    for w in workers {
        w.join().unwrap();
    }

    assert_eq!(reg.len(), 100);
    assert!(*hits.lock().unwrap() >= 100);

    for i in 0..4 {
        assert_eq!(reg.unregister_all(CallerToken::new(i)), 25);
    }
    assert!(reg.is_empty());
}

#[test]
fn unregister_during_broadcast_still_delivers_snapshot() {
    let reg = Arc::new(ListenerRegistry::new());
    let (hits, second) = counter();

    let r = reg.clone();
    let first: Arc<dyn NfcStateCallback> = Arc::new(move |_s: ControllerState| -> Result<()> {
        r.unregister(CallerToken::new(2), EVENT_NFC_STATE_CHANGE);
        Ok(())
    });
    reg.register(CallerToken::new(1), EVENT_NFC_STATE_CHANGE, first);
    reg.register(CallerToken::new(2), EVENT_NFC_STATE_CHANGE, second);

    assert_eq!(reg.broadcast(EVENT_NFC_STATE_CHANGE, ControllerState::Off), 2);
    assert_eq!(*hits.lock().unwrap(), 1);
    assert_eq!(reg.broadcast(EVENT_NFC_STATE_CHANGE, ControllerState::On), 1);
    assert_eq!(*hits.lock().unwrap(), 1);
}
