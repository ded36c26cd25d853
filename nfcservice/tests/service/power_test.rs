#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;

use nfcservice::constants::EVENT_NFC_STATE_CHANGE;
use nfcservice::host::{HostCall, MockNfccHost};
use nfcservice::service::{NfcService, NfcServiceBuilder, ServiceConfig};
use nfcservice::settings::{MemorySettings, SettingsStore};
use nfcservice::test_support::{initialized_mock_service, state_recorder};
use nfcservice::{CallerToken, ControllerState, Error, ErrorCode, NfcTask};

#[test]
fn turn_on_then_listener_sees_exactly_one_on() -> anyhow::Result<()> {
    common::init_logging();
    let host = MockNfccHost::new();
    let service = initialized_mock_service(&host, ServiceConfig::default())?;
    let (seen, cb) = state_recorder();
    service.register_state_listener(CallerToken::new(10), EVENT_NFC_STATE_CHANGE, cb)?;

    service.execute_task(NfcTask::TurnOn, false)?;

    assert_eq!(service.nfc_state(), ControllerState::On);
    let seen = seen.lock().unwrap();
    assert_eq!(seen.iter().filter(|s| **s == ControllerState::On).count(), 1);
    Ok(())
}

#[test]
fn hardware_failure_reports_code_and_no_on() -> anyhow::Result<()> {
    let host = MockNfccHost::new();
    host.push_init_result(false);
    let service = initialized_mock_service(&host, ServiceConfig::default())?;
    let (seen, cb) = state_recorder();
    service.register_state_listener(CallerToken::new(10), EVENT_NFC_STATE_CHANGE, cb)?;

    let res = service.execute_task(NfcTask::TurnOn, false);
    assert_eq!(ErrorCode::from_result(&res).as_i32(), 4);
    assert_eq!(service.nfc_state(), ControllerState::Off);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![ControllerState::TurningOn, ControllerState::Off]
    );
    Ok(())
}

#[test]
fn full_cycle_records_host_calls() -> anyhow::Result<()> {
    let host = MockNfccHost::new();
    let service = initialized_mock_service(&host, ServiceConfig::default())?;
    service.turn_on()?;
    service.turn_off()?;
    assert_eq!(host.count(HostCall::Initialize), 1);
    assert_eq!(host.count(HostCall::Deinitialize), 1);
    assert!(!service.is_nfc_enabled());
    Ok(())
}

#[test]
fn persisted_flag_survives_restart() -> anyhow::Result<()> {
    let settings = Arc::new(MemorySettings::new());

    let first = NfcServiceBuilder::new()
        .with_host(Box::new(MockNfccHost::new()))
        .with_settings(settings.clone())
        .build()?
        .initialize()?;
    first.turn_on()?;
    drop(first);
    assert_eq!(settings.load_enabled_flag(), Some(true));

    let host = MockNfccHost::new();
    let second = NfcServiceBuilder::new()
        .with_host(Box::new(host.clone()))
        .with_settings(settings)
        .build()?
        .initialize()?;
    assert!(nfcservice::test_support::eventually(
        std::time::Duration::from_secs(5),
        || second.is_nfc_enabled()
    ));
    assert_eq!(host.count(HostCall::Initialize), 1);
    Ok(())
}

#[test]
fn uninitialized_service_reports_off() {
    let service = NfcService::new_with_host(Box::new(MockNfccHost::new()));
    assert_eq!(service.nfc_state(), ControllerState::Off);
    assert_eq!(service.nfc_state().as_i32(), 1);
}

#[test]
fn listener_error_does_not_fail_the_task() -> anyhow::Result<()> {
    let host = MockNfccHost::new();
    let service = initialized_mock_service(&host, ServiceConfig::default())?;
    service.register_state_listener(
        CallerToken::new(1),
        EVENT_NFC_STATE_CHANGE,
        Arc::new(|_s: ControllerState| -> nfcservice::Result<()> {
            Err(Error::Callback("remote died".into()))
        }),
    )?;
    let (seen, cb) = state_recorder();
    service.register_state_listener(CallerToken::new(2), EVENT_NFC_STATE_CHANGE, cb)?;

    service.execute_task(NfcTask::TurnOn, false)?;
    assert_eq!(seen.lock().unwrap().last(), Some(&ControllerState::On));
    Ok(())
}
