use std::time::Duration;

use serial_test::serial;

use nfcservice::host::{HostCall, MockNfccHost};
use nfcservice::service::ServiceConfig;
use nfcservice::test_support::initialized_mock_service;
use nfcservice::utils::ms;
use nfcservice::{ControllerState, Error, ErrorCode, NfcTask};

#[test]
#[serial]
fn timed_out_turn_on_reverts_and_reopens_gate() -> anyhow::Result<()> {
    let host = MockNfccHost::new();
    let release = host.hold_initialize();
    let service =
        initialized_mock_service(&host, ServiceConfig::default().with_init_timeout(ms(25)))?;

    let res = service.execute_task(NfcTask::TurnOn, false);
    assert_eq!(ErrorCode::from_result(&res), ErrorCode::Timeout);
    assert_eq!(service.nfc_state(), ControllerState::Off);

    // a TurnOff is a no-op now, not Busy
    service.execute_task(NfcTask::TurnOff, false)?;

    drop(release);
    // late success was undone on the hardware
    assert!(nfcservice::test_support::eventually(Duration::from_secs(5), || {
        host.count(HostCall::Deinitialize) == 1
    }));
    assert_eq!(service.nfc_state(), ControllerState::Off);
    Ok(())
}

#[test]
#[serial]
fn wait_timeout_can_be_shorter_than_budget() -> anyhow::Result<()> {
    let host = MockNfccHost::new();
    let release = host.hold_initialize();
    let service = initialized_mock_service(&host, ServiceConfig::default())?;

    let pending = service.submit(NfcTask::TurnOn, false)?;
    assert_eq!(pending.budget(), Duration::from_secs(90));
    assert_eq!(pending.wait_timeout(ms(20)), Err(Error::Timeout));
    assert_eq!(service.nfc_state(), ControllerState::Off);

    release.send(())?;
    Ok(())
}

#[test]
#[serial]
fn late_failure_is_ignored() -> anyhow::Result<()> {
    let host = MockNfccHost::new();
    let release = host.hold_initialize();
    host.push_init_result(false);
    let service =
        initialized_mock_service(&host, ServiceConfig::default().with_init_timeout(ms(25)))?;

    assert_eq!(service.execute_task(NfcTask::TurnOn, false), Err(Error::Timeout));
    release.send(())?;

    // queued behind the failed bring-up; nothing to undo for a failure
    service.execute_task(NfcTask::TurnOn, false)?;
    assert_eq!(service.nfc_state(), ControllerState::On);
    assert_eq!(host.count(HostCall::Deinitialize), 0);
    Ok(())
}
