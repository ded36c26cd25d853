use proptest::prelude::*;

use nfcservice::constants::EVENT_NFC_STATE_CHANGE;
use nfcservice::host::MockNfccHost;
use nfcservice::service::ServiceConfig;
use nfcservice::test_support::{initialized_mock_service, state_recorder};
use nfcservice::{CallerToken, ControllerState, NfcTask};

fn to_task(on: bool) -> NfcTask {
    if on { NfcTask::TurnOn } else { NfcTask::TurnOff }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn sequential_requests_follow_legal_paths(
        steps in proptest::collection::vec((any::<bool>(), any::<bool>()), 1..16)
    ) {
        let host = MockNfccHost::new();
        let service = initialized_mock_service(&host, ServiceConfig::default()).unwrap();
        let (seen, cb) = state_recorder();
        service
            .register_state_listener(CallerToken::new(1), EVENT_NFC_STATE_CHANGE, cb)
            .unwrap();

        let mut expected = ControllerState::Off;
        for (on, hw_ok) in steps {
            let task = to_task(on);
            let reaches_hardware = expected != task.success_state();
            if reaches_hardware {
                if on {
                    host.push_init_result(hw_ok);
                } else {
                    host.push_deinit_result(hw_ok);
                }
            }

            let res = service.execute_task(task, false);
            if !reaches_hardware || hw_ok {
                prop_assert!(res.is_ok());
                expected = task.success_state();
            } else {
                prop_assert!(res.is_err());
                expected = task.failure_state();
            }
            prop_assert_eq!(service.nfc_state(), expected);
            prop_assert!(!service.nfc_state().is_transitional());
        }

        let path = seen.lock().unwrap().clone();
        let mut prev = ControllerState::Off;
        for next in path {
            prop_assert!(prev.can_transition_to(next), "{} -> {}", prev, next);
            prev = next;
        }
        prop_assert_eq!(prev, expected);
    }
}
