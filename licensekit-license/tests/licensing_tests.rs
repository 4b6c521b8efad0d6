mod common;

use common::{licensing, minutes};
use licensekit_config::ConfigStore;
use licensekit_license::{
    machine_fingerprint, Licensing, ProtectionProbe, SerialFlag, SerialState, Unprotected,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::thread;

#[test]
fn trial_runs_out_after_time_limit() {
    let (lic, clock) = licensing("AcceptedSerialNumber=ABC123\nTimeLimit=10");
    assert!(lic.set_serial_number("ABC123").is_success());

    clock.advance(minutes(11));
    assert_eq!(
        lic.serial_number_state(),
        SerialState::only(SerialFlag::RunningTimeOver)
    );

    let data = lic.serial_number_data();
    assert_eq!(data.state, SerialState::only(SerialFlag::RunningTimeOver));
    assert_eq!(data.running_time, 10);
}

#[test]
fn facade_delegates_to_evaluator() {
    let (lic, _) = licensing("AcceptedSerialNumber=ABC123\nUserName=Jane");
    lic.set_serial_number("ABC123");
    assert!(lic.evaluator().session().serial_accepted);
    assert_eq!(lic.serial_number_data().user_name, "Jane");
}

#[test]
fn current_hwid_prefers_store() {
    let (lic, _) = licensing("MyHWID=machine-7");
    assert_eq!(lic.current_hwid(), "machine-7");
}

#[test]
fn current_hwid_falls_back_to_fingerprint() {
    let (lic, _) = licensing("");
    let hwid = lic.current_hwid();
    assert!(!hwid.is_empty());
    assert_eq!(hwid, machine_fingerprint());
    assert_eq!(lic.current_hwid(), hwid);
}

#[test]
fn missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = ConfigStore::load(dir.path().join("absent.ini")).unwrap();
    let lic = Licensing::new(&store);

    assert_eq!(lic.set_serial_number("serialnumber"), SerialState::SUCCESS);
    assert_eq!(lic.activate_license("activationcode"), Ok("serialnumber".into()));
}

#[test]
fn activation_round_trip_through_facade() {
    let (lic, _) = licensing(
        "AcceptedSerialNumber=ABC123\nAcceptedActivationCode=xyz-1\nExpDate=20000101",
    );
    let serial = lic.activate_license("xyz-1").unwrap();
    assert_eq!(
        lic.set_serial_number(&serial),
        SerialState::only(SerialFlag::DateExpired)
    );
    assert_eq!(lic.deactivate_license(&serial), Ok(()));
}

#[test]
fn unprotected_probe() {
    let probe = Unprotected;
    assert!(!probe.is_protected());
    assert!(!probe.is_debugger_present(true));
    assert!(!probe.is_virtual_machine_present());
    assert!(probe.is_valid_image_crc());
    assert_eq!(probe.decrypt_string("secret"), "secret");
}

// ── Concurrency ─────────────────────────────────────────────────

#[test]
fn concurrent_readers_never_see_half_set_session() {
    // Accepted and blacklisted are the same serial, so any verdict other
    // than Invalid or Blacklisted means a reader saw only half a session.
    let (lic, _) = licensing("AcceptedSerialNumber=ABC123\nBlackListedSerialNumber=ABC123");
    let lic = Arc::new(lic);
    let allowed = [
        SerialState::only(SerialFlag::Invalid),
        SerialState::only(SerialFlag::Blacklisted),
    ];

    let writers: Vec<_> = ["ABC123", "nope", "ABC123", "nope"]
        .into_iter()
        .map(|serial| {
            let lic = Arc::clone(&lic);
            thread::spawn(move || {
                for _ in 0..500 {
                    let state = lic.set_serial_number(serial);
                    assert!(allowed.contains(&state), "unexpected state {state}");
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let lic = Arc::clone(&lic);
            thread::spawn(move || {
                for _ in 0..500 {
                    let session = lic.evaluator().session();
                    assert_eq!(session.serial_accepted, session.serial_blacklisted);
                    let state = lic.serial_number_state();
                    assert!(allowed.contains(&state), "unexpected state {state}");
                    assert_ne!(state, SerialState::SUCCESS);
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }
}
