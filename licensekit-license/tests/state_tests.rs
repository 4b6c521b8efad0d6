use licensekit_license::{SerialFlag, SerialState};

#[test]
fn success_is_empty() {
    assert!(SerialState::SUCCESS.is_success());
    assert_eq!(SerialState::SUCCESS.len(), 0);
    assert_eq!(SerialState::SUCCESS.bits(), 0);
    assert_eq!(SerialState::default(), SerialState::SUCCESS);
}

#[test]
fn wire_bits() {
    assert_eq!(SerialFlag::Corrupted.bit(), 0x01);
    assert_eq!(SerialFlag::Invalid.bit(), 0x02);
    assert_eq!(SerialFlag::Blacklisted.bit(), 0x04);
    assert_eq!(SerialFlag::DateExpired.bit(), 0x08);
    assert_eq!(SerialFlag::RunningTimeOver.bit(), 0x10);
    assert_eq!(SerialFlag::BadHwid.bit(), 0x20);
    assert_eq!(SerialFlag::MaxBuildExpired.bit(), 0x40);
}

#[test]
fn from_bits_drops_unknown() {
    let state = SerialState::from_bits(0x08 | 0x20 | 0x100);
    assert_eq!(state, SerialFlag::DateExpired | SerialFlag::BadHwid);
    assert_eq!(state.bits(), 0x28);
}

#[test]
fn insertion_order_does_not_matter() {
    let a = SerialFlag::BadHwid | SerialFlag::DateExpired;
    let b = SerialFlag::DateExpired | SerialFlag::BadHwid;
    assert_eq!(a, b);
}

#[test]
fn insert_is_idempotent() {
    let mut state = SerialState::only(SerialFlag::BadHwid);
    state.insert(SerialFlag::BadHwid);
    assert_eq!(state.len(), 1);
}

#[test]
fn rejected_flags() {
    assert!(SerialState::only(SerialFlag::Invalid).is_rejected());
    assert!(SerialState::only(SerialFlag::Blacklisted).is_rejected());
    assert!(!SerialState::only(SerialFlag::DateExpired).is_rejected());
    assert!(!SerialState::SUCCESS.is_rejected());
}

#[test]
fn iter_in_bit_order() {
    let state = SerialFlag::MaxBuildExpired | SerialFlag::Corrupted;
    let flags: Vec<SerialFlag> = state.iter().collect();
    assert_eq!(flags, vec![SerialFlag::Corrupted, SerialFlag::MaxBuildExpired]);
}

#[test]
fn serde_as_flag_list() {
    let state = SerialFlag::RunningTimeOver | SerialFlag::BadHwid;
    let json = serde_json::to_string(&state).unwrap();
    assert_eq!(json, r#"["running_time_over","bad_hwid"]"#);
    let parsed: SerialState = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, state);
}

#[test]
fn flag_display_matches_serde() {
    for flag in SerialFlag::ALL {
        let json = serde_json::to_string(&flag).unwrap();
        assert_eq!(json, format!("\"{flag}\""));
    }
}
