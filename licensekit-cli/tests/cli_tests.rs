mod common;

use clap::Parser;
use common::{license_file, run_cli};
use licensekit_cli::{Args, Command};
use pretty_assertions::assert_eq;

const LICENSE: &str = "\
[TestLicense]
AcceptedSerialNumber=ABC123
AcceptedActivationCode=code-1
UserName=Jane Doe
MyHWID=machine-7

[Other]
AcceptedSerialNumber=XYZ
";

#[test]
fn parses_subcommands() {
    let args = Args::try_parse_from(["licensekit", "-l", "x.ini", "offline-activation", "c"]).unwrap();
    assert_eq!(args.command, Command::OfflineActivation { code: "c".into() });
    assert_eq!(args.section, "TestLicense");
    assert!(!args.verbose);
}

#[test]
fn check_prints_report() {
    let (_dir, path) = license_file(LICENSE);
    let out = run_cli(&["--license", path.to_str().unwrap(), "check", "ABC-123"]).unwrap();
    let report: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["bits"], 0);
    assert_eq!(report["state"], serde_json::json!([]));
    assert_eq!(report["user_name"], "Jane Doe");
}

#[test]
fn check_rejected_serial() {
    let (_dir, path) = license_file(LICENSE);
    let out = run_cli(&["--license", path.to_str().unwrap(), "check", "nope"]).unwrap();
    let report: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["bits"], 2);
    assert_eq!(report["user_name"], "");
}

#[test]
fn section_flag_selects_section() {
    let (_dir, path) = license_file(LICENSE);
    let out = run_cli(&[
        "--license",
        path.to_str().unwrap(),
        "--section",
        "Other",
        "check",
        "XYZ",
    ])
    .unwrap();
    let report: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["bits"], 0);
}

#[test]
fn hwid_prints_store_value() {
    let (_dir, path) = license_file(LICENSE);
    let out = run_cli(&["--license", path.to_str().unwrap(), "hwid"]).unwrap();
    assert_eq!(out, "machine-7\n");
}

#[test]
fn activate_and_deactivate() {
    let (_dir, path) = license_file(LICENSE);
    let path = path.to_str().unwrap();
    assert_eq!(run_cli(&["-l", path, "activate", "code-1"]).unwrap(), "ABC123\n");
    assert_eq!(run_cli(&["-l", path, "deactivate", "ABC123"]).unwrap(), "deactivated\n");

    let err = run_cli(&["-l", path, "activate", "code-2"]).unwrap_err();
    assert!(format!("{err:#}").contains("bad activation code"));
}

#[test]
fn offline_requests() {
    let (_dir, path) = license_file(LICENSE);
    let path = path.to_str().unwrap();
    let out = run_cli(&["-l", path, "offline-activation", "code-1"]).unwrap();
    assert!(!out.trim().is_empty());
    assert!(run_cli(&["-l", path, "offline-activation", "bad code"]).is_err());
    assert!(run_cli(&["-l", path, "offline-deactivation", "ABC123"]).is_ok());
}

#[test]
fn missing_license_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.ini");
    let out = run_cli(&["-l", path.to_str().unwrap(), "activate", "activationcode"]).unwrap();
    assert_eq!(out, "serialnumber\n");
}
