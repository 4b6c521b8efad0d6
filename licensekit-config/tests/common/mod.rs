//! Shared test helpers for store tests.

#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

/// A license file with every fact set.
pub const FULL_LICENSE: &str = "\
[TestLicense]
AcceptedSerialNumber=ABC123
BlackListedSerialNumber=BAD999
AcceptedActivationCode=code-1234
UserName=Jane Doe
EMail=jane@example.com
ExpDate=20301231
MaxBuildDate=20291231
TimeLimit=10
KeyHWID=hw-1
MyHWID=hw-1
UserData=0a0b0c
";

/// Writes `contents` to `license.ini` in a fresh temp dir.
///
/// The directory must be kept alive for the file to exist.
pub fn write_store(contents: &[u8]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("license.ini");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents).unwrap();
    (dir, path)
}
