//! Shared helpers for C ABI tests.

#![allow(dead_code)]

use licensekit_ffi::{licensekit_free_string, licensekit_init};
use std::ffi::{c_char, CStr, CString};
use std::fs;
use tempfile::TempDir;

/// Writes a `license.ini` with `body` under `[TestLicense]` and loads it.
///
/// The returned directory must outlive the test.
pub fn init_with(body: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("license.ini");
    fs::write(&path, format!("[TestLicense]\n{body}\n")).unwrap();
    let c_path = cstr(path.to_str().unwrap());
    assert_eq!(unsafe { licensekit_init(c_path.as_ptr()) }, 0);
    dir
}

pub fn cstr(s: &str) -> CString {
    CString::new(s).unwrap()
}

/// Takes ownership of a library-allocated string.
pub fn take_string(ptr: *mut c_char) -> String {
    assert!(!ptr.is_null());
    let s = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string();
    unsafe { licensekit_free_string(ptr) };
    s
}

/// Reads a NUL-terminated buffer.
pub fn buf_str(buf: &[c_char]) -> String {
    unsafe { CStr::from_ptr(buf.as_ptr()) }
        .to_str()
        .unwrap()
        .to_string()
}
