//! Activation exports.
//!
//! Return values are the activation codes: 0 for success, 1 when the
//! output buffer is too small, and 2 through 10 for
//! `ActivationError` outcomes.

use crate::{read_str, with_licensing, write_buf, write_truncated};
use licensekit_license::{ActivationResult, ACTIVATION_OK, ACTIVATION_SMALL_BUFFER};
use std::ffi::{c_char, c_int};

fn to_code(result: ActivationResult<()>) -> c_int {
    match result {
        Ok(()) => ACTIVATION_OK,
        Err(e) => e.code(),
    }
}

/// # Safety
/// `buf` must be null or valid for `size` bytes of writes.
unsafe fn deliver(result: ActivationResult<String>, buf: *mut c_char, size: usize) -> c_int {
    match result {
        Ok(value) if unsafe { write_buf(&value, buf, size) } => ACTIVATION_OK,
        Ok(_) => ACTIVATION_SMALL_BUFFER,
        Err(e) => e.code(),
    }
}

/// Writes the current hardware id into `buf`, truncating if needed.
///
/// With a null `buf`, returns the size needed for the full id, NUL
/// included. Otherwise returns the bytes written, NUL included, or 0 when
/// `size` is 0.
///
/// # Safety
/// `buf` must be null or valid for `size` bytes of writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn licensekit_get_current_hwid(buf: *mut c_char, size: usize) -> c_int {
    if !buf.is_null() && size == 0 {
        return 0;
    }
    let hwid = with_licensing(|l| l.current_hwid());
    let len = if buf.is_null() {
        hwid.len()
    } else {
        unsafe { write_truncated(&hwid, buf, size) }
    };
    c_int::try_from(len + 1).unwrap_or(c_int::MAX)
}

/// Trades `code` for a serial number, written into `buf`.
///
/// # Safety
/// `code` must be null or a valid NUL-terminated string. `buf` must be
/// null or valid for `size` bytes of writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn licensekit_activate_license(
    code: *const c_char,
    buf: *mut c_char,
    size: usize,
) -> c_int {
    let code = unsafe { read_str(code) };
    let result = with_licensing(|l| l.activate_license(&code));
    unsafe { deliver(result, buf, size) }
}

/// Releases `serial`.
///
/// # Safety
/// `serial` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn licensekit_deactivate_license(serial: *const c_char) -> c_int {
    let serial = unsafe { read_str(serial) };
    to_code(with_licensing(|l| l.deactivate_license(&serial)))
}

/// Writes an offline activation request for `code` into `buf`.
///
/// # Safety
/// `code` must be null or a valid NUL-terminated string. `buf` must be
/// null or valid for `size` bytes of writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn licensekit_get_offline_activation_string(
    code: *const c_char,
    buf: *mut c_char,
    size: usize,
) -> c_int {
    let code = unsafe { read_str(code) };
    let result = with_licensing(|l| l.offline_activation_string(&code));
    unsafe { deliver(result, buf, size) }
}

/// Writes an offline deactivation request for `serial` into `buf`.
///
/// # Safety
/// `serial` must be null or a valid NUL-terminated string. `buf` must be
/// null or valid for `size` bytes of writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn licensekit_get_offline_deactivation_string(
    serial: *const c_char,
    buf: *mut c_char,
    size: usize,
) -> c_int {
    let serial = unsafe { read_str(serial) };
    let result = with_licensing(|l| l.offline_deactivation_string(&serial));
    unsafe { deliver(result, buf, size) }
}
