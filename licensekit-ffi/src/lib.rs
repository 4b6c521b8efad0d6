//! C ABI exports for licensekit.
//!
//! A single process-wide [`Licensing`] sits behind a mutex. It is created
//! by [`licensekit_init`], or on first use from `license.ini` beside the
//! executable. Strings cross the boundary as NUL-terminated UTF-8; a null
//! pointer is read as the empty string.
//!
//! Buffer-filling calls follow one convention: the caller passes a buffer
//! and its size in bytes including the terminating NUL.

mod activation;
mod probe;

pub use activation::*;
pub use probe::*;

use licensekit_config::ConfigStore;
use licensekit_license::Licensing;
use serde::Serialize;
use std::borrow::Cow;
use std::ffi::{c_char, c_int, CStr, CString};
use std::ptr;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

static HANDLE: Mutex<Option<Licensing>> = Mutex::new(None);

pub(crate) fn lock_handle() -> MutexGuard<'static, Option<Licensing>> {
    HANDLE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs `f` against the process licensing, loading it beside the
/// executable if [`licensekit_init`] was never called.
pub(crate) fn with_licensing<R>(f: impl FnOnce(&Licensing) -> R) -> R {
    let mut handle = lock_handle();
    let licensing = handle.get_or_insert_with(|| {
        let store = ConfigStore::beside_executable_or_empty();
        Licensing::new(&store)
    });
    f(licensing)
}

/// JSON envelope for calls that return structured data.
#[derive(Debug, Serialize)]
pub(crate) struct SdkResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

impl SdkResponse {
    pub(crate) fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error_code: None,
            error_message: None,
            data: Some(data),
        }
    }

    pub(crate) fn err(code: &str, message: &str) -> Self {
        Self {
            success: false,
            error_code: Some(code.to_string()),
            error_message: Some(message.to_string()),
            data: None,
        }
    }

    pub(crate) fn into_raw(self) -> *mut c_char {
        let json = serde_json::to_string(&self).unwrap_or_else(|_| {
            r#"{"success":false,"error_code":"json_error","error_message":"Failed to serialize response"}"#.to_string()
        });
        CString::new(json).unwrap_or_default().into_raw()
    }
}

/// Reads a C string argument. Null and invalid UTF-8 are handled leniently.
///
/// # Safety
/// `s` must be null or a valid NUL-terminated string.
pub(crate) unsafe fn read_str<'a>(s: *const c_char) -> Cow<'a, str> {
    if s.is_null() {
        return Cow::Borrowed("");
    }
    unsafe { CStr::from_ptr(s) }.to_string_lossy()
}

/// Copies `value` into `buf` if it fits with its NUL terminator.
///
/// # Safety
/// `buf` must be null or valid for `size` bytes of writes.
pub(crate) unsafe fn write_buf(value: &str, buf: *mut c_char, size: usize) -> bool {
    let needed = value.len() + 1;
    if buf.is_null() || size < needed {
        return false;
    }
    unsafe { copy_terminated(value.as_bytes(), buf) };
    true
}

/// Copies as much of `value` as fits into `buf`, always NUL-terminating.
/// Returns the number of bytes copied, NUL excluded.
///
/// # Safety
/// `buf` must be null or valid for `size` bytes of writes.
pub(crate) unsafe fn write_truncated(value: &str, buf: *mut c_char, size: usize) -> usize {
    if buf.is_null() || size == 0 {
        return 0;
    }
    let len = value.len().min(size - 1);
    unsafe { copy_terminated(&value.as_bytes()[..len], buf) };
    len
}

unsafe fn copy_terminated(bytes: &[u8], buf: *mut c_char) {
    unsafe {
        ptr::copy_nonoverlapping(bytes.as_ptr().cast::<c_char>(), buf, bytes.len());
        *buf.add(bytes.len()) = 0;
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Loads the license store and (re)creates the process licensing.
///
/// A null `path` loads `license.ini` beside the executable. A missing file
/// yields an empty store. Returns 0 on success and -1 if the file exists
/// but cannot be read, in which case the previous state is kept.
///
/// # Safety
/// `path` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn licensekit_init(path: *const c_char) -> c_int {
    init_logging();

    let store = if path.is_null() {
        ConfigStore::beside_executable_or_empty()
    } else {
        let path = unsafe { read_str(path) };
        match ConfigStore::load(&*path) {
            Ok(store) => store,
            Err(e) => {
                warn!("failed to load license store: {e}");
                return -1;
            }
        }
    };

    info!(present = store.is_present(), "licensekit initialized");
    *lock_handle() = Some(Licensing::new(&store));
    0
}

/// Drops the process licensing. The next call reinitializes lazily.
#[unsafe(no_mangle)]
pub extern "C" fn licensekit_shutdown() {
    *lock_handle() = None;
}

/// Sets the current serial number and returns its state bits.
///
/// # Safety
/// `serial` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn licensekit_set_serial_number(serial: *const c_char) -> c_int {
    let serial = unsafe { read_str(serial) };
    let state = with_licensing(|l| l.set_serial_number(&serial));
    state_bits(state)
}

/// Re-evaluates the current serial number and returns its state bits.
#[unsafe(no_mangle)]
pub extern "C" fn licensekit_get_serial_number_state() -> c_int {
    state_bits(with_licensing(Licensing::serial_number_state))
}

/// Returns the licensed data as a JSON response.
///
/// `data` holds `state` (flag names) and, for accepted serials, the user
/// fields. The returned pointer must be freed with `licensekit_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn licensekit_get_serial_number_data() -> *mut c_char {
    let data = with_licensing(Licensing::serial_number_data);
    match serde_json::to_value(&data) {
        Ok(value) => SdkResponse::ok(value),
        Err(e) => SdkResponse::err("json_error", &e.to_string()),
    }
    .into_raw()
}

/// Frees a string returned by this library.
///
/// # Safety
/// `s` must be null or a pointer returned by this library, freed once.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn licensekit_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

fn state_bits(state: licensekit_license::SerialState) -> c_int {
    // Flag bits stop at 0x40.
    c_int::try_from(state.bits()).unwrap_or(c_int::MAX)
}
