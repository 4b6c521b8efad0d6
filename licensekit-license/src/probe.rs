//! Capability probes supplied by a binary-protection engine.
//!
//! Licensing never calls these. They are exposed so that a caller can
//! combine them with a verdict as it sees fit. Without a protection engine
//! every probe reports an unprotected, untampered process.

/// Environment checks a protection engine can answer.
pub trait ProtectionProbe: Send + Sync {
    /// Returns true if the binary is running under the protection engine.
    fn is_protected(&self) -> bool;

    /// Returns true if a debugger is attached. `check_kernel_mode` asks the
    /// engine to also look for kernel-mode debuggers.
    fn is_debugger_present(&self, check_kernel_mode: bool) -> bool;

    /// Returns true if the process runs inside a virtual machine.
    fn is_virtual_machine_present(&self) -> bool;

    /// Returns true if the executable image passes its integrity check.
    fn is_valid_image_crc(&self) -> bool;

    /// Decrypts a string literal protected by the engine.
    fn decrypt_string<'a>(&self, value: &'a str) -> std::borrow::Cow<'a, str>;
}

/// Probe results for a binary that is not protected.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unprotected;

impl ProtectionProbe for Unprotected {
    fn is_protected(&self) -> bool {
        false
    }

    fn is_debugger_present(&self, _check_kernel_mode: bool) -> bool {
        false
    }

    fn is_virtual_machine_present(&self) -> bool {
        false
    }

    fn is_valid_image_crc(&self) -> bool {
        true
    }

    fn decrypt_string<'a>(&self, value: &'a str) -> std::borrow::Cow<'a, str> {
        std::borrow::Cow::Borrowed(value)
    }
}
