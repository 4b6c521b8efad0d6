//! Protection probe exports. Without a protection engine these report an
//! unprotected, untampered process.

use licensekit_license::{ProtectionProbe, Unprotected};

const PROBE: Unprotected = Unprotected;

#[unsafe(no_mangle)]
pub extern "C" fn licensekit_is_protected() -> bool {
    PROBE.is_protected()
}

#[unsafe(no_mangle)]
pub extern "C" fn licensekit_is_debugger_present(check_kernel_mode: bool) -> bool {
    PROBE.is_debugger_present(check_kernel_mode)
}

#[unsafe(no_mangle)]
pub extern "C" fn licensekit_is_virtual_machine_present() -> bool {
    PROBE.is_virtual_machine_present()
}

#[unsafe(no_mangle)]
pub extern "C" fn licensekit_is_valid_image_crc() -> bool {
    PROBE.is_valid_image_crc()
}
