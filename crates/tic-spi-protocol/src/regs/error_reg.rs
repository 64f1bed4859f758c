//! Offset 0x08: error register.
//!
//! Bit assignments beyond the three fixed flags and the fatal flag are vendor
//! specific and surfaced as an opaque 16-bit code.

use core::fmt;

use serde::Serialize;

use crate::error::{TicError, TicResult};
use crate::regs::field::BitField;
use crate::regs::{Register, RegisterKind};

const INVALID_FW: BitField = BitField::new("invalid_fw", 0, 1);
const INVALID_DATA: BitField = BitField::new("invalid_data", 1, 1);
const SELF_TEST_FAILED: BitField = BitField::new("self_test_failed", 2, 1);
const FATAL_ERROR: BitField = BitField::new("fatal_error", 15, 1);
const VENDOR_ERRORS: BitField = BitField::new("vendor_errors", 16, 16);

/// Decoded error register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct ErrorRegister {
    pub invalid_fw: bool,
    pub invalid_data: bool,
    pub self_test_failed: bool,
    pub fatal_error: bool,
    pub vendor_errors: u16,
}

impl ErrorRegister {
    /// Returns `true` when any flag or vendor bit is set.
    pub fn has_error(&self) -> bool {
        self.invalid_fw
            || self.invalid_data
            || self.self_test_failed
            || self.fatal_error
            || self.vendor_errors != 0
    }

    /// Turn a reported error into a [`TicError::DeviceReported`].
    ///
    /// Resolution (resetting, reloading firmware) stays with the caller.
    pub fn into_result(self) -> TicResult<()> {
        if self.has_error() {
            Err(TicError::DeviceReported(self))
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for ErrorRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.invalid_fw {
            flags.push("invalid firmware");
        }
        if self.invalid_data {
            flags.push("invalid data");
        }
        if self.self_test_failed {
            flags.push("self-test failed");
        }
        if self.fatal_error {
            flags.push("fatal");
        }
        if flags.is_empty() {
            write!(f, "no flags")?;
        } else {
            write!(f, "{}", flags.join(", "))?;
        }
        if self.vendor_errors != 0 {
            write!(f, " (vendor code {:#06x})", self.vendor_errors)?;
        }
        Ok(())
    }
}

impl Register for ErrorRegister {
    const KIND: RegisterKind = RegisterKind::Error;

    fn decode(raw: u32) -> Self {
        Self {
            invalid_fw: INVALID_FW.get_bool(raw),
            invalid_data: INVALID_DATA.get_bool(raw),
            self_test_failed: SELF_TEST_FAILED.get_bool(raw),
            fatal_error: FATAL_ERROR.get_bool(raw),
            vendor_errors: VENDOR_ERRORS.get(raw) as u16,
        }
    }

    fn encode(&self) -> TicResult<u32> {
        Ok(INVALID_FW.put_bool(self.invalid_fw)
            | INVALID_DATA.put_bool(self.invalid_data)
            | SELF_TEST_FAILED.put_bool(self.self_test_failed)
            | FATAL_ERROR.put_bool(self.fatal_error)
            | VENDOR_ERRORS.put(Self::KIND, u32::from(self.vendor_errors))?)
    }
}
