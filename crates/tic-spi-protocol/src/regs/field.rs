//! Mask-and-shift helpers shared by every register view.

use crate::error::{TicError, TicResult};
use crate::regs::RegisterKind;

/// A contiguous bit field inside a 32-bit register word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    /// Field name used in error reports.
    pub name: &'static str,
    /// Position of the least significant bit.
    pub shift: u32,
    /// Width in bits (1..=32).
    pub width: u32,
}

impl BitField {
    pub const fn new(name: &'static str, shift: u32, width: u32) -> Self {
        Self { name, shift, width }
    }

    /// Largest value the field can hold.
    pub const fn max(self) -> u32 {
        if self.width >= 32 {
            u32::MAX
        } else {
            (1u32 << self.width) - 1
        }
    }

    /// In-place mask of the field within the register word.
    pub const fn mask(self) -> u32 {
        self.max() << self.shift
    }

    /// Extract the field from a raw register word.
    pub const fn get(self, raw: u32) -> u32 {
        (raw >> self.shift) & self.max()
    }

    pub const fn get_bool(self, raw: u32) -> bool {
        self.get(raw) != 0
    }

    /// Place `value` into its position, rejecting values wider than the field.
    pub fn put(self, register: RegisterKind, value: u32) -> TicResult<u32> {
        if value > self.max() {
            return Err(TicError::field(
                register,
                self.name,
                u64::from(value),
                u64::from(self.max()),
            ));
        }
        Ok(value << self.shift)
    }

    pub const fn put_bool(self, value: bool) -> u32 {
        (value as u32) << self.shift
    }
}

/// Reject an enumeration code that lies outside the defined variants.
pub(crate) fn check_known(
    register: RegisterKind,
    field: &'static str,
    code: u32,
    last_known: u32,
) -> TicResult<u32> {
    if code > last_known {
        return Err(TicError::field(
            register,
            field,
            u64::from(code),
            u64::from(last_known),
        ));
    }
    Ok(code)
}
