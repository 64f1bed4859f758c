//! Offset 0x00: status register.
//!
//! Read by the host immediately after every interrupt. The top byte is a
//! fixed sync pattern; a read whose sync byte is anything other than
//! [`SYNC_BYTE`] must be treated as untrusted.

use serde::Serialize;

use crate::error::{TicError, TicResult};
use crate::regs::field::BitField;
use crate::regs::{Register, RegisterKind};

/// Expected value of the status register sync byte.
pub const SYNC_BYTE: u8 = 0x5A;

const INT_STATUS: BitField = BitField::new("int_status", 0, 1);
const INT_TYPE: BitField = BitField::new("int_type", 1, 4);
const PWR_STATE: BitField = BitField::new("pwr_state", 5, 2);
const INIT_STATE: BitField = BitField::new("init_state", 7, 2);
const BUSY: BitField = BitField::new("busy", 9, 1);
const SYNC: BitField = BitField::new("sync_byte", 24, 8);

/// Interrupt type field (4 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InterruptType {
    /// Touch data available.
    DataAvailable,
    /// Device reset occurred.
    ResetOccurred,
    /// Error occurred, details in the error register.
    ErrorOccurred,
    /// Vendor-specific data, handled like a raw frame.
    VendorData,
    /// Get-features response available.
    GetFeatures,
    /// Code at or past the defined range.
    Unrecognized(u8),
}

impl InterruptType {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::DataAvailable,
            1 => Self::ResetOccurred,
            2 => Self::ErrorOccurred,
            3 => Self::VendorData,
            4 => Self::GetFeatures,
            other => Self::Unrecognized(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::DataAvailable => 0,
            Self::ResetOccurred => 1,
            Self::ErrorOccurred => 2,
            Self::VendorData => 3,
            Self::GetFeatures => 4,
            Self::Unrecognized(other) => other,
        }
    }
}

/// Device power state. All four 2-bit codes are defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum PowerState {
    #[default]
    Sleep,
    Doze,
    Armed,
    Sensing,
}

impl PowerState {
    pub fn from_code(code: u8) -> Self {
        match code & 0x3 {
            0 => Self::Sleep,
            1 => Self::Doze,
            2 => Self::Armed,
            _ => Self::Sensing,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Sleep => 0,
            Self::Doze => 1,
            Self::Armed => 2,
            Self::Sensing => 3,
        }
    }
}

/// Device initialization state. All four 2-bit codes are defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum InitState {
    /// Ready for normal operation.
    #[default]
    ReadyForOp,
    /// Firmware must be loaded.
    FwNeeded,
    /// Configuration data must be loaded.
    DataNeeded,
    /// Initialization failed; see the error register.
    InitError,
}

impl InitState {
    pub fn from_code(code: u8) -> Self {
        match code & 0x3 {
            0 => Self::ReadyForOp,
            1 => Self::FwNeeded,
            2 => Self::DataNeeded,
            _ => Self::InitError,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::ReadyForOp => 0,
            Self::FwNeeded => 1,
            Self::DataNeeded => 2,
            Self::InitError => 3,
        }
    }
}

/// Decoded status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusRegister {
    /// Set when the device has data that needs to be read.
    pub int_status: bool,
    pub int_type: InterruptType,
    pub power_state: PowerState,
    pub init_state: InitState,
    /// Device cannot accept writes while set.
    pub busy: bool,
    pub sync_byte: u8,
}

impl Default for StatusRegister {
    fn default() -> Self {
        Self {
            int_status: false,
            int_type: InterruptType::DataAvailable,
            power_state: PowerState::Sleep,
            init_state: InitState::ReadyForOp,
            busy: false,
            sync_byte: SYNC_BYTE,
        }
    }
}

impl StatusRegister {
    /// Returns `true` when the sync byte differs from [`SYNC_BYTE`].
    pub fn sync_mismatch(&self) -> bool {
        self.sync_byte != SYNC_BYTE
    }

    /// Fail with [`TicError::SyncMismatch`] when the read is untrusted.
    pub fn check_sync(&self) -> TicResult<()> {
        if self.sync_mismatch() {
            return Err(TicError::SyncMismatch {
                found: self.sync_byte,
            });
        }
        Ok(())
    }
}

impl Register for StatusRegister {
    const KIND: RegisterKind = RegisterKind::Status;

    fn decode(raw: u32) -> Self {
        Self {
            int_status: INT_STATUS.get_bool(raw),
            int_type: InterruptType::from_code(INT_TYPE.get(raw) as u8),
            power_state: PowerState::from_code(PWR_STATE.get(raw) as u8),
            init_state: InitState::from_code(INIT_STATE.get(raw) as u8),
            busy: BUSY.get_bool(raw),
            sync_byte: SYNC.get(raw) as u8,
        }
    }

    fn encode(&self) -> TicResult<u32> {
        Ok(INT_STATUS.put_bool(self.int_status)
            | INT_TYPE.put(Self::KIND, u32::from(self.int_type.code()))?
            | PWR_STATE.put(Self::KIND, u32::from(self.power_state.code()))?
            | INIT_STATE.put(Self::KIND, u32::from(self.init_state.code()))?
            | BUSY.put_bool(self.busy)
            | SYNC.put(Self::KIND, u32::from(self.sync_byte))?)
    }
}
