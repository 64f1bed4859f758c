//! Offset 0x1C: configuration register.
//!
//! Touch enable doubles as a hardware semaphore. While it is cleared the
//! device performs no sensing and raises only the reset interrupt, and the
//! host may change the other fields. **Precondition for every write of this
//! register with any field other than `touch_enable` changed: touch enable
//! must be cleared, and must stay cleared for the whole write sequence.**
//! The codec cannot observe the device and does not enforce this.

use serde::Serialize;

use crate::error::TicResult;
use crate::regs::field::{BitField, check_known};
use crate::regs::{Register, RegisterKind};

const TOUCH_ENABLE: BitField = BitField::new("touch_enable", 0, 1);
const DHPM: BitField = BitField::new("dhpm", 1, 1);
const BULK_XFER_SIZE: BitField = BitField::new("bulk_xfer_size", 2, 4);
const FREQ_SELECT: BitField = BitField::new("freq_select", 6, 3);

/// Data/HID packet mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum PacketMode {
    #[default]
    RawData,
    Hid,
}

/// Bytes written to the bulk data area per SPI write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum BulkTransferSize {
    #[default]
    B4,
    B8,
    B16,
    B32,
    B64,
    Unrecognized(u8),
}

impl BulkTransferSize {
    const LAST_KNOWN: u32 = 4;

    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::B4,
            1 => Self::B8,
            2 => Self::B16,
            3 => Self::B32,
            4 => Self::B64,
            other => Self::Unrecognized(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::B4 => 0,
            Self::B8 => 1,
            Self::B16 => 2,
            Self::B32 => 3,
            Self::B64 => 4,
            Self::Unrecognized(other) => other,
        }
    }

    pub fn bytes(self) -> Option<usize> {
        match self {
            Self::B4 => Some(4),
            Self::B8 => Some(8),
            Self::B16 => Some(16),
            Self::B32 => Some(32),
            Self::B64 => Some(64),
            Self::Unrecognized(_) => None,
        }
    }
}

/// SPI frequency selection, shared with the device-info response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Frequency {
    #[default]
    Reserved,
    /// 17 MHz (14 MHz on Atom).
    Mhz17,
    /// 30 MHz (25 MHz on Atom).
    Mhz30,
    Unrecognized(u8),
}

impl Frequency {
    const LAST_KNOWN: u32 = 2;

    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Reserved,
            1 => Self::Mhz17,
            2 => Self::Mhz30,
            other => Self::Unrecognized(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Reserved => 0,
            Self::Mhz17 => 1,
            Self::Mhz30 => 2,
            Self::Unrecognized(other) => other,
        }
    }

    pub fn nominal_mhz(self) -> Option<u32> {
        match self {
            Self::Mhz17 => Some(17),
            Self::Mhz30 => Some(30),
            Self::Reserved | Self::Unrecognized(_) => None,
        }
    }
}

/// Decoded configuration register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Configuration {
    pub touch_enable: bool,
    pub packet_mode: PacketMode,
    pub bulk_xfer_size: BulkTransferSize,
    pub freq_select: Frequency,
}

impl Register for Configuration {
    const KIND: RegisterKind = RegisterKind::Configuration;

    fn decode(raw: u32) -> Self {
        Self {
            touch_enable: TOUCH_ENABLE.get_bool(raw),
            packet_mode: if DHPM.get_bool(raw) {
                PacketMode::Hid
            } else {
                PacketMode::RawData
            },
            bulk_xfer_size: BulkTransferSize::from_code(BULK_XFER_SIZE.get(raw) as u8),
            freq_select: Frequency::from_code(FREQ_SELECT.get(raw) as u8),
        }
    }

    /// Host-written register: selectors outside the defined values are
    /// rejected even when they would fit the field.
    fn encode(&self) -> TicResult<u32> {
        let bulk = check_known(
            Self::KIND,
            BULK_XFER_SIZE.name,
            u32::from(self.bulk_xfer_size.code()),
            BulkTransferSize::LAST_KNOWN,
        )?;
        let freq = check_known(
            Self::KIND,
            FREQ_SELECT.name,
            u32::from(self.freq_select.code()),
            Frequency::LAST_KNOWN,
        )?;
        Ok(TOUCH_ENABLE.put_bool(self.touch_enable)
            | DHPM.put_bool(self.packet_mode == PacketMode::Hid)
            | BULK_XFER_SIZE.put(Self::KIND, bulk)?
            | FREQ_SELECT.put(Self::KIND, freq)?)
    }
}
