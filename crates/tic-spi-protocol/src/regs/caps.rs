//! Offset 0x18: capabilities register.

use serde::Serialize;

use crate::error::TicResult;
use crate::regs::field::BitField;
use crate::regs::{Register, RegisterKind};

/// Granularity of the bulk write limit.
pub const BULK_WRITE_INCREMENT: u32 = 64;

const SUPPORTS_17MHZ: BitField = BitField::new("supported_17mhz", 1, 1);
const SUPPORTS_30MHZ: BitField = BitField::new("supported_30mhz", 2, 1);
const SUPPORTS_50MHZ: BitField = BitField::new("supported_50mhz", 3, 1);
const SINGLE_IO: BitField = BitField::new("supported_single_io", 8, 1);
const DUAL_IO: BitField = BitField::new("supported_dual_io", 9, 1);
const QUAD_IO: BitField = BitField::new("supported_quad_io", 10, 1);
const BULK_DATA_MAX_WRITE: BitField = BitField::new("bulk_data_max_write", 11, 6);
const READ_DELAY: BitField = BitField::new("read_delay_timer_value", 17, 3);
const MAX_TOUCH_POINTS: BitField = BitField::new("max_touch_points", 24, 8);

/// Delay the host inserts when a read interrupt follows a data write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ReadDelay {
    #[default]
    None,
    Us10,
    Us50,
    Us100,
    Us150,
    Us250,
    Us500,
    Ms1,
}

impl ReadDelay {
    pub fn from_code(code: u8) -> Self {
        match code & 0x7 {
            0 => Self::None,
            1 => Self::Us10,
            2 => Self::Us50,
            3 => Self::Us100,
            4 => Self::Us150,
            5 => Self::Us250,
            6 => Self::Us500,
            _ => Self::Ms1,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Us10 => 1,
            Self::Us50 => 2,
            Self::Us100 => 3,
            Self::Us150 => 4,
            Self::Us250 => 5,
            Self::Us500 => 6,
            Self::Ms1 => 7,
        }
    }

    pub fn micros(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Us10 => 10,
            Self::Us50 => 50,
            Self::Us100 => 100,
            Self::Us150 => 150,
            Self::Us250 => 250,
            Self::Us500 => 500,
            Self::Ms1 => 1000,
        }
    }
}

/// Decoded capabilities register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Capabilities {
    /// 17 MHz (14 MHz on Atom) supported.
    pub supports_17mhz: bool,
    /// 30 MHz (25 MHz on Atom) supported.
    pub supports_30mhz: bool,
    pub supports_50mhz: bool,
    pub single_io: bool,
    pub dual_io: bool,
    pub quad_io: bool,
    /// Bytes the host may write to the data window before polling busy,
    /// in 64-byte units. Zero means no limit.
    pub bulk_data_max_write: u8,
    pub read_delay: ReadDelay,
    pub max_touch_points: u8,
}

impl Capabilities {
    /// Bulk write limit in bytes, `None` when the device imposes none.
    pub fn bulk_max_write_bytes(&self) -> Option<u32> {
        match self.bulk_data_max_write {
            0 => None,
            units => Some(u32::from(units) * BULK_WRITE_INCREMENT),
        }
    }
}

impl Register for Capabilities {
    const KIND: RegisterKind = RegisterKind::Capabilities;

    fn decode(raw: u32) -> Self {
        Self {
            supports_17mhz: SUPPORTS_17MHZ.get_bool(raw),
            supports_30mhz: SUPPORTS_30MHZ.get_bool(raw),
            supports_50mhz: SUPPORTS_50MHZ.get_bool(raw),
            single_io: SINGLE_IO.get_bool(raw),
            dual_io: DUAL_IO.get_bool(raw),
            quad_io: QUAD_IO.get_bool(raw),
            bulk_data_max_write: BULK_DATA_MAX_WRITE.get(raw) as u8,
            read_delay: ReadDelay::from_code(READ_DELAY.get(raw) as u8),
            max_touch_points: MAX_TOUCH_POINTS.get(raw) as u8,
        }
    }

    fn encode(&self) -> TicResult<u32> {
        Ok(SUPPORTS_17MHZ.put_bool(self.supports_17mhz)
            | SUPPORTS_30MHZ.put_bool(self.supports_30mhz)
            | SUPPORTS_50MHZ.put_bool(self.supports_50mhz)
            | SINGLE_IO.put_bool(self.single_io)
            | DUAL_IO.put_bool(self.dual_io)
            | QUAD_IO.put_bool(self.quad_io)
            | BULK_DATA_MAX_WRITE.put(Self::KIND, u32::from(self.bulk_data_max_write))?
            | READ_DELAY.put(Self::KIND, u32::from(self.read_delay.code()))?
            | MAX_TOUCH_POINTS.put(Self::KIND, u32::from(self.max_touch_points))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_capabilities() {
        // 17+30 MHz, single+quad IO, bulk=16 units, delay=100us, 10 touch points
        let raw = (1 << 1) | (1 << 2) | (1 << 8) | (1 << 10) | (16 << 11) | (3 << 17) | (10 << 24);
        let caps = Capabilities::decode(raw);
        assert!(caps.supports_17mhz);
        assert!(caps.supports_30mhz);
        assert!(!caps.supports_50mhz);
        assert!(caps.single_io);
        assert!(!caps.dual_io);
        assert!(caps.quad_io);
        assert_eq!(caps.bulk_data_max_write, 16);
        assert_eq!(caps.bulk_max_write_bytes(), Some(1024));
        assert_eq!(caps.read_delay, ReadDelay::Us100);
        assert_eq!(caps.read_delay.micros(), 100);
        assert_eq!(caps.max_touch_points, 10);
        assert_eq!(caps.encode().ok(), Some(raw));
    }

    #[test]
    fn test_unlimited_bulk_write() {
        assert_eq!(Capabilities::decode(0).bulk_max_write_bytes(), None);
    }

    #[test]
    fn test_reserved_bits_zeroed() {
        let reserved = 0x1 | 0xF0 | (0xF << 20);
        assert_eq!(Capabilities::decode(reserved).encode().ok(), Some(0));
    }

    #[test]
    fn test_bulk_write_overflow_rejected() {
        let caps = Capabilities {
            bulk_data_max_write: 64,
            ..Capabilities::default()
        };
        assert!(caps.encode().is_err());
    }
}
