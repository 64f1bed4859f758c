//! Offset 0x04: frame characteristics register.
//!
//! Describes the micro-frame the host is about to read in response to a
//! touch interrupt.

use serde::Serialize;

use crate::error::{ReassemblyError, TicResult};
use crate::regs::field::BitField;
use crate::regs::{Register, RegisterKind};

/// Largest micro-frame size the 18-bit field can describe (256KB - 1).
pub const MAX_MICROFRAME_SIZE: u32 = (1 << 18) - 1;

/// Largest valid micro-frame count and index.
pub const MAX_MICROFRAMES: u8 = 31;

const MICROFRAME_SIZE: BitField = BitField::new("microframe_size", 0, 18);
const MICROFRAMES_PER_FRAME: BitField = BitField::new("microframes_per_frame", 18, 5);
const MICROFRAME_INDEX: BitField = BitField::new("microframe_index", 23, 5);
const HID_REPORT: BitField = BitField::new("hid_report", 28, 1);

/// Decoded frame characteristics register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FrameCharacteristics {
    /// Bytes to read for this micro-frame.
    pub microframe_size: u32,
    /// Micro-frames making up one frame (1..=31 when valid).
    pub microframes_per_frame: u8,
    /// 1-based index of this micro-frame (1..=31 when valid).
    pub microframe_index: u8,
    /// Set when the payload is a HID report rather than raw data.
    pub hid_report: bool,
}

impl FrameCharacteristics {
    /// Check the count/index invariants. Decoding accepts any bit pattern;
    /// this is where a zero count, a zero index or an index past the count
    /// is caught.
    pub fn validate(&self) -> Result<(), ReassemblyError> {
        let count_ok = (1..=MAX_MICROFRAMES).contains(&self.microframes_per_frame);
        let index_ok = (1..=self.microframes_per_frame).contains(&self.microframe_index);
        if count_ok && index_ok {
            Ok(())
        } else {
            Err(ReassemblyError::InvalidCharacteristics {
                index: self.microframe_index,
                microframes_per_frame: self.microframes_per_frame,
            })
        }
    }

    /// Whether this micro-frame closes its frame.
    pub fn is_last(&self) -> bool {
        self.microframe_index != 0 && self.microframe_index == self.microframes_per_frame
    }
}

impl Register for FrameCharacteristics {
    const KIND: RegisterKind = RegisterKind::FrameCharacteristics;

    fn decode(raw: u32) -> Self {
        Self {
            microframe_size: MICROFRAME_SIZE.get(raw),
            microframes_per_frame: MICROFRAMES_PER_FRAME.get(raw) as u8,
            microframe_index: MICROFRAME_INDEX.get(raw) as u8,
            hid_report: HID_REPORT.get_bool(raw),
        }
    }

    fn encode(&self) -> TicResult<u32> {
        Ok(MICROFRAME_SIZE.put(Self::KIND, self.microframe_size)?
            | MICROFRAMES_PER_FRAME.put(Self::KIND, u32::from(self.microframes_per_frame))?
            | MICROFRAME_INDEX.put(Self::KIND, u32::from(self.microframe_index))?
            | HID_REPORT.put_bool(self.hid_report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TicError;

    #[test]
    fn test_decode_fields() {
        // size=0x100, mfpf=4, index=2, hid
        let raw = 0x100 | (4 << 18) | (2 << 23) | (1 << 28);
        let fc = FrameCharacteristics::decode(raw);
        assert_eq!(fc.microframe_size, 0x100);
        assert_eq!(fc.microframes_per_frame, 4);
        assert_eq!(fc.microframe_index, 2);
        assert!(fc.hid_report);
        assert!(!fc.is_last());
        assert_eq!(fc.encode().ok(), Some(raw));
    }

    #[test]
    fn test_reserved_bits_dropped() {
        let raw = 0xE000_0000 | 0x40 | (1 << 18) | (1 << 23);
        let fc = FrameCharacteristics::decode(raw);
        assert!(fc.is_last());
        assert_eq!(fc.encode().ok(), Some(raw & 0x1FFF_FFFF));
    }

    #[test]
    fn test_encode_rejects_oversized_microframe() {
        let fc = FrameCharacteristics {
            microframe_size: MAX_MICROFRAME_SIZE + 1,
            microframes_per_frame: 1,
            microframe_index: 1,
            hid_report: false,
        };
        assert!(matches!(
            fc.encode(),
            Err(TicError::FieldOutOfRange {
                field: "microframe_size",
                ..
            })
        ));
    }

    #[test]
    fn test_encode_rejects_index_overflow() {
        let fc = FrameCharacteristics {
            microframe_size: 1,
            microframes_per_frame: 31,
            microframe_index: 32,
            hid_report: false,
        };
        assert!(fc.encode().is_err());
    }

    #[test]
    fn test_validate() {
        let ok = FrameCharacteristics {
            microframe_size: 64,
            microframes_per_frame: 3,
            microframe_index: 3,
            hid_report: false,
        };
        assert_eq!(ok.validate(), Ok(()));

        let zero_count = FrameCharacteristics {
            microframes_per_frame: 0,
            microframe_index: 0,
            ..ok
        };
        assert!(zero_count.validate().is_err());

        let past_end = FrameCharacteristics {
            microframe_index: 4,
            ..ok
        };
        assert_eq!(
            past_end.validate(),
            Err(ReassemblyError::InvalidCharacteristics {
                index: 4,
                microframes_per_frame: 3
            })
        );
    }
}
