//! Offset 0x14: data size register.

use serde::Serialize;

use crate::error::TicResult;
use crate::regs::field::BitField;
use crate::regs::{Register, RegisterKind};

/// Granularity of both data size fields.
pub const DATA_SIZE_INCREMENT: usize = 64;

const MAX_FRAME_SIZE: BitField = BitField::new("max_frame_size", 0, 12);
const MAX_FEEDBACK_SIZE: BitField = BitField::new("max_feedback_size", 12, 8);

/// Device-declared maxima, in 64-byte units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DataSize {
    pub max_frame_units: u16,
    pub max_feedback_units: u8,
}

impl DataSize {
    pub fn max_frame_bytes(&self) -> usize {
        usize::from(self.max_frame_units) * DATA_SIZE_INCREMENT
    }

    pub fn max_feedback_bytes(&self) -> usize {
        usize::from(self.max_feedback_units) * DATA_SIZE_INCREMENT
    }
}

impl Register for DataSize {
    const KIND: RegisterKind = RegisterKind::DataSize;

    fn decode(raw: u32) -> Self {
        Self {
            max_frame_units: MAX_FRAME_SIZE.get(raw) as u16,
            max_feedback_units: MAX_FEEDBACK_SIZE.get(raw) as u8,
        }
    }

    fn encode(&self) -> TicResult<u32> {
        Ok(MAX_FRAME_SIZE.put(Self::KIND, u32::from(self.max_frame_units))?
            | MAX_FEEDBACK_SIZE.put(Self::KIND, u32::from(self.max_feedback_units))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_sizes() {
        // 512 * 64 = 32KB frames, 255 * 64 feedback
        let ds = DataSize::decode(0x000F_F200);
        assert_eq!(ds.max_frame_units, 0x200);
        assert_eq!(ds.max_feedback_units, 0xFF);
        assert_eq!(ds.max_frame_bytes(), 32 * 1024);
        assert_eq!(ds.max_feedback_bytes(), 255 * 64);
    }

    #[test]
    fn test_encode_rejects_wide_frame_units() {
        let ds = DataSize {
            max_frame_units: 0x1000,
            max_feedback_units: 0,
        };
        assert!(ds.encode().is_err());
    }

    #[test]
    fn test_reserved_bits_zeroed() {
        assert_eq!(DataSize::decode(0xFFF0_0000).encode().ok(), Some(0));
    }
}
