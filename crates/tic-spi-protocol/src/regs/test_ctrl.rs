//! Offset 0x40: test control register.
//!
//! Consulted by the device when the host issues
//! [`CommandCode::GenerateTestPackets`](crate::regs::CommandCode::GenerateTestPackets).
//! Multiple test frames are generated at 100 Hz.

use serde::Serialize;

use crate::error::TicResult;
use crate::regs::field::BitField;
use crate::regs::{Register, RegisterKind};

/// Granularity of the raw test frame size.
pub const TEST_FRAME_INCREMENT: usize = 64;

const RAW_TEST_FRAME_SIZE: BitField = BitField::new("raw_test_frame_size", 0, 16);
const NUM_TEST_FRAMES: BitField = BitField::new("num_test_frames", 16, 16);

/// Decoded test control register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TestControl {
    /// Raw-mode test frame size in 64-byte units.
    pub raw_test_frame_units: u16,
    /// Number of test frames or HID reports to generate.
    pub num_test_frames: u16,
}

impl TestControl {
    pub fn raw_test_frame_bytes(&self) -> usize {
        usize::from(self.raw_test_frame_units) * TEST_FRAME_INCREMENT
    }
}

impl Register for TestControl {
    const KIND: RegisterKind = RegisterKind::TestControl;

    fn decode(raw: u32) -> Self {
        Self {
            raw_test_frame_units: RAW_TEST_FRAME_SIZE.get(raw) as u16,
            num_test_frames: NUM_TEST_FRAMES.get(raw) as u16,
        }
    }

    fn encode(&self) -> TicResult<u32> {
        Ok(RAW_TEST_FRAME_SIZE.put(Self::KIND, u32::from(self.raw_test_frame_units))?
            | NUM_TEST_FRAMES.put(Self::KIND, u32::from(self.num_test_frames))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_control() {
        let tc = TestControl::decode(0x0003_0010);
        assert_eq!(tc.raw_test_frame_units, 16);
        assert_eq!(tc.raw_test_frame_bytes(), 1024);
        assert_eq!(tc.num_test_frames, 3);
        assert_eq!(tc.encode().ok(), Some(0x0003_0010));
    }
}
