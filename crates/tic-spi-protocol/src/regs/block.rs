//! The 64-byte register block (offsets 0x00..=0x3F).
//!
//! This is the full set of registers needed for normal touch operation, as
//! read in one burst after a prepare-for-read command. It does not include
//! the test control register.

use serde::Serialize;

use crate::error::{EnvelopeKind, TicError, TicResult};
use crate::regs::{
    Capabilities, CommandRegister, CompatRevision, Configuration, DataSize, ErrorRegister,
    FirmwareRevision, FrameCharacteristics, HardwareRevision, Identification,
    PowerManagementControl, REGISTER_WIDTH, Register, RegisterKind, StatusRegister, VendorHwInfo,
};

/// Size of the register block snapshot.
pub const REGISTER_BLOCK_LEN: usize = 64;

const RESERVED_0: usize = 0x0C;
const RESERVED_1: usize = 0x38;
const RESERVED_2: usize = 0x3C;

/// Decoded register block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RegisterBlock {
    pub status: StatusRegister,
    pub frame_characteristics: FrameCharacteristics,
    pub error: ErrorRegister,
    pub identification: Identification,
    pub data_size: DataSize,
    pub capabilities: Capabilities,
    pub configuration: Configuration,
    pub command: CommandRegister,
    pub power_management: PowerManagementControl,
    pub vendor_hw_info: VendorHwInfo,
    pub hardware_revision: HardwareRevision,
    pub firmware_revision: FirmwareRevision,
    pub compat_revision: CompatRevision,
    /// Reserved words at 0x0C, 0x38 and 0x3C, as read.
    #[serde(skip)]
    pub reserved: [u32; 3],
}

fn word_at(bytes: &[u8], offset: usize) -> u32 {
    bytes
        .get(offset..offset + REGISTER_WIDTH)
        .and_then(|w| <[u8; 4]>::try_from(w).ok())
        .map(u32::from_le_bytes)
        .unwrap_or(0)
}

fn put_word(out: &mut [u8; REGISTER_BLOCK_LEN], offset: usize, value: u32) {
    if let Some(slot) = out.get_mut(offset..offset + REGISTER_WIDTH) {
        slot.copy_from_slice(&value.to_le_bytes());
    }
}

fn reg<R: Register>(bytes: &[u8]) -> R {
    R::decode(word_at(bytes, R::KIND.offset() as usize))
}

impl RegisterBlock {
    /// Parse a register block from the first 64 bytes of `bytes`.
    pub fn parse(bytes: &[u8]) -> TicResult<Self> {
        if bytes.len() < REGISTER_BLOCK_LEN {
            return Err(TicError::TruncatedHeader {
                envelope: EnvelopeKind::RegisterBlock,
                expected: REGISTER_BLOCK_LEN,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            status: reg(bytes),
            frame_characteristics: reg(bytes),
            error: reg(bytes),
            identification: reg(bytes),
            data_size: reg(bytes),
            capabilities: reg(bytes),
            configuration: reg(bytes),
            command: reg(bytes),
            power_management: reg(bytes),
            vendor_hw_info: reg(bytes),
            hardware_revision: reg(bytes),
            firmware_revision: reg(bytes),
            compat_revision: reg(bytes),
            reserved: [
                word_at(bytes, RESERVED_0),
                word_at(bytes, RESERVED_1),
                word_at(bytes, RESERVED_2),
            ],
        })
    }

    /// Encode the block; reserved words are written as zero.
    pub fn encode(&self) -> TicResult<[u8; REGISTER_BLOCK_LEN]> {
        let words = [
            (RegisterKind::Status, self.status.encode()?),
            (
                RegisterKind::FrameCharacteristics,
                self.frame_characteristics.encode()?,
            ),
            (RegisterKind::Error, self.error.encode()?),
            (RegisterKind::Identification, self.identification.encode()?),
            (RegisterKind::DataSize, self.data_size.encode()?),
            (RegisterKind::Capabilities, self.capabilities.encode()?),
            (RegisterKind::Configuration, self.configuration.encode()?),
            (RegisterKind::Command, self.command.encode()?),
            (
                RegisterKind::PowerManagementControl,
                self.power_management.encode()?,
            ),
            (RegisterKind::VendorHwInfo, self.vendor_hw_info.encode()?),
            (
                RegisterKind::HardwareRevision,
                self.hardware_revision.encode()?,
            ),
            (
                RegisterKind::FirmwareRevision,
                self.firmware_revision.encode()?,
            ),
            (RegisterKind::CompatRevision, self.compat_revision.encode()?),
        ];

        let mut out = [0u8; REGISTER_BLOCK_LEN];
        for (kind, value) in words {
            put_word(&mut out, kind.offset() as usize, value);
        }
        Ok(out)
    }

    /// Whether the identification word carries the "$TIC" signature.
    pub fn has_valid_id(&self) -> bool {
        self.identification.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regs::{InterruptType, TOUCH_ID_VALUE};

    fn sample_block() -> [u8; REGISTER_BLOCK_LEN] {
        let mut raw = [0u8; REGISTER_BLOCK_LEN];
        let words: [(usize, u32); 6] = [
            (0x00, 0x5A00_0009),
            (0x0C, 0xDEAD_BEEF),
            (0x10, TOUCH_ID_VALUE),
            (0x14, 0x0001_0200),
            (0x28, 0x1234_8086),
            (0x34, 0x0001_0100),
        ];
        for (offset, value) in words {
            raw[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
        }
        raw
    }

    #[test]
    fn test_block_covers_register_map() {
        for kind in RegisterKind::ALL {
            if kind != RegisterKind::TestControl {
                assert!((kind.offset() as usize) < REGISTER_BLOCK_LEN);
            }
        }
        assert!(RegisterKind::TestControl.offset() as usize >= REGISTER_BLOCK_LEN);
    }

    #[test]
    fn test_parse_block() -> Result<(), Box<dyn std::error::Error>> {
        let block = RegisterBlock::parse(&sample_block())?;
        assert!(block.has_valid_id());
        assert!(block.status.int_status);
        assert_eq!(block.status.int_type, InterruptType::GetFeatures);
        assert_eq!(block.data_size.max_frame_units, 0x200);
        assert_eq!(block.data_size.max_feedback_units, 0x10);
        assert_eq!(block.vendor_hw_info.vendor_id, 0x8086);
        assert!(block.compat_revision.is_supported());
        assert_eq!(block.reserved[0], 0xDEAD_BEEF);
        Ok(())
    }

    #[test]
    fn test_encode_zeroes_reserved_words() -> Result<(), Box<dyn std::error::Error>> {
        let raw = sample_block();
        let encoded = RegisterBlock::parse(&raw)?.encode()?;
        assert_eq!(&encoded[0x0C..0x10], &[0, 0, 0, 0]);
        assert_eq!(&encoded[..0x0C], &raw[..0x0C]);
        assert_eq!(&encoded[0x10..], &raw[0x10..]);
        Ok(())
    }

    #[test]
    fn test_truncated_block() {
        assert_eq!(
            RegisterBlock::parse(&[0u8; 63]),
            Err(TicError::TruncatedHeader {
                envelope: EnvelopeKind::RegisterBlock,
                expected: REGISTER_BLOCK_LEN,
                actual: 63,
            })
        );
    }
}
