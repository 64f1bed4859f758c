//! Error payload carried by a raw data envelope of type
//! [`RawDataType::Error`].
//!
//! ```text
//! 0x00 error_type      u8
//! 0x01 reserved        [u8; 3]
//! 0x04 firmware error  u32
//! 0x08 error register  u32
//! ```

use serde::Serialize;

use crate::config::CodecConfig;
use crate::envelope::raw_data::{RawDataHeader, RawDataType, build_raw_data};
use crate::envelope::{le_u32, put_le_u32};
use crate::error::{EnvelopeKind, ReassemblyError, TicError, TicResult};
use crate::regs::field::BitField;
use crate::regs::{ErrorRegister, Register};

/// Size of the error payload.
pub const ERROR_PAYLOAD_LEN: usize = 12;

const INVALID_FRAME_CHARACTERISTICS: BitField =
    BitField::new("invalid_frame_characteristics", 0, 1);
const MICROFRAME_INDEX_INVALID: BitField = BitField::new("microframe_index_invalid", 1, 1);

/// Error payload type. Only raw data errors are defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ErrorType {
    #[default]
    RawDataError,
    Unrecognized(u8),
}

impl ErrorType {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::RawDataError,
            other => Self::Unrecognized(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::RawDataError => 0,
            Self::Unrecognized(other) => other,
        }
    }
}

/// Errors detected by the host while reading micro-frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FwError {
    pub invalid_frame_characteristics: bool,
    pub microframe_index_invalid: bool,
}

impl FwError {
    pub fn from_bits(raw: u32) -> Self {
        Self {
            invalid_frame_characteristics: INVALID_FRAME_CHARACTERISTICS.get_bool(raw),
            microframe_index_invalid: MICROFRAME_INDEX_INVALID.get_bool(raw),
        }
    }

    /// Encoded bits; reserved bits 2..=31 are zero.
    pub fn bits(&self) -> u32 {
        INVALID_FRAME_CHARACTERISTICS.put_bool(self.invalid_frame_characteristics)
            | MICROFRAME_INDEX_INVALID.put_bool(self.microframe_index_invalid)
    }
}

impl From<&ReassemblyError> for FwError {
    fn from(err: &ReassemblyError) -> Self {
        match err {
            ReassemblyError::UnexpectedIndex { .. } => Self {
                microframe_index_invalid: true,
                ..Self::default()
            },
            ReassemblyError::InvalidCharacteristics { .. }
            | ReassemblyError::FrameCountMismatch { .. }
            | ReassemblyError::PayloadKindMismatch
            | ReassemblyError::SizeMismatch { .. }
            | ReassemblyError::FrameTooLarge { .. } => Self {
                invalid_frame_characteristics: true,
                ..Self::default()
            },
        }
    }
}

/// Decoded error payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ErrorPayload {
    pub error_type: ErrorType,
    pub fw_error: FwError,
    /// Copy of the error register at the time of the fault.
    pub error_register: ErrorRegister,
    #[serde(skip)]
    pub reserved: [u8; 3],
}

impl ErrorPayload {
    /// Describe a reassembly fault, alongside the current error register.
    pub fn from_reassembly(err: &ReassemblyError, error_register: ErrorRegister) -> Self {
        Self {
            error_type: ErrorType::RawDataError,
            fw_error: FwError::from(err),
            error_register,
            reserved: [0; 3],
        }
    }

    /// Parse the first 12 bytes of `bytes`.
    pub fn parse(bytes: &[u8]) -> TicResult<Self> {
        if bytes.len() < ERROR_PAYLOAD_LEN {
            return Err(TicError::TruncatedHeader {
                envelope: EnvelopeKind::ErrorPayload,
                expected: ERROR_PAYLOAD_LEN,
                actual: bytes.len(),
            });
        }
        let mut reserved = [0u8; 3];
        if let Some(src) = bytes.get(1..4) {
            reserved.copy_from_slice(src);
        }
        Ok(Self {
            error_type: ErrorType::from_code(bytes.first().copied().unwrap_or(0)),
            fw_error: FwError::from_bits(le_u32(bytes, 4)),
            error_register: ErrorRegister::decode(le_u32(bytes, 8)),
            reserved,
        })
    }

    /// Encode into `out`, returning the bytes written.
    pub fn encode_into(&self, out: &mut [u8]) -> TicResult<usize> {
        let Some(dst) = out.get_mut(..ERROR_PAYLOAD_LEN) else {
            return Err(TicError::BufferTooSmall {
                expected: ERROR_PAYLOAD_LEN,
                actual: out.len(),
            });
        };
        let error_register = self.error_register.encode()?;
        dst.fill(0);
        if let Some(slot) = dst.first_mut() {
            *slot = self.error_type.code();
        }
        put_le_u32(dst, 4, self.fw_error.bits());
        put_le_u32(dst, 8, error_register);
        Ok(ERROR_PAYLOAD_LEN)
    }

    pub fn to_bytes(&self) -> TicResult<[u8; ERROR_PAYLOAD_LEN]> {
        let mut out = [0u8; ERROR_PAYLOAD_LEN];
        self.encode_into(&mut out)?;
        Ok(out)
    }

    /// Wrap this payload in a raw data envelope of type
    /// [`RawDataType::Error`].
    pub fn package(
        &self,
        header: &RawDataHeader,
        config: &CodecConfig,
    ) -> TicResult<Vec<u8>> {
        let header = RawDataHeader {
            data_type: RawDataType::Error,
            ..*header
        };
        build_raw_data(&header, &self.to_bytes()?, config)
    }
}
