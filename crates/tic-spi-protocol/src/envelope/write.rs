//! Write envelope: the 8-byte header prepended to every bulk write into the
//! data window.

use serde::Serialize;

use crate::config::CodecConfig;
use crate::envelope::{check_encode, le_u32, put_le_u32, split_envelope};
use crate::error::{EnvelopeKind, TicError, TicResult};

/// Size of the write header.
pub const WRITE_HEADER_LEN: usize = 8;

/// What a bulk write carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum WriteDataType {
    #[default]
    FirmwareLoad,
    DataLoad,
    Feedback,
    SetFeatures,
    GetFeatures,
    OutputReport,
    /// No payload; the device falls back to its defaults.
    NoDataUseDefaults,
    Unrecognized(u32),
}

impl WriteDataType {
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => Self::FirmwareLoad,
            1 => Self::DataLoad,
            2 => Self::Feedback,
            3 => Self::SetFeatures,
            4 => Self::GetFeatures,
            5 => Self::OutputReport,
            6 => Self::NoDataUseDefaults,
            other => Self::Unrecognized(other),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Self::FirmwareLoad => 0,
            Self::DataLoad => 1,
            Self::Feedback => 2,
            Self::SetFeatures => 3,
            Self::GetFeatures => 4,
            Self::OutputReport => 5,
            Self::NoDataUseDefaults => 6,
            Self::Unrecognized(other) => other,
        }
    }

    /// Largest payload this write type may carry, or `None` when the type
    /// is undefined.
    pub fn max_payload(self, config: &CodecConfig) -> Option<usize> {
        match self {
            Self::FirmwareLoad | Self::DataLoad => Some(config.max_bulk_write_size),
            Self::Feedback | Self::SetFeatures | Self::GetFeatures | Self::OutputReport => {
                Some(config.max_feedback_size)
            }
            Self::NoDataUseDefaults => Some(0),
            Self::Unrecognized(_) => None,
        }
    }
}

/// Decoded write header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WriteHeader {
    pub data_type: WriteDataType,
    pub len: u32,
}

/// A parsed write envelope borrowing its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WriteData<'a> {
    pub header: WriteHeader,
    #[serde(skip)]
    pub payload: &'a [u8],
}

/// Parse a write envelope. Bytes past the declared length are ignored.
pub fn parse_write(bytes: &[u8]) -> TicResult<WriteData<'_>> {
    let (header, payload) =
        split_envelope(bytes, EnvelopeKind::Write, WRITE_HEADER_LEN, |h| {
            le_u32(h, 4)
        })?;
    Ok(WriteData {
        header: WriteHeader {
            data_type: WriteDataType::from_code(le_u32(header, 0)),
            len: le_u32(header, 4),
        },
        payload,
    })
}

/// Encode a write envelope into `out`, returning the bytes written.
///
/// # Errors
///
/// [`TicError::UndefinedCode`] for an unrecognized type,
/// [`TicError::PayloadTooLarge`] beyond [`WriteDataType::max_payload`],
/// [`TicError::BufferTooSmall`] when `out` cannot hold the envelope.
pub fn write_data_into(
    data_type: WriteDataType,
    payload: &[u8],
    config: &CodecConfig,
    out: &mut [u8],
) -> TicResult<usize> {
    let Some(max) = data_type.max_payload(config) else {
        return Err(TicError::UndefinedCode {
            envelope: EnvelopeKind::Write,
            field: "data_type",
            code: data_type.code(),
        });
    };
    let total = check_encode(EnvelopeKind::Write, WRITE_HEADER_LEN, payload.len(), max, out)?;
    let (head, body) = out.split_at_mut(WRITE_HEADER_LEN);
    put_le_u32(head, 0, data_type.code());
    put_le_u32(head, 4, payload.len() as u32);
    if let Some(dst) = body.get_mut(..payload.len()) {
        dst.copy_from_slice(payload);
    }
    Ok(total)
}

/// Build a write envelope into a new buffer.
pub fn build_write(
    data_type: WriteDataType,
    payload: &[u8],
    config: &CodecConfig,
) -> TicResult<Vec<u8>> {
    let mut out = vec![0u8; WRITE_HEADER_LEN + payload.len()];
    let written = write_data_into(data_type, payload, config, &mut out)?;
    out.truncate(written);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_feedback_write() -> Result<(), Box<dyn std::error::Error>> {
        let bytes = [2u8, 0, 0, 0, 0, 0, 0, 0];
        let parsed = parse_write(&bytes)?;
        assert_eq!(parsed.header.data_type, WriteDataType::Feedback);
        assert_eq!(parsed.header.len, 0);
        assert!(parsed.payload.is_empty());
        Ok(())
    }

    #[test]
    fn test_build_layout() -> Result<(), Box<dyn std::error::Error>> {
        let bytes = build_write(WriteDataType::SetFeatures, &[0xAB, 0xCD], &CodecConfig::default())?;
        assert_eq!(bytes, vec![3, 0, 0, 0, 2, 0, 0, 0, 0xAB, 0xCD]);
        Ok(())
    }

    #[test]
    fn test_no_data_use_defaults_requires_empty_payload() {
        let config = CodecConfig::default();
        assert!(build_write(WriteDataType::NoDataUseDefaults, &[], &config).is_ok());
        assert_eq!(
            build_write(WriteDataType::NoDataUseDefaults, &[1], &config),
            Err(TicError::PayloadTooLarge {
                envelope: EnvelopeKind::Write,
                len: 1,
                max: 0,
            })
        );
    }

    #[test]
    fn test_limits_follow_type() {
        let config = CodecConfig {
            max_feedback_size: 16,
            max_bulk_write_size: 64,
            ..CodecConfig::default()
        };
        let payload = [0u8; 32];
        assert!(build_write(WriteDataType::FirmwareLoad, &payload, &config).is_ok());
        assert!(matches!(
            build_write(WriteDataType::OutputReport, &payload, &config),
            Err(TicError::PayloadTooLarge { max: 16, .. })
        ));
    }

    #[test]
    fn test_undefined_type() {
        assert!(matches!(
            build_write(WriteDataType::Unrecognized(7), &[], &CodecConfig::default()),
            Err(TicError::UndefinedCode { code: 7, .. })
        ));
        assert_eq!(WriteDataType::from_code(7), WriteDataType::Unrecognized(7));
    }

    #[test]
    fn test_truncated() {
        assert!(matches!(
            parse_write(&[0u8; 7]),
            Err(TicError::TruncatedHeader { expected: 8, actual: 7, .. })
        ));
        assert!(matches!(
            parse_write(&[0u8, 0, 0, 0, 4, 0, 0, 0, 1]),
            Err(TicError::TruncatedPayload { expected: 4, actual: 1, .. })
        ));
    }
}
