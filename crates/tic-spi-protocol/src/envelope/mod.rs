//! Length-prefixed envelopes carried through the data window.
//!
//! Every envelope is a fixed little-endian header followed by exactly the
//! number of payload bytes the header declares. Parsers borrow the payload
//! from the caller's buffer. The `*_into` encoders write into a caller buffer
//! and return the number of bytes used; the `build_*` functions are `Vec`
//! conveniences over them.

use crate::error::{EnvelopeKind, TicError, TicResult};

pub mod error_payload;
pub mod feedback;
pub mod raw_data;
pub mod write;

pub use error_payload::{ERROR_PAYLOAD_LEN, ErrorPayload, ErrorType, FwError};
pub use feedback::{
    FEEDBACK_HEADER_LEN, Feedback, FeedbackCommand, FeedbackDataType, FeedbackHeader,
    build_feedback, check_destination, parse_feedback, write_feedback_into,
};
pub use raw_data::{
    HID_PRIVATE_DATA_LEN, HidPrivateData, RAW_DATA_HEADER_LEN, RawData, RawDataHeader,
    RawDataType, build_raw_data, parse_raw_data, write_raw_data_into,
};
pub use write::{
    WRITE_HEADER_LEN, WriteData, WriteDataType, WriteHeader, build_write, parse_write,
    write_data_into,
};

/// Read a little-endian `u32` at `offset`. Callers have already checked the
/// header length.
pub(crate) fn le_u32(bytes: &[u8], offset: usize) -> u32 {
    bytes
        .get(offset..offset + 4)
        .and_then(|w| <[u8; 4]>::try_from(w).ok())
        .map(u32::from_le_bytes)
        .unwrap_or(0)
}

pub(crate) fn put_le_u32(out: &mut [u8], offset: usize, value: u32) {
    if let Some(slot) = out.get_mut(offset..offset + 4) {
        slot.copy_from_slice(&value.to_le_bytes());
    }
}

/// Split `bytes` into a fixed header and the declared payload.
pub(crate) fn split_envelope<'a>(
    bytes: &'a [u8],
    envelope: EnvelopeKind,
    header_len: usize,
    payload_len: impl Fn(&[u8]) -> u32,
) -> TicResult<(&'a [u8], &'a [u8])> {
    if bytes.len() < header_len {
        return Err(TicError::TruncatedHeader {
            envelope,
            expected: header_len,
            actual: bytes.len(),
        });
    }
    let (header, rest) = bytes.split_at(header_len);
    let declared = payload_len(header) as usize;
    match rest.get(..declared) {
        Some(payload) => Ok((header, payload)),
        None => Err(TicError::TruncatedPayload {
            envelope,
            expected: declared,
            actual: rest.len(),
        }),
    }
}

/// Check payload and output sizes before an `*_into` encoder writes.
pub(crate) fn check_encode(
    envelope: EnvelopeKind,
    header_len: usize,
    payload_len: usize,
    max: usize,
    out: &[u8],
) -> TicResult<usize> {
    if payload_len > max {
        return Err(TicError::PayloadTooLarge {
            envelope,
            len: payload_len,
            max,
        });
    }
    let total = header_len + payload_len;
    if out.len() < total {
        return Err(TicError::BufferTooSmall {
            expected: total,
            actual: out.len(),
        });
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_sizes() {
        assert_eq!(RAW_DATA_HEADER_LEN, 64);
        assert_eq!(FEEDBACK_HEADER_LEN, 64);
        assert_eq!(WRITE_HEADER_LEN, 8);
        assert_eq!(ERROR_PAYLOAD_LEN, 12);
        assert_eq!(HID_PRIVATE_DATA_LEN, 32);
    }

    #[test]
    fn test_split_ignores_trailing_bytes() -> Result<(), Box<dyn std::error::Error>> {
        let bytes = [2u8, 0, 0, 0, 0xAA, 0xBB, 0xCC];
        let (header, payload) =
            split_envelope(&bytes, EnvelopeKind::Write, 4, |h| le_u32(h, 0))?;
        assert_eq!(header.len(), 4);
        assert_eq!(payload, &[0xAA, 0xBB]);
        Ok(())
    }

    #[test]
    fn test_check_encode_buffer_too_small() {
        let out = [0u8; 10];
        assert_eq!(
            check_encode(EnvelopeKind::Write, 8, 4, 16, &out),
            Err(TicError::BufferTooSmall {
                expected: 12,
                actual: 10,
            })
        );
    }
}
