//! Raw data envelope: device-to-host touch data.
//!
//! ```text
//! 0x00 data_type        u32
//! 0x04 payload length   u32
//! 0x08 buffer_id        u32
//! 0x0C protocol_version u32
//! 0x10 kernel_compat_id u8
//! 0x11 reserved         [u8; 15]
//! 0x20 private data     transaction_id u32 + [u8; 28]
//! 0x40 payload
//! ```

use serde::Serialize;

use crate::config::CodecConfig;
use crate::envelope::{check_encode, le_u32, put_le_u32, split_envelope};
use crate::error::{EnvelopeKind, TicError, TicResult};
use crate::state::InterruptClass;

/// Size of the raw data header.
pub const RAW_DATA_HEADER_LEN: usize = 64;

/// Size of the HID private data block at the end of the header.
pub const HID_PRIVATE_DATA_LEN: usize = 32;

const PRIVATE_DATA_OFFSET: usize = 0x20;

/// What the raw data payload holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum RawDataType {
    /// Assembled touch frame.
    #[default]
    Frame,
    /// A 12-byte [`ErrorPayload`](crate::ErrorPayload).
    Error,
    /// Vendor data, read the same way as a frame.
    VendorData,
    HidReport,
    GetFeatures,
    Unrecognized(u32),
}

impl RawDataType {
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => Self::Frame,
            1 => Self::Error,
            2 => Self::VendorData,
            3 => Self::HidReport,
            4 => Self::GetFeatures,
            other => Self::Unrecognized(other),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Self::Frame => 0,
            Self::Error => 1,
            Self::VendorData => 2,
            Self::HidReport => 3,
            Self::GetFeatures => 4,
            Self::Unrecognized(other) => other,
        }
    }

    /// Payload type for data read after an interrupt. `hid` is the HID flag
    /// from the frame characteristics register. Reset and unrecognized
    /// interrupts carry no payload.
    pub fn for_interrupt(class: InterruptClass, hid: bool) -> Option<Self> {
        match class {
            InterruptClass::DataAvailable if hid => Some(Self::HidReport),
            InterruptClass::DataAvailable => Some(Self::Frame),
            InterruptClass::ErrorOccurred => Some(Self::Error),
            InterruptClass::VendorData => Some(Self::VendorData),
            InterruptClass::GetFeaturesAvailable => Some(Self::GetFeatures),
            InterruptClass::ResetOccurred | InterruptClass::Unrecognized(_) => None,
        }
    }
}

/// Private block the host copies through to its HID layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HidPrivateData {
    pub transaction_id: u32,
    #[serde(skip)]
    pub reserved: [u8; 28],
}

/// Decoded raw data header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RawDataHeader {
    pub data_type: RawDataType,
    /// Payload bytes following the header. Ignored on build; the payload
    /// length is written instead.
    pub payload_len: u32,
    /// Echoed back in the feedback header for this buffer.
    pub buffer_id: u32,
    pub protocol_version: u32,
    /// Copied from the compatibility revision register.
    pub kernel_compat_id: u8,
    #[serde(skip)]
    pub reserved: [u8; 15],
    pub private_data: HidPrivateData,
}

impl RawDataHeader {
    fn parse(bytes: &[u8]) -> Self {
        let mut reserved = [0u8; 15];
        if let Some(src) = bytes.get(0x11..0x20) {
            reserved.copy_from_slice(src);
        }
        let mut private_reserved = [0u8; 28];
        if let Some(src) = bytes.get(PRIVATE_DATA_OFFSET + 4..RAW_DATA_HEADER_LEN) {
            private_reserved.copy_from_slice(src);
        }
        Self {
            data_type: RawDataType::from_code(le_u32(bytes, 0x00)),
            payload_len: le_u32(bytes, 0x04),
            buffer_id: le_u32(bytes, 0x08),
            protocol_version: le_u32(bytes, 0x0C),
            kernel_compat_id: bytes.get(0x10).copied().unwrap_or(0),
            reserved,
            private_data: HidPrivateData {
                transaction_id: le_u32(bytes, PRIVATE_DATA_OFFSET),
                reserved: private_reserved,
            },
        }
    }
}

/// A parsed raw data envelope borrowing its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RawData<'a> {
    pub header: RawDataHeader,
    #[serde(skip)]
    pub payload: &'a [u8],
}

/// Parse a raw data envelope. Bytes past the declared payload are ignored.
///
/// # Errors
///
/// [`TicError::TruncatedHeader`](crate::TicError::TruncatedHeader) below 64
/// bytes, [`TicError::TruncatedPayload`](crate::TicError::TruncatedPayload)
/// when fewer payload bytes follow than declared.
pub fn parse_raw_data(bytes: &[u8]) -> TicResult<RawData<'_>> {
    let (header, payload) = split_envelope(
        bytes,
        EnvelopeKind::RawData,
        RAW_DATA_HEADER_LEN,
        |h| le_u32(h, 0x04),
    )?;
    Ok(RawData {
        header: RawDataHeader::parse(header),
        payload,
    })
}

/// Encode a raw data envelope into `out`, returning the bytes written.
/// Reserved bytes are written as zero.
pub fn write_raw_data_into(
    header: &RawDataHeader,
    payload: &[u8],
    config: &CodecConfig,
    out: &mut [u8],
) -> TicResult<usize> {
    if let RawDataType::Unrecognized(code) = header.data_type {
        return Err(TicError::UndefinedCode {
            envelope: EnvelopeKind::RawData,
            field: "data_type",
            code,
        });
    }
    let total = check_encode(
        EnvelopeKind::RawData,
        RAW_DATA_HEADER_LEN,
        payload.len(),
        config.max_frame_size,
        out,
    )?;
    let (head, body) = out.split_at_mut(RAW_DATA_HEADER_LEN);
    head.fill(0);
    put_le_u32(head, 0x00, header.data_type.code());
    put_le_u32(head, 0x04, payload.len() as u32);
    put_le_u32(head, 0x08, header.buffer_id);
    put_le_u32(head, 0x0C, header.protocol_version);
    if let Some(slot) = head.get_mut(0x10) {
        *slot = header.kernel_compat_id;
    }
    put_le_u32(head, PRIVATE_DATA_OFFSET, header.private_data.transaction_id);
    if let Some(dst) = body.get_mut(..payload.len()) {
        dst.copy_from_slice(payload);
    }
    Ok(total)
}

/// Build a raw data envelope into a new buffer.
pub fn build_raw_data(
    header: &RawDataHeader,
    payload: &[u8],
    config: &CodecConfig,
) -> TicResult<Vec<u8>> {
    let mut out = vec![0u8; RAW_DATA_HEADER_LEN + payload.len()];
    let written = write_raw_data_into(header, payload, config, &mut out)?;
    out.truncate(written);
    Ok(out)
}
