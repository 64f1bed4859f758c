//! Feedback envelope: host-to-device payloads and commands.
//!
//! ```text
//! 0x00 command          u32
//! 0x04 payload length   u32
//! 0x08 buffer_id        u32
//! 0x0C protocol_version u32
//! 0x10 data_type        u32
//! 0x14 spi_offset       u32
//! 0x18 reserved         [u8; 40]
//! 0x40 payload
//! ```
//!
//! The payload is written to the device before the command is issued.

use serde::Serialize;

use crate::config::{CodecConfig, DATA_WINDOW_LEN};
use crate::envelope::{check_encode, le_u32, put_le_u32, split_envelope};
use crate::error::{EnvelopeKind, TicError, TicResult};
use crate::regs::PowerCommand;
use crate::regs::offsets::MAX_FEEDBACK_OFFSET;

/// Size of the feedback header.
pub const FEEDBACK_HEADER_LEN: usize = 64;

const RESERVED_OFFSET: usize = 0x18;
const RESERVED_LEN: usize = FEEDBACK_HEADER_LEN - RESERVED_OFFSET;

/// Command issued after the payload is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum FeedbackCommand {
    #[default]
    None,
    SoftReset,
    GotoArmed,
    GotoSensing,
    GotoSleep,
    GotoDoze,
    HardReset,
    Unrecognized(u32),
}

impl FeedbackCommand {
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => Self::None,
            1 => Self::SoftReset,
            2 => Self::GotoArmed,
            3 => Self::GotoSensing,
            4 => Self::GotoSleep,
            5 => Self::GotoDoze,
            6 => Self::HardReset,
            other => Self::Unrecognized(other),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Self::None => 0,
            Self::SoftReset => 1,
            Self::GotoArmed => 2,
            Self::GotoSensing => 3,
            Self::GotoSleep => 4,
            Self::GotoDoze => 5,
            Self::HardReset => 6,
            Self::Unrecognized(other) => other,
        }
    }

    /// Power management command a `Goto*` feedback command stands for.
    pub fn power_command(self) -> Option<PowerCommand> {
        match self {
            Self::GotoArmed => Some(PowerCommand::Armed),
            Self::GotoSensing => Some(PowerCommand::Sensing),
            Self::GotoSleep => Some(PowerCommand::Sleep),
            Self::GotoDoze => Some(PowerCommand::Doze),
            _ => None,
        }
    }
}

/// Kind of feedback payload. Irrelevant when the payload is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum FeedbackDataType {
    /// Vendor-specific feedback for the sensor.
    #[default]
    Feedback,
    SetFeatures,
    GetFeatures,
    /// HID output report.
    OutputReport,
    /// Calibration data for system flash.
    StoreData,
    Unrecognized(u32),
}

impl FeedbackDataType {
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => Self::Feedback,
            1 => Self::SetFeatures,
            2 => Self::GetFeatures,
            3 => Self::OutputReport,
            4 => Self::StoreData,
            other => Self::Unrecognized(other),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Self::Feedback => 0,
            Self::SetFeatures => 1,
            Self::GetFeatures => 2,
            Self::OutputReport => 3,
            Self::StoreData => 4,
            Self::Unrecognized(other) => other,
        }
    }
}

/// Decoded feedback header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeedbackHeader {
    pub command: FeedbackCommand,
    /// Ignored on build; the payload length is written instead.
    pub payload_len: u32,
    /// Id of the raw data buffer this feedback answers.
    pub buffer_id: u32,
    pub protocol_version: u32,
    pub data_type: FeedbackDataType,
    /// Destination relative to the start of the data window.
    pub spi_offset: u32,
    #[serde(skip)]
    pub reserved: [u8; RESERVED_LEN],
}

impl Default for FeedbackHeader {
    fn default() -> Self {
        Self {
            command: FeedbackCommand::None,
            payload_len: 0,
            buffer_id: 0,
            protocol_version: 0,
            data_type: FeedbackDataType::Feedback,
            spi_offset: 0,
            reserved: [0; RESERVED_LEN],
        }
    }
}

impl FeedbackHeader {
    fn parse(bytes: &[u8]) -> Self {
        let mut reserved = [0u8; RESERVED_LEN];
        if let Some(src) = bytes.get(RESERVED_OFFSET..FEEDBACK_HEADER_LEN) {
            reserved.copy_from_slice(src);
        }
        Self {
            command: FeedbackCommand::from_code(le_u32(bytes, 0x00)),
            payload_len: le_u32(bytes, 0x04),
            buffer_id: le_u32(bytes, 0x08),
            protocol_version: le_u32(bytes, 0x0C),
            data_type: FeedbackDataType::from_code(le_u32(bytes, 0x10)),
            spi_offset: le_u32(bytes, 0x14),
            reserved,
        }
    }
}

/// A parsed feedback envelope borrowing its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Feedback<'a> {
    pub header: FeedbackHeader,
    #[serde(skip)]
    pub payload: &'a [u8],
}

/// Check that `len` bytes written at `spi_offset` stay inside the data
/// window. The offset itself may not exceed [`MAX_FEEDBACK_OFFSET`].
pub fn check_destination(spi_offset: u32, len: usize) -> TicResult<()> {
    let end = (spi_offset as usize).checked_add(len);
    if spi_offset > MAX_FEEDBACK_OFFSET || end.is_none_or(|end| end > DATA_WINDOW_LEN) {
        return Err(TicError::OffsetOutOfRange {
            offset: spi_offset,
            len,
            limit: DATA_WINDOW_LEN as u32,
        });
    }
    Ok(())
}

fn undefined(field: &'static str, code: u32) -> TicError {
    TicError::UndefinedCode {
        envelope: EnvelopeKind::Feedback,
        field,
        code,
    }
}

/// Parse a feedback envelope. Bytes past the declared payload are ignored.
pub fn parse_feedback(bytes: &[u8]) -> TicResult<Feedback<'_>> {
    let (header, payload) = split_envelope(
        bytes,
        EnvelopeKind::Feedback,
        FEEDBACK_HEADER_LEN,
        |h| le_u32(h, 0x04),
    )?;
    Ok(Feedback {
        header: FeedbackHeader::parse(header),
        payload,
    })
}

/// Encode a feedback envelope into `out`, returning the bytes written.
///
/// # Errors
///
/// [`TicError::UndefinedCode`] for an unrecognized command, or an
/// unrecognized data type with a non-empty payload.
/// [`TicError::PayloadTooLarge`] beyond the configured feedback maximum,
/// [`TicError::OffsetOutOfRange`] when the destination leaves the data
/// window, [`TicError::BufferTooSmall`] when `out` cannot hold the envelope.
pub fn write_feedback_into(
    header: &FeedbackHeader,
    payload: &[u8],
    config: &CodecConfig,
    out: &mut [u8],
) -> TicResult<usize> {
    if let FeedbackCommand::Unrecognized(code) = header.command {
        return Err(undefined("command", code));
    }
    if let FeedbackDataType::Unrecognized(code) = header.data_type
        && !payload.is_empty()
    {
        return Err(undefined("data_type", code));
    }
    check_destination(header.spi_offset, payload.len())?;
    let total = check_encode(
        EnvelopeKind::Feedback,
        FEEDBACK_HEADER_LEN,
        payload.len(),
        config.max_feedback_size,
        out,
    )?;
    let (head, body) = out.split_at_mut(FEEDBACK_HEADER_LEN);
    head.fill(0);
    put_le_u32(head, 0x00, header.command.code());
    put_le_u32(head, 0x04, payload.len() as u32);
    put_le_u32(head, 0x08, header.buffer_id);
    put_le_u32(head, 0x0C, header.protocol_version);
    put_le_u32(head, 0x10, header.data_type.code());
    put_le_u32(head, 0x14, header.spi_offset);
    if let Some(dst) = body.get_mut(..payload.len()) {
        dst.copy_from_slice(payload);
    }
    Ok(total)
}

/// Build a feedback envelope into a new buffer.
pub fn build_feedback(
    header: &FeedbackHeader,
    payload: &[u8],
    config: &CodecConfig,
) -> TicResult<Vec<u8>> {
    let mut out = vec![0u8; FEEDBACK_HEADER_LEN + payload.len()];
    let written = write_feedback_into(header, payload, config, &mut out)?;
    out.truncate(written);
    Ok(out)
}
