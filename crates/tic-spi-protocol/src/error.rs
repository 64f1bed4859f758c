//! Error types for the TIC SPI codec.
//!
//! Every failure is a value. At most one buffer or frame is discarded per
//! error; nothing here is fatal to the caller.

use core::fmt;

use thiserror::Error;

use crate::regs::{ErrorRegister, RegisterKind};

/// Framing faults raised by [`FrameReassembler`](crate::FrameReassembler).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReassemblyError {
    /// Frame characteristics carry a zero count, a zero index, or an index
    /// beyond the micro-frames-per-frame count.
    #[error(
        "invalid frame characteristics: index {index} of {microframes_per_frame} micro-frames"
    )]
    InvalidCharacteristics {
        /// Micro-frame index as read from the register.
        index: u8,
        /// Micro-frames-per-frame as read from the register.
        microframes_per_frame: u8,
    },

    /// Micro-frame arrived out of monotonic order.
    #[error("micro-frame index out of order: expected {expected}, got {actual}")]
    UnexpectedIndex {
        /// Index the reassembler was waiting for.
        expected: u8,
        /// Index actually received.
        actual: u8,
    },

    /// Micro-frames-per-frame changed in the middle of a frame.
    #[error("micro-frames-per-frame changed mid-frame: expected {expected}, got {actual}")]
    FrameCountMismatch {
        /// Count latched from micro-frame 1.
        expected: u8,
        /// Count carried by the offending micro-frame.
        actual: u8,
    },

    /// HID/raw flag changed in the middle of a frame.
    #[error("HID/raw flag changed mid-frame")]
    PayloadKindMismatch,

    /// Bytes read for a micro-frame disagree with the declared micro-frame size.
    #[error("micro-frame size mismatch: register declares {declared} bytes, read {actual}")]
    SizeMismatch {
        /// Size from the frame characteristics register.
        declared: u32,
        /// Length of the supplied slice.
        actual: usize,
    },

    /// Accumulated frame would exceed the maximum frame size.
    #[error("frame too large: {size} bytes exceeds maximum of {max}")]
    FrameTooLarge {
        /// Size the frame would have reached.
        size: usize,
        /// Configured maximum.
        max: usize,
    },
}

/// Errors returned by register, envelope and state operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TicError {
    /// Caller supplied a value that does not fit a register field.
    #[error("{register} field '{field}' out of range: {value:#x} (max {max:#x})")]
    FieldOutOfRange {
        /// Register the field belongs to.
        register: RegisterKind,
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: u64,
        /// Largest encodable value.
        max: u64,
    },

    /// Value handed to [`encode_register`](crate::encode_register) belongs to
    /// another register.
    #[error("register kind mismatch: expected {expected}, got {actual}")]
    KindMismatch {
        /// Kind the caller asked to encode.
        expected: RegisterKind,
        /// Kind of the supplied value.
        actual: RegisterKind,
    },

    /// No register answers to the given name or offset.
    #[error("unknown register: {0}")]
    UnknownRegister(String),

    /// Status register sync byte did not match `0x5A`.
    #[error("status sync byte mismatch: expected 0x5A, got {found:#04x}")]
    SyncMismatch {
        /// Sync byte actually read.
        found: u8,
    },

    /// Fewer bytes than the fixed header size were supplied.
    #[error("truncated {envelope} header: need {expected} bytes, got {actual}")]
    TruncatedHeader {
        /// Envelope being parsed.
        envelope: EnvelopeKind,
        /// Fixed header size.
        expected: usize,
        /// Bytes supplied.
        actual: usize,
    },

    /// Fewer payload bytes than the header declares.
    #[error("truncated {envelope} payload: header declares {expected} bytes, got {actual}")]
    TruncatedPayload {
        /// Envelope being parsed.
        envelope: EnvelopeKind,
        /// Declared payload length.
        expected: usize,
        /// Payload bytes available.
        actual: usize,
    },

    /// Payload exceeds the protocol or device maximum.
    #[error("{envelope} payload too large: {len} bytes exceeds maximum of {max}")]
    PayloadTooLarge {
        /// Envelope being built.
        envelope: EnvelopeKind,
        /// Payload length.
        len: usize,
        /// Applicable maximum.
        max: usize,
    },

    /// Host-built envelope carries a type or command code with no defined
    /// meaning.
    #[error("undefined {envelope} {field}: {code}")]
    UndefinedCode {
        /// Envelope being built.
        envelope: EnvelopeKind,
        /// Header field holding the code.
        field: &'static str,
        /// Offending code.
        code: u32,
    },

    /// Feedback destination would run past the data window.
    #[error("feedback offset {offset:#x} + {len:#x} bytes exceeds data window size {limit:#x}")]
    OffsetOutOfRange {
        /// Destination offset, relative to the start of the data window.
        offset: u32,
        /// Payload length.
        len: usize,
        /// Data window size in bytes.
        limit: u32,
    },

    /// Output buffer handed to an `*_into` encoder is too small.
    #[error("output buffer too small: need {expected} bytes, got {actual}")]
    BufferTooSmall {
        /// Bytes required.
        expected: usize,
        /// Bytes available.
        actual: usize,
    },

    /// Protocol version or compatibility id disagree between host and device.
    #[error("{field} mismatch: host expects {expected}, device reports {actual}")]
    VersionMismatch {
        /// Which field disagreed.
        field: &'static str,
        /// Host-side value.
        expected: u32,
        /// Device-side value.
        actual: u32,
    },

    /// Micro-frame reassembly aborted.
    #[error("reassembly fault: {0}")]
    Reassembly(#[from] ReassemblyError),

    /// Device reported an error through the error register.
    #[error("device reported error: {0}")]
    DeviceReported(ErrorRegister),

    /// Codec configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A specialized `Result` type for codec operations.
pub type TicResult<T> = Result<T, TicError>;

/// Envelope formats carried through the data window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum EnvelopeKind {
    /// 64-byte raw data header plus payload.
    RawData,
    /// 64-byte feedback header plus payload.
    Feedback,
    /// 8-byte write header plus payload.
    Write,
    /// Fixed 12-byte error payload.
    ErrorPayload,
    /// 64-byte register block snapshot.
    RegisterBlock,
}

impl fmt::Display for EnvelopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvelopeKind::RawData => write!(f, "raw data"),
            EnvelopeKind::Feedback => write!(f, "feedback"),
            EnvelopeKind::Write => write!(f, "write"),
            EnvelopeKind::ErrorPayload => write!(f, "error payload"),
            EnvelopeKind::RegisterBlock => write!(f, "register block"),
        }
    }
}

/// Error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Caller value does not fit a register field.
    FieldEncoding = 1,
    /// Malformed or out-of-order micro-frames, oversized frames.
    Framing = 2,
    /// Truncated or oversized envelopes, bad offsets.
    Envelope = 3,
    /// Errors reported by the device itself.
    Device = 4,
    /// Host/device protocol disagreement.
    Version = 5,
    /// Host-side configuration problems.
    Config = 6,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::FieldEncoding => write!(f, "FieldEncoding"),
            ErrorCategory::Framing => write!(f, "Framing"),
            ErrorCategory::Envelope => write!(f, "Envelope"),
            ErrorCategory::Device => write!(f, "Device"),
            ErrorCategory::Version => write!(f, "Version"),
            ErrorCategory::Config => write!(f, "Config"),
        }
    }
}

impl TicError {
    /// Get the error category for classification.
    pub fn category(&self) -> ErrorCategory {
        match self {
            TicError::FieldOutOfRange { .. }
            | TicError::KindMismatch { .. }
            | TicError::UnknownRegister(_) => ErrorCategory::FieldEncoding,
            TicError::Reassembly(_) => ErrorCategory::Framing,
            TicError::TruncatedHeader { .. }
            | TicError::TruncatedPayload { .. }
            | TicError::PayloadTooLarge { .. }
            | TicError::UndefinedCode { .. }
            | TicError::OffsetOutOfRange { .. }
            | TicError::BufferTooSmall { .. } => ErrorCategory::Envelope,
            TicError::SyncMismatch { .. } | TicError::DeviceReported(_) => ErrorCategory::Device,
            TicError::VersionMismatch { .. } => ErrorCategory::Version,
            TicError::InvalidConfig(_) => ErrorCategory::Config,
        }
    }

    /// Check whether the caller can continue with the next buffer.
    ///
    /// Version mismatches and fatal device errors mean every later payload
    /// would be misinterpreted too.
    pub fn is_recoverable(&self) -> bool {
        match self {
            TicError::VersionMismatch { .. } | TicError::InvalidConfig(_) => false,
            TicError::DeviceReported(reg) => !reg.fatal_error,
            _ => true,
        }
    }

    pub(crate) fn field(register: RegisterKind, field: &'static str, value: u64, max: u64) -> Self {
        TicError::FieldOutOfRange {
            register,
            field,
            value,
            max,
        }
    }
}
