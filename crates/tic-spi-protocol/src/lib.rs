//! Register, framing and envelope codec for SPI-attached touch ICs.
//!
//! This crate is intentionally I/O-free. Callers own the SPI transport and
//! interrupt handling; they hand the codec register words and data-window
//! buffers and get structured views back, or hand it structured commands
//! and get bytes to write.
//!
//! ## Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`regs`] | Fixed-offset 32-bit registers (0x00..=0x40) and the 64-byte register block |
//! | [`reassembler`] | Micro-frame to frame reassembly |
//! | [`envelope`] | Raw data, error, feedback and write envelopes |
//! | [`state`] | Interrupt classification, power and command validation |
//! | [`version`] | Protocol version and kernel compatibility checks |
//! | [`config`] | Payload limits and host expectations |
//!
//! ## Data path
//!
//! ```text
//! status read ─▶ classify_interrupt ─▶ frame characteristics read
//!      ─▶ FrameReassembler::push (per micro-frame) ─▶ CompletedFrame::package
//! ```
//!
//! All multi-byte fields are little-endian. Decoding a register never fails;
//! encoding rejects values that do not fit their field and writes reserved
//! bits as zero. Envelope parsers borrow their payload from the input
//! buffer; `*_into` encoders write into caller buffers, `build_*` functions
//! allocate.
//!
//! ## Example
//!
//! ```
//! use tic_spi_protocol::{
//!     FrameCharacteristics, FrameReassembler, InterruptClass, ReassemblyEvent, Register,
//!     StatusRegister, classify_interrupt,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let status = StatusRegister::decode(0x5A00_0001);
//! assert_eq!(classify_interrupt(&status)?, Some(InterruptClass::DataAvailable));
//!
//! let mut reassembler = FrameReassembler::default();
//! let fc = FrameCharacteristics::decode(4 | (1 << 18) | (1 << 23));
//! match reassembler.push(&fc, &[1, 2, 3, 4])? {
//!     ReassemblyEvent::Complete(frame) => assert_eq!(frame.data.len(), 4),
//!     ReassemblyEvent::Pending { .. } => unreachable!(),
//! }
//! # Ok(())
//! # }
//! ```

#![deny(static_mut_refs)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod envelope;
pub mod error;
pub mod reassembler;
pub mod regs;
pub mod state;
pub mod version;

pub use config::{
    CodecConfig, DATA_WINDOW_LEN, MAX_BULK_WRITE_SIZE, MAX_FEEDBACK_SIZE, MAX_FRAME_SIZE,
};
pub use envelope::*;
pub use error::{EnvelopeKind, ErrorCategory, ReassemblyError, TicError, TicResult};
pub use reassembler::{CompletedFrame, FrameReassembler, ReassemblyEvent, ReassemblyState};
pub use regs::*;
pub use state::{
    CommandAction, DeviceState, InterruptClass, InvalidReason, PowerTransition, Verdict,
    classify_interrupt, target_power_state, validate_command, validate_power_transition,
};
pub use version::{Compatibility, PROTOCOL_VERSION};
