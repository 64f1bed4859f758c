//! Micro-frame reassembly.
//!
//! A touch frame arrives as 1..=31 micro-frames, each described by a
//! frame characteristics snapshot. The reassembler owns one preallocated
//! buffer and never hands out a partial frame: any violation drops what was
//! collected and moves to [`ReassemblyState::Faulted`] until the next
//! micro-frame with index 1.

use tracing::{debug, trace, warn};

use crate::config::{CodecConfig, MAX_FRAME_SIZE};
use crate::envelope::{RawDataHeader, RawDataType, build_raw_data};
use crate::error::{ReassemblyError, TicResult};
use crate::regs::FrameCharacteristics;

/// Where the reassembler is in the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReassemblyState {
    Idle,
    Collecting { received: u8, expected: u8 },
    Complete,
    Faulted(ReassemblyError),
}

/// Result of feeding one micro-frame.
#[derive(Debug, PartialEq, Eq)]
pub enum ReassemblyEvent<'a> {
    /// More micro-frames are needed.
    Pending { received: u8, expected: u8 },
    /// The last micro-frame arrived.
    Complete(CompletedFrame<'a>),
}

/// A fully assembled frame, borrowed from the reassembler until the next
/// call to [`FrameReassembler::push`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedFrame<'a> {
    pub data: &'a [u8],
    /// HID report rather than raw touch data.
    pub hid: bool,
    pub microframes: u8,
}

impl CompletedFrame<'_> {
    /// Wrap the frame in a raw data envelope. `template` supplies the
    /// buffer id, versions and data type; HID frames are always tagged
    /// [`RawDataType::HidReport`].
    pub fn package(&self, template: &RawDataHeader, config: &CodecConfig) -> TicResult<Vec<u8>> {
        let header = RawDataHeader {
            data_type: if self.hid {
                RawDataType::HidReport
            } else {
                template.data_type
            },
            ..*template
        };
        build_raw_data(&header, self.data, config)
    }
}

/// Stateful micro-frame collector. One per device.
#[derive(Debug)]
pub struct FrameReassembler {
    buffer: Vec<u8>,
    max_frame_size: usize,
    state: ReassemblyState,
    expected: u8,
    hid: bool,
}

impl Default for FrameReassembler {
    fn default() -> Self {
        Self::with_max_frame_size(MAX_FRAME_SIZE)
    }
}

impl FrameReassembler {
    pub fn new(config: &CodecConfig) -> Self {
        Self::with_max_frame_size(config.max_frame_size)
    }

    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(max_frame_size),
            max_frame_size,
            state: ReassemblyState::Idle,
            expected: 0,
            hid: false,
        }
    }

    pub fn state(&self) -> ReassemblyState {
        self.state
    }

    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }

    /// Drop any partial frame and return to idle.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.state = ReassemblyState::Idle;
    }

    /// Feed one micro-frame. `data` must be exactly the bytes read for the
    /// micro-frame `fc` describes.
    ///
    /// # Errors
    ///
    /// Any [`ReassemblyError`]. The partial frame is discarded and the
    /// reassembler waits for the next index-1 micro-frame.
    pub fn push(
        &mut self,
        fc: &FrameCharacteristics,
        data: &[u8],
    ) -> Result<ReassemblyEvent<'_>, ReassemblyError> {
        if let Err(err) = self.admit(fc, data) {
            return Err(self.fault(err));
        }

        self.buffer.extend_from_slice(data);
        let index = fc.microframe_index;
        if fc.is_last() {
            self.state = ReassemblyState::Complete;
            debug!(
                bytes = self.buffer.len(),
                microframes = self.expected,
                hid = self.hid,
                "frame complete"
            );
            return Ok(ReassemblyEvent::Complete(CompletedFrame {
                data: &self.buffer,
                hid: self.hid,
                microframes: self.expected,
            }));
        }

        trace!(index, expected = self.expected, "micro-frame buffered");
        self.state = ReassemblyState::Collecting {
            received: index,
            expected: self.expected,
        };
        Ok(ReassemblyEvent::Pending {
            received: index,
            expected: self.expected,
        })
    }

    fn admit(&mut self, fc: &FrameCharacteristics, data: &[u8]) -> Result<(), ReassemblyError> {
        fc.validate()?;
        if data.len() != fc.microframe_size as usize {
            return Err(ReassemblyError::SizeMismatch {
                declared: fc.microframe_size,
                actual: data.len(),
            });
        }

        if fc.microframe_index == 1 {
            // A restart is only legal after a terminal outcome.
            if let ReassemblyState::Collecting { received, .. } = self.state {
                return Err(ReassemblyError::UnexpectedIndex {
                    expected: received.saturating_add(1),
                    actual: 1,
                });
            }
            self.buffer.clear();
            self.expected = fc.microframes_per_frame;
            self.hid = fc.hid_report;
            trace!(
                microframes = self.expected,
                hid = self.hid,
                "frame started"
            );
        } else {
            let ReassemblyState::Collecting { received, expected } = self.state else {
                return Err(ReassemblyError::UnexpectedIndex {
                    expected: 1,
                    actual: fc.microframe_index,
                });
            };
            if fc.microframes_per_frame != expected {
                return Err(ReassemblyError::FrameCountMismatch {
                    expected,
                    actual: fc.microframes_per_frame,
                });
            }
            if fc.hid_report != self.hid {
                return Err(ReassemblyError::PayloadKindMismatch);
            }
            let next = received.saturating_add(1);
            if fc.microframe_index != next {
                return Err(ReassemblyError::UnexpectedIndex {
                    expected: next,
                    actual: fc.microframe_index,
                });
            }
        }

        let size = self.buffer.len().saturating_add(data.len());
        if size > self.max_frame_size {
            return Err(ReassemblyError::FrameTooLarge {
                size,
                max: self.max_frame_size,
            });
        }
        Ok(())
    }

    fn fault(&mut self, err: ReassemblyError) -> ReassemblyError {
        warn!(
            error = %err,
            dropped = self.buffer.len(),
            "micro-frame reassembly faulted"
        );
        self.buffer.clear();
        self.state = ReassemblyState::Faulted(err);
        err
    }
}
