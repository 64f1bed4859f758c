//! Fuzzes the micro-frame reassembler with arbitrary frame characteristics.
//!
//! Input is a sequence of records: a 4-byte frame characteristics word
//! followed by that many data bytes as its micro-frame size declares
//! (truncated to what is left).
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_frame_reassembly

#![no_main]

use libfuzzer_sys::fuzz_target;
use tic_spi_protocol::{
    FrameCharacteristics, FrameReassembler, ReassemblyEvent, ReassemblyState, Register,
};

fuzz_target!(|data: &[u8]| {
    let mut reassembler = FrameReassembler::with_max_frame_size(4096);
    let mut rest = data;
    while let Some((word, tail)) = rest.split_first_chunk::<4>() {
        let fc = FrameCharacteristics::decode(u32::from_le_bytes(*word));
        let take = (fc.microframe_size as usize).min(tail.len());
        let (chunk, tail) = tail.split_at(take);
        rest = tail;
        let faulted = match reassembler.push(&fc, chunk) {
            Ok(ReassemblyEvent::Complete(frame)) => {
                assert!(frame.data.len() <= 4096);
                assert_eq!(frame.microframes, fc.microframes_per_frame);
                false
            }
            Ok(ReassemblyEvent::Pending { received, expected }) => {
                assert!(received < expected);
                false
            }
            Err(_) => true,
        };
        if faulted {
            assert!(matches!(reassembler.state(), ReassemblyState::Faulted(_)));
        }
    }
});
