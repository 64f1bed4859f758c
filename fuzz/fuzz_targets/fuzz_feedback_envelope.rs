//! Fuzzes feedback envelope parsing and destination checks.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_feedback_envelope

#![no_main]

use libfuzzer_sys::fuzz_target;
use tic_spi_protocol::{CodecConfig, build_feedback, check_destination, parse_feedback};

fuzz_target!(|data: &[u8]| {
    let Ok(feedback) = parse_feedback(data) else {
        return;
    };
    let _ = feedback.header.command.power_command();
    let in_window = check_destination(feedback.header.spi_offset, feedback.payload.len()).is_ok();
    let built = build_feedback(&feedback.header, feedback.payload, &CodecConfig::default());
    // Building never accepts a destination the window check refuses.
    if built.is_ok() {
        assert!(in_window);
    }
});
