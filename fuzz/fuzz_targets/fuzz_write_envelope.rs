//! Fuzzes write envelope parsing against the per-type payload limits.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_write_envelope

#![no_main]

use libfuzzer_sys::fuzz_target;
use tic_spi_protocol::{CodecConfig, build_write, parse_write};

fuzz_target!(|data: &[u8]| {
    let Ok(write) = parse_write(data) else {
        return;
    };
    let config = CodecConfig::default();
    let limit = write.header.data_type.max_payload(&config);
    let built = build_write(write.header.data_type, write.payload, &config);
    match limit {
        Some(max) if write.payload.len() <= max => assert!(built.is_ok()),
        _ => assert!(built.is_err()),
    }
});
