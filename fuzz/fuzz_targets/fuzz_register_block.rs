//! Fuzzes register block parsing and re-encoding.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_register_block

#![no_main]

use libfuzzer_sys::fuzz_target;
use tic_spi_protocol::{RegisterBlock, classify_interrupt};

fuzz_target!(|data: &[u8]| {
    let Ok(block) = RegisterBlock::parse(data) else {
        return;
    };
    let _ = classify_interrupt(&block.status);
    let _ = block.encode();
});
