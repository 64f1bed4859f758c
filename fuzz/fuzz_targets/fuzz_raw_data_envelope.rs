//! Fuzzes raw data envelope parsing and error payload decoding.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_raw_data_envelope

#![no_main]

use libfuzzer_sys::fuzz_target;
use tic_spi_protocol::{CodecConfig, ErrorPayload, RawDataType, build_raw_data, parse_raw_data};

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = parse_raw_data(data) else {
        return;
    };
    if raw.header.data_type == RawDataType::Error {
        let _ = ErrorPayload::parse(raw.payload);
    }
    // A parsed envelope with a defined type must rebuild to the same payload.
    if let Ok(rebuilt) = build_raw_data(&raw.header, raw.payload, &CodecConfig::default())
        && let Ok(again) = parse_raw_data(&rebuilt)
    {
        assert_eq!(again.payload, raw.payload);
        assert_eq!(again.header.buffer_id, raw.header.buffer_id);
    }
});
