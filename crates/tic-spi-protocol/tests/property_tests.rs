//! Property-based tests for the register codec, envelopes and reassembler.
//!
//! Uses proptest with 500 cases per property.

use proptest::prelude::*;
use tic_spi_protocol::{
    CodecConfig, Configuration, FEEDBACK_HEADER_LEN, FeedbackHeader, FrameCharacteristics,
    FrameReassembler, RAW_DATA_HEADER_LEN, RawDataHeader, ReassemblyError, ReassemblyEvent,
    ReassemblyState, Register, RegisterKind, StatusRegister, TicError, WRITE_HEADER_LEN,
    WriteDataType,
    build_feedback, build_raw_data, build_write, decode_register, encode_register,
    parse_feedback, parse_raw_data, parse_write,
};

/// Bits each device-reported register keeps; everything else is reserved.
fn defined_bits(kind: RegisterKind) -> u32 {
    match kind {
        RegisterKind::Status => 0xFF00_03FF,
        RegisterKind::FrameCharacteristics => 0x1FFF_FFFF,
        RegisterKind::Error => 0xFFFF_8007,
        RegisterKind::DataSize => 0x000F_FFFF,
        RegisterKind::Capabilities => 0xFF0F_FF0E,
        RegisterKind::Configuration => 0x0000_01FF,
        RegisterKind::Command => 0x0000_00FF,
        RegisterKind::PowerManagementControl => 0x0000_0007,
        _ => u32::MAX,
    }
}

const DEVICE_REGISTERS: [RegisterKind; 10] = [
    RegisterKind::Status,
    RegisterKind::FrameCharacteristics,
    RegisterKind::Error,
    RegisterKind::Identification,
    RegisterKind::DataSize,
    RegisterKind::Capabilities,
    RegisterKind::VendorHwInfo,
    RegisterKind::HardwareRevision,
    RegisterKind::FirmwareRevision,
    RegisterKind::CompatRevision,
];

fn fc(index: u8, count: u8, size: u32) -> FrameCharacteristics {
    FrameCharacteristics {
        microframe_size: size,
        microframes_per_frame: count,
        microframe_index: index,
        hid_report: false,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Device-reported registers re-encode to the raw word with reserved
    /// bits cleared.
    #[test]
    fn prop_device_register_raw_round_trip(
        kind_index in 0usize..DEVICE_REGISTERS.len(),
        raw in any::<u32>(),
    ) {
        let kind = DEVICE_REGISTERS[kind_index];
        let decoded = decode_register(kind, raw);
        let encoded = encode_register(kind, &decoded.value)
            .map_err(|e| TestCaseError::fail(format!("{kind} encode failed: {e}")))?;
        prop_assert_eq!(encoded, raw & defined_bits(kind), "{} raw {:#010x}", kind, raw);
    }

    /// Test control has no reserved bits.
    #[test]
    fn prop_test_control_round_trip(raw in any::<u32>()) {
        let decoded = decode_register(RegisterKind::TestControl, raw);
        prop_assert_eq!(encode_register(RegisterKind::TestControl, &decoded.value), Ok(raw));
    }

    /// Host-written configuration words with defined selectors round-trip;
    /// undefined selectors are refused.
    #[test]
    fn prop_configuration_selectors(
        touch in any::<bool>(),
        hid in any::<bool>(),
        bulk in 0u32..16,
        freq in 0u32..8,
    ) {
        let raw = u32::from(touch) | (u32::from(hid) << 1) | (bulk << 2) | (freq << 6);
        let result = Configuration::decode(raw).encode();
        if bulk <= 4 && freq <= 2 {
            prop_assert_eq!(result, Ok(raw));
        } else {
            let is_range_error = matches!(result, Err(TicError::FieldOutOfRange { .. }));
            prop_assert!(is_range_error);
        }
    }

    /// The sync condition is reported exactly when the top byte is not 0x5A.
    #[test]
    fn prop_sync_mismatch_iff_top_byte(raw in any::<u32>()) {
        let decoded = decode_register(RegisterKind::Status, raw);
        prop_assert_eq!(decoded.is_trusted(), (raw >> 24) == 0x5A);
        prop_assert_eq!(StatusRegister::decode(raw).sync_mismatch(), (raw >> 24) != 0x5A);
    }

    /// N consistent micro-frames yield exactly one complete frame of N * size bytes.
    #[test]
    fn prop_reassembly_completes(count in 1u8..=31, size in 0u32..=64) {
        let mut reassembler = FrameReassembler::default();
        let chunk = vec![0xA5u8; size as usize];
        let mut completed = 0usize;
        for index in 1..=count {
            match reassembler.push(&fc(index, count, size), &chunk) {
                Ok(ReassemblyEvent::Complete(frame)) => {
                    completed += 1;
                    prop_assert_eq!(frame.data.len(), usize::from(count) * size as usize);
                    prop_assert_eq!(frame.microframes, count);
                }
                Ok(ReassemblyEvent::Pending { received, expected }) => {
                    prop_assert_eq!(received, index);
                    prop_assert_eq!(expected, count);
                }
                Err(e) => return Err(TestCaseError::fail(format!("unexpected fault: {e}"))),
            }
        }
        prop_assert_eq!(completed, 1);
    }

    /// Skipping an index faults and never completes the frame.
    #[test]
    fn prop_reassembly_out_of_order_faults(count in 3u8..=31, skip in 2u8..=30) {
        prop_assume!(skip < count);
        let mut reassembler = FrameReassembler::default();
        let mut saw_complete = false;
        let mut saw_fault = false;
        for index in (1..=count).filter(|&i| i != skip) {
            match reassembler.push(&fc(index, count, 1), &[0]) {
                Ok(ReassemblyEvent::Complete(_)) => saw_complete = true,
                Ok(ReassemblyEvent::Pending { .. }) => {}
                Err(ReassemblyError::UnexpectedIndex { .. }) => saw_fault = true,
                Err(e) => return Err(TestCaseError::fail(format!("unexpected error: {e}"))),
            }
        }
        prop_assert!(saw_fault);
        prop_assert!(!saw_complete);
    }

    /// Index 1 arriving mid-frame faults; the following index 1 starts fresh.
    #[test]
    fn prop_reassembly_index_one_mid_frame_faults(count in 2u8..=31, k in 1u8..=30) {
        prop_assume!(k < count);
        let mut reassembler = FrameReassembler::default();
        for index in 1..=k {
            let pushed = reassembler.push(&fc(index, count, 1), &[index]);
            let is_pending = matches!(pushed, Ok(ReassemblyEvent::Pending { .. }));
            prop_assert!(is_pending);
        }
        prop_assert_eq!(
            reassembler.push(&fc(1, count, 1), &[0]),
            Err(ReassemblyError::UnexpectedIndex { expected: k + 1, actual: 1 })
        );
        prop_assert!(matches!(reassembler.state(), ReassemblyState::Faulted(_)));

        match reassembler.push(&fc(1, 1, 1), &[0xEE]) {
            Ok(ReassemblyEvent::Complete(frame)) => prop_assert_eq!(frame.data, &[0xEEu8][..]),
            other => return Err(TestCaseError::fail(format!("expected complete, got {other:?}"))),
        }
    }

    /// Parsers never panic and only fail with structural errors.
    #[test]
    fn prop_parse_arbitrary_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..160)) {
        for result in [
            parse_raw_data(&bytes).map(|_| ()),
            parse_feedback(&bytes).map(|_| ()),
            parse_write(&bytes).map(|_| ()),
        ] {
            if let Err(e) = result {
                let structural = matches!(
                    e,
                    TicError::TruncatedHeader { .. } | TicError::TruncatedPayload { .. }
                );
                prop_assert!(structural, "unexpected error {e:?}");
            }
        }
    }

    /// Built envelopes parse back to the same payload and ids.
    #[test]
    fn prop_envelopes_build_then_parse(
        payload in proptest::collection::vec(any::<u8>(), 0..512),
        buffer_id in any::<u32>(),
        spi_offset in 0u32..0x1_0000,
    ) {
        let config = CodecConfig::default();

        let raw_header = RawDataHeader { buffer_id, ..RawDataHeader::default() };
        let raw = build_raw_data(&raw_header, &payload, &config)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(raw.len(), RAW_DATA_HEADER_LEN + payload.len());
        let parsed = parse_raw_data(&raw).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(parsed.header.buffer_id, buffer_id);
        prop_assert_eq!(parsed.payload, payload.as_slice());

        let feedback_header = FeedbackHeader { buffer_id, spi_offset, ..FeedbackHeader::default() };
        let feedback = build_feedback(&feedback_header, &payload, &config)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(feedback.len(), FEEDBACK_HEADER_LEN + payload.len());
        let parsed = parse_feedback(&feedback).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(parsed.header.spi_offset, spi_offset);
        prop_assert_eq!(parsed.payload, payload.as_slice());

        let write = build_write(WriteDataType::DataLoad, &payload, &config)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(write.len(), WRITE_HEADER_LEN + payload.len());
        let parsed = parse_write(&write).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(parsed.header.len as usize, payload.len());
        prop_assert_eq!(parsed.payload, payload.as_slice());
    }

    /// Short buffers are rejected as truncated headers.
    #[test]
    fn prop_short_headers_rejected(len in 0usize..RAW_DATA_HEADER_LEN) {
        let bytes = vec![0u8; len];
        let raw_truncated = matches!(parse_raw_data(&bytes), Err(TicError::TruncatedHeader { .. }));
        let feedback_truncated = matches!(parse_feedback(&bytes), Err(TicError::TruncatedHeader { .. }));
        prop_assert!(raw_truncated);
        prop_assert!(feedback_truncated);
    }
}
