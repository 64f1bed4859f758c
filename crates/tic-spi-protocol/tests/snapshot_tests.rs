//! Wire-format snapshots for registers and envelopes.

use insta::assert_snapshot;
use tic_spi_protocol::{
    BulkTransferSize, CodecConfig, Configuration, ErrorPayload, ErrorRegister, FeedbackCommand,
    FeedbackDataType, FeedbackHeader, FrameCharacteristics, FrameReassembler, Frequency,
    PacketMode, RawDataHeader, RawDataType, ReassemblyError, ReassemblyEvent, Register,
    RegisterKind, StatusRegister, WriteDataType, build_feedback, build_write, decode_register,
};

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Registers ────────────────────────────────────────────────────────────────

#[test]
fn test_snapshot_status_data_available() -> Result<(), Box<dyn std::error::Error>> {
    let status = StatusRegister {
        int_status: true,
        ..StatusRegister::default()
    };
    assert_snapshot!(format!("{:#010x}", status.encode()?), @"0x5a000001");
    Ok(())
}

#[test]
fn test_snapshot_configuration_hid_64b_30mhz() -> Result<(), Box<dyn std::error::Error>> {
    let config = Configuration {
        touch_enable: false,
        packet_mode: PacketMode::Hid,
        bulk_xfer_size: BulkTransferSize::B64,
        freq_select: Frequency::Mhz30,
    };
    assert_snapshot!(format!("{:#010x}", config.encode()?), @"0x00000092");
    Ok(())
}

#[test]
fn test_snapshot_status_json() -> Result<(), Box<dyn std::error::Error>> {
    let decoded = decode_register(RegisterKind::Status, 0x5A00_0001);
    assert_snapshot!(
        serde_json::to_string(&decoded)?,
        @r#"{"value":{"register":"Status","fields":{"int_status":true,"int_type":"DataAvailable","power_state":"Sleep","init_state":"ReadyForOp","busy":false,"sync_byte":90}},"condition":null}"#
    );
    Ok(())
}

// ── Envelopes ────────────────────────────────────────────────────────────────

#[test]
fn test_snapshot_write_feedback() -> Result<(), Box<dyn std::error::Error>> {
    let bytes = build_write(WriteDataType::Feedback, &[0xAB, 0xCD], &CodecConfig::default())?;
    assert_snapshot!(hex(&bytes), @"02 00 00 00 02 00 00 00 ab cd");
    Ok(())
}

#[test]
fn test_snapshot_error_payload_bad_index() -> Result<(), Box<dyn std::error::Error>> {
    let payload = ErrorPayload::from_reassembly(
        &ReassemblyError::UnexpectedIndex {
            expected: 2,
            actual: 3,
        },
        ErrorRegister::default(),
    );
    assert_snapshot!(hex(&payload.to_bytes()?), @"00 00 00 00 02 00 00 00 00 00 00 00");
    Ok(())
}

#[test]
fn test_snapshot_feedback_header() -> Result<(), Box<dyn std::error::Error>> {
    let header = FeedbackHeader {
        command: FeedbackCommand::GotoSleep,
        buffer_id: 0x10,
        data_type: FeedbackDataType::SetFeatures,
        spi_offset: 0x200,
        ..FeedbackHeader::default()
    };
    let bytes = build_feedback(&header, &[1, 2], &CodecConfig::default())?;
    let fixed = bytes.get(..0x18).ok_or("short feedback envelope")?;
    assert_snapshot!(
        hex(fixed),
        @"04 00 00 00 02 00 00 00 10 00 00 00 00 00 00 00 01 00 00 00 00 02 00 00"
    );
    let reserved = bytes.get(0x18..0x40).ok_or("short feedback envelope")?;
    assert!(reserved.iter().all(|&b| b == 0));
    assert_eq!(bytes.get(0x40..), Some(&[1u8, 2][..]));
    Ok(())
}

#[test]
fn test_snapshot_packaged_frame() -> Result<(), Box<dyn std::error::Error>> {
    let mut reassembler = FrameReassembler::default();
    let fc = FrameCharacteristics {
        microframe_size: 4,
        microframes_per_frame: 1,
        microframe_index: 1,
        hid_report: false,
    };
    let template = RawDataHeader {
        data_type: RawDataType::Frame,
        buffer_id: 1,
        ..RawDataHeader::default()
    };
    let bytes = match reassembler.push(&fc, &[0xDE, 0xAD, 0xBE, 0xEF])? {
        ReassemblyEvent::Complete(frame) => frame.package(&template, &CodecConfig::default())?,
        ReassemblyEvent::Pending { .. } => return Err("frame did not complete".into()),
    };
    let head = bytes.get(..0x10).ok_or("short raw data envelope")?;
    assert_snapshot!(hex(head), @"00 00 00 00 04 00 00 00 01 00 00 00 00 00 00 00");
    let payload = bytes.get(0x40..).ok_or("short raw data envelope")?;
    assert_snapshot!(hex(payload), @"de ad be ef");
    Ok(())
}
