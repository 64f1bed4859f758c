//! Envelope parsing and building commands

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;
use tic_spi_protocol::{
    CodecConfig, EnvelopeKind, ErrorPayload, FeedbackHeader, RawDataType, TicError,
    build_feedback, check_destination, parse_feedback, parse_raw_data, parse_write,
};
use tracing::info;

use super::{EnvelopeArg, FeedbackArgs, parse_u32};
use crate::output;

fn too_large(envelope: EnvelopeKind, len: usize, max: usize) -> Result<()> {
    if len > max {
        return Err(TicError::PayloadTooLarge { envelope, len, max }.into());
    }
    Ok(())
}

/// Parse an envelope file and enforce the configured limits.
pub fn execute_parse(kind: EnvelopeArg, file: &Path, config: &CodecConfig, json: bool) -> Result<()> {
    let bytes =
        fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    match kind {
        EnvelopeArg::Raw => parse_raw(&bytes, config, json),
        EnvelopeArg::Feedback => parse_feedback_file(&bytes, config, json),
        EnvelopeArg::Write => parse_write_file(&bytes, config, json),
    }
}

fn parse_raw(bytes: &[u8], config: &CodecConfig, json: bool) -> Result<()> {
    let raw = parse_raw_data(bytes)?;
    config.compatibility().check_raw_data(&raw.header)?;
    too_large(EnvelopeKind::RawData, raw.payload.len(), config.max_frame_size)?;
    let error = match raw.header.data_type {
        RawDataType::Error => Some(ErrorPayload::parse(raw.payload)?),
        _ => None,
    };
    info!(buffer_id = raw.header.buffer_id, len = raw.payload.len(), "parsed raw data envelope");

    if json {
        return output::print_success_json(json!({
            "envelope": "raw",
            "header": raw.header,
            "payload_len": raw.payload.len(),
            "error_payload": error,
        }));
    }

    output::print_title("Raw data header");
    output::print_fields(&raw.header)?;
    output::print_field("payload bytes", raw.payload.len());
    if let Some(error) = error {
        output::print_title("Error payload");
        output::print_fields(&error)?;
    }
    Ok(())
}

fn parse_feedback_file(bytes: &[u8], config: &CodecConfig, json: bool) -> Result<()> {
    let feedback = parse_feedback(bytes)?;
    config.compatibility().check_feedback(&feedback.header)?;
    check_destination(feedback.header.spi_offset, feedback.payload.len())?;
    too_large(
        EnvelopeKind::Feedback,
        feedback.payload.len(),
        config.max_feedback_size,
    )?;
    let power = feedback.header.command.power_command();

    if json {
        return output::print_success_json(json!({
            "envelope": "feedback",
            "header": feedback.header,
            "payload_len": feedback.payload.len(),
            "power_command": power,
        }));
    }

    output::print_title("Feedback header");
    output::print_fields(&feedback.header)?;
    output::print_field("payload bytes", feedback.payload.len());
    if let Some(power) = power {
        output::print_field("power command", format!("{:?}", power));
    }
    Ok(())
}

fn parse_write_file(bytes: &[u8], config: &CodecConfig, json: bool) -> Result<()> {
    let write = parse_write(bytes)?;
    let data_type = write.header.data_type;
    let max = data_type
        .max_payload(config)
        .ok_or(TicError::UndefinedCode {
            envelope: EnvelopeKind::Write,
            field: "data_type",
            code: data_type.code(),
        })?;
    too_large(EnvelopeKind::Write, write.payload.len(), max)?;

    if json {
        return output::print_success_json(json!({
            "envelope": "write",
            "header": write.header,
            "payload_len": write.payload.len(),
            "max_payload": max,
        }));
    }

    output::print_title("Write header");
    output::print_fields(&write.header)?;
    output::print_field("payload bytes", write.payload.len());
    output::print_field("limit", max);
    Ok(())
}

/// Build a feedback envelope from command-line flags.
pub fn execute_feedback(args: &FeedbackArgs, config: &CodecConfig, json: bool) -> Result<()> {
    let payload = match &args.payload {
        Some(path) => {
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))?
        }
        None => Vec::new(),
    };
    let header = FeedbackHeader {
        command: args.command.into(),
        buffer_id: parse_u32(&args.buffer_id)?,
        protocol_version: config.protocol_version,
        data_type: args.data_type.into(),
        spi_offset: parse_u32(&args.offset)?,
        ..FeedbackHeader::default()
    };
    let bytes = build_feedback(&header, &payload, config)?;
    let written = parse_feedback(&bytes)?.header;
    fs::write(&args.out, &bytes)
        .with_context(|| format!("failed to write {}", args.out.display()))?;
    info!(path = %args.out.display(), len = bytes.len(), "wrote feedback envelope");

    if json {
        return output::print_success_json(json!({
            "out": args.out,
            "bytes": bytes.len(),
            "header": written,
        }));
    }

    output::print_title(&format!(
        "Wrote {} bytes to {}",
        bytes.len(),
        args.out.display()
    ));
    output::print_fields(&written)?;
    Ok(())
}
