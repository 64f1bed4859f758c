//! Register decoding commands

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;
use tic_spi_protocol::{
    DecodeCondition, RegisterBlock, RegisterKind, SYNC_BYTE, decode_register,
};
use tracing::info;

use super::parse_u32;
use crate::output;

/// Decode one raw register word.
pub fn execute(register: &str, value: &str, json: bool) -> Result<()> {
    let kind: RegisterKind = register.parse()?;
    let raw = parse_u32(value)?;
    let decoded = decode_register(kind, raw);
    info!(register = %kind, raw, "decoded register");

    if json {
        return output::print_success_json(json!({
            "register": kind.name(),
            "offset": format!("{:#04x}", kind.offset()),
            "raw": format!("{:#010x}", raw),
            "decoded": decoded,
        }));
    }

    output::print_title(&format!(
        "{} (offset {:#04x}) = {:#010x}",
        kind,
        kind.offset(),
        raw
    ));
    output::print_fields(&decoded.value)?;
    if let Some(DecodeCondition::SyncMismatch { found }) = decoded.condition {
        output::print_warning(&format!(
            "sync byte {:#04x} does not match {:#04x}; status is untrusted",
            found, SYNC_BYTE
        ));
    }
    Ok(())
}

/// Decode a 64-byte register block dump.
pub fn execute_block(file: &Path, json: bool) -> Result<()> {
    let bytes =
        fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let block = RegisterBlock::parse(&bytes)?;
    let sync_ok = !block.status.sync_mismatch();
    let valid_id = block.has_valid_id();

    if json {
        return output::print_success_json(json!({
            "block": block,
            "valid_id": valid_id,
            "sync_ok": sync_ok,
        }));
    }

    let registers = serde_json::to_value(block)?;
    if let Some(map) = registers.as_object() {
        for (name, view) in map {
            output::print_title(name);
            output::print_fields(view)?;
        }
    }
    if !valid_id {
        output::print_warning("identification register does not carry the $TIC signature");
    }
    if !sync_ok {
        output::print_warning(&format!(
            "status sync byte {:#04x} does not match {:#04x}",
            block.status.sync_byte, SYNC_BYTE
        ));
    }
    Ok(())
}
