//! Interrupt classification and power transition checks

use anyhow::Result;
use serde_json::json;
use tic_spi_protocol::{
    DeviceState, PowerCommand, PowerTransition, RawDataType, Register, StatusRegister, Verdict,
    classify_interrupt, validate_power_transition,
};

use super::{PowerArg, parse_u32};
use crate::output;

/// Classify the interrupt reported by a status word.
pub fn execute(status: &str, hid: bool, json: bool) -> Result<()> {
    let status = StatusRegister::decode(parse_u32(status)?);
    let class = classify_interrupt(&status)?;
    let state = DeviceState::from_status(&status);
    let routed = class.and_then(|c| RawDataType::for_interrupt(c, hid));

    if json {
        return output::print_success_json(json!({
            "interrupt": class,
            "raw_data_type": routed,
            "state": state,
            "operational": state.is_operational(),
        }));
    }

    output::print_title("Interrupt");
    match class {
        Some(class) => output::print_field("pending", class),
        None => output::print_field("pending", "none"),
    }
    if let Some(routed) = routed {
        output::print_field("raw data type", format!("{:?}", routed));
    }
    output::print_title("Device state");
    output::print_fields(&state)?;
    if let Some(init) = state.pending_load() {
        output::print_warning(&format!("device is waiting for a load ({:?})", init));
    }
    Ok(())
}

/// Check a power management command against a status word.
pub fn execute_power(status: &str, command: PowerArg, json: bool) -> Result<()> {
    let status = StatusRegister::decode(parse_u32(status)?);
    let command = PowerCommand::from(command);
    let verdict = validate_power_transition(&status, command);

    if json {
        return output::print_success_json(json!({
            "command": command,
            "accepted": verdict.is_accepted(),
            "verdict": verdict,
        }));
    }

    output::print_title("Power transition");
    output::print_field("command", format!("{:?}", command));
    output::print_field("verdict", output::verdict_label(verdict.is_accepted()));
    match verdict {
        Verdict::Accepted(PowerTransition::NoChange) => output::print_field("effect", "no change"),
        Verdict::Accepted(PowerTransition::Change { from, to }) => {
            output::print_field("effect", format!("{:?} -> {:?}", from, to))
        }
        Verdict::Invalid(reason) => output::print_field("reason", reason),
    }
    Ok(())
}
