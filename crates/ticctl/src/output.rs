//! Output formatting for CLI responses

use anyhow::Error;
use colored::*;
use serde::Serialize;
use serde_json::{Value, json};
use tic_spi_protocol::TicError;

use crate::error::CliError;

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "type": error_type_name(error)
        }
    });
    match serde_json::to_string_pretty(&error_json) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Failed to format error as JSON: {}", e),
    }
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

/// Print a warning line on stderr.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "Warning:".yellow().bold(), message);
}

/// Print `{"success": true, ...body}` as pretty JSON.
pub fn print_success_json(body: Value) -> anyhow::Result<()> {
    let mut output = json!({ "success": true });
    if let (Some(out), Value::Object(fields)) = (output.as_object_mut(), body) {
        out.extend(fields);
    }
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print a bold section title.
pub fn print_title(title: &str) {
    println!("{}", title.bold());
}

/// Print one `name: value` line, indented.
pub fn print_field(name: &str, value: impl std::fmt::Display) {
    println!("  {:<28} {}", format!("{}:", name).dimmed(), value);
}

/// Print every field of a serializable view, one per line.
///
/// Register values serialize as `{"register": .., "fields": {..}}`; the
/// inner field map is printed in that case.
pub fn print_fields<T: Serialize>(view: &T) -> anyhow::Result<()> {
    let value = serde_json::to_value(view)?;
    let fields = value.get("fields").unwrap_or(&value);
    match fields {
        Value::Object(map) => {
            for (name, value) in map {
                print_field(name, format_value(value));
            }
        }
        other => print_field("value", format_value(other)),
    }
    Ok(())
}

/// Render a JSON value without quotes around plain strings.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) if map.len() == 1 => map
            .iter()
            .map(|(variant, inner)| format!("{}({})", variant, format_value(inner)))
            .collect(),
        other => other.to_string(),
    }
}

/// Colorize an accepted/refused verdict.
pub fn verdict_label(accepted: bool) -> ColoredString {
    if accepted {
        "accepted".green()
    } else {
        "refused".red()
    }
}

fn error_type_name(error: &Error) -> String {
    if let Some(err) = error.downcast_ref::<TicError>() {
        return err.category().to_string();
    }
    match error.downcast_ref::<CliError>() {
        Some(CliError::Codec(err)) => err.category().to_string(),
        Some(CliError::InvalidValue(_)) => "InvalidValue".into(),
        Some(CliError::InvalidConfiguration(_)) => "InvalidConfiguration".into(),
        Some(CliError::IoError(_)) => "Io".into(),
        None => "Unknown".into(),
    }
}
