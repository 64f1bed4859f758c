//! Command implementations for ticctl CLI

pub mod classify;
pub mod decode;
pub mod envelope;

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use tic_spi_protocol::{FeedbackCommand, FeedbackDataType, PowerCommand};

use crate::error::CliError;

/// Envelope layouts accepted by `ticctl parse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EnvelopeArg {
    /// Raw data envelope (device to host)
    Raw,
    /// Feedback envelope (host to device)
    Feedback,
    /// Write data envelope (host to device)
    Write,
}

/// Power management commands accepted by `ticctl power`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PowerArg {
    Nop,
    Sleep,
    Doze,
    Armed,
    Sensing,
}

impl From<PowerArg> for PowerCommand {
    fn from(arg: PowerArg) -> Self {
        match arg {
            PowerArg::Nop => PowerCommand::Nop,
            PowerArg::Sleep => PowerCommand::Sleep,
            PowerArg::Doze => PowerCommand::Doze,
            PowerArg::Armed => PowerCommand::Armed,
            PowerArg::Sensing => PowerCommand::Sensing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FeedbackCommandArg {
    None,
    SoftReset,
    GotoArmed,
    GotoSensing,
    GotoSleep,
    GotoDoze,
    HardReset,
}

impl From<FeedbackCommandArg> for FeedbackCommand {
    fn from(arg: FeedbackCommandArg) -> Self {
        match arg {
            FeedbackCommandArg::None => FeedbackCommand::None,
            FeedbackCommandArg::SoftReset => FeedbackCommand::SoftReset,
            FeedbackCommandArg::GotoArmed => FeedbackCommand::GotoArmed,
            FeedbackCommandArg::GotoSensing => FeedbackCommand::GotoSensing,
            FeedbackCommandArg::GotoSleep => FeedbackCommand::GotoSleep,
            FeedbackCommandArg::GotoDoze => FeedbackCommand::GotoDoze,
            FeedbackCommandArg::HardReset => FeedbackCommand::HardReset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FeedbackDataTypeArg {
    Feedback,
    SetFeatures,
    GetFeatures,
    OutputReport,
    StoreData,
}

impl From<FeedbackDataTypeArg> for FeedbackDataType {
    fn from(arg: FeedbackDataTypeArg) -> Self {
        match arg {
            FeedbackDataTypeArg::Feedback => FeedbackDataType::Feedback,
            FeedbackDataTypeArg::SetFeatures => FeedbackDataType::SetFeatures,
            FeedbackDataTypeArg::GetFeatures => FeedbackDataType::GetFeatures,
            FeedbackDataTypeArg::OutputReport => FeedbackDataType::OutputReport,
            FeedbackDataTypeArg::StoreData => FeedbackDataType::StoreData,
        }
    }
}

/// Flags for `ticctl feedback`.
#[derive(Debug, Args)]
pub struct FeedbackArgs {
    /// Command the device runs after consuming the payload
    #[arg(long, value_enum, default_value = "none")]
    pub command: FeedbackCommandArg,

    /// How the device interprets the payload
    #[arg(long, value_enum, default_value = "feedback")]
    pub data_type: FeedbackDataTypeArg,

    /// Raw data buffer id this feedback answers
    #[arg(long, default_value = "0")]
    pub buffer_id: String,

    /// Destination offset inside the data window (hex or decimal)
    #[arg(long, default_value = "0")]
    pub offset: String,

    /// File holding the payload bytes
    #[arg(long)]
    pub payload: Option<PathBuf>,

    /// Where to write the envelope
    #[arg(short, long)]
    pub out: PathBuf,
}

/// Parse a register word or header value given as `0x`-prefixed hex or
/// decimal. Underscores are accepted as digit separators.
pub fn parse_u32(text: &str) -> Result<u32, CliError> {
    let cleaned = text.trim().replace('_', "");
    let parsed = match cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => cleaned.parse::<u32>(),
    };
    parsed.map_err(|e| CliError::InvalidValue(format!("'{text}' is not a 32-bit value: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn parse_u32_accepts_hex_and_decimal() -> TestResult {
        assert_eq!(parse_u32("0x5A000001")?, 0x5A00_0001);
        assert_eq!(parse_u32("0X1f")?, 0x1F);
        assert_eq!(parse_u32("4096")?, 4096);
        assert_eq!(parse_u32("0x5a00_0001")?, 0x5A00_0001);
        Ok(())
    }

    #[test]
    fn parse_u32_rejects_garbage_and_overflow() {
        assert!(matches!(
            parse_u32("zz"),
            Err(CliError::InvalidValue(msg)) if msg.contains("invalid digit")
        ));
        assert!(matches!(
            parse_u32("0x1_0000_0000"),
            Err(CliError::InvalidValue(msg)) if msg.contains("too large")
        ));
        assert!(matches!(parse_u32("0x1_0000_0000"), Err(CliError::InvalidValue(_))));
        assert!(matches!(parse_u32(""), Err(CliError::InvalidValue(_))));
    }
}
