//! Error types for ticctl CLI

use thiserror::Error;
use tic_spi_protocol::{ErrorCategory, TicError};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error(transparent)]
    Codec(#[from] TicError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::InvalidValue(_) => 2,
            CliError::InvalidConfiguration(_) => 4,
            CliError::Codec(err) => codec_exit_code(err),
            CliError::IoError(_) => 1,
        }
    }
}

fn codec_exit_code(err: &TicError) -> u8 {
    match err.category() {
        ErrorCategory::Version => 3,
        ErrorCategory::Config => 4,
        ErrorCategory::FieldEncoding
        | ErrorCategory::Framing
        | ErrorCategory::Envelope
        | ErrorCategory::Device => 2,
    }
}

/// Exit code for an error surfaced from a command.
pub fn exit_code(error: &anyhow::Error) -> u8 {
    if let Some(err) = error.downcast_ref::<CliError>() {
        err.exit_code()
    } else if let Some(err) = error.downcast_ref::<TicError>() {
        codec_exit_code(err)
    } else {
        1
    }
}
