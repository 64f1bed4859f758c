//! ticctl - TIC SPI protocol inspection CLI
//!
//! Decodes register words and register block dumps, classifies interrupts,
//! validates power transitions, and parses or builds data-window envelopes.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod config;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{EnvelopeArg, FeedbackArgs, PowerArg};

#[derive(Parser)]
#[command(name = "ticctl")]
#[command(about = "TIC SPI protocol tool - decode registers, classify interrupts, parse envelopes")]
#[command(version)]
#[command(long_about = "
ticctl is an offline companion to the tic-spi-protocol codec. It decodes
register values and dumps captured from a touch IC, and parses or builds
the envelopes exchanged through the data window.

Values may be given in hex (0x5A000001) or decimal.
Use --json flag for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Codec configuration file (.yaml, .yml or .json)
    #[arg(long, global = true, env = "TICCTL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a raw register value
    Decode {
        /// Register name or offset (e.g. status, 0x1c)
        register: String,
        /// Raw 32-bit value
        value: String,
    },

    /// Decode a 64-byte register block dump
    Block {
        /// Binary dump file
        file: PathBuf,
    },

    /// Classify the interrupt reported by a status word
    Classify {
        /// Raw status register value
        status: String,
        /// Frame characteristics reported an HID report
        #[arg(long)]
        hid: bool,
    },

    /// Parse an envelope file
    Parse {
        /// Envelope layout
        #[arg(value_enum)]
        kind: EnvelopeArg,
        /// Binary envelope file
        file: PathBuf,
        /// Register block dump to take limits and compatibility id from
        #[arg(long)]
        registers: Option<PathBuf>,
    },

    /// Build a feedback envelope
    Feedback(FeedbackArgs),

    /// Validate a power management command against a status word
    Power {
        /// Raw status register value
        status: String,
        /// Requested power command
        #[arg(value_enum)]
        command: PowerArg,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("ticctl={0},tic_spi_protocol={0}", log_level).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match execute_command(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }
            ExitCode::from(error::exit_code(&e))
        }
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Decode { register, value } => commands::decode::execute(register, value, cli.json),
        Commands::Block { file } => commands::decode::execute_block(file, cli.json),
        Commands::Classify { status, hid } => commands::classify::execute(status, *hid, cli.json),
        Commands::Power { status, command } => {
            commands::classify::execute_power(status, *command, cli.json)
        }
        Commands::Parse {
            kind,
            file,
            registers,
        } => {
            let mut config = config::load(cli.config.as_deref())?;
            if let Some(registers) = registers {
                config = config::apply_register_block(config, registers)?;
            }
            commands::envelope::execute_parse(*kind, file, &config, cli.json)
        }
        Commands::Feedback(args) => {
            let config = config::load(cli.config.as_deref())?;
            commands::envelope::execute_feedback(args, &config, cli.json)
        }
    }
}
