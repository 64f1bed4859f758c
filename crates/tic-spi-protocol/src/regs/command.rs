//! Offset 0x20 (command) and 0x24 (power management control) registers.
//!
//! Both are written by the host. Codes outside the defined range decode to
//! `Unrecognized` and are refused on encode.

use serde::Serialize;

use crate::error::TicResult;
use crate::regs::field::{BitField, check_known};
use crate::regs::{Register, RegisterKind};

const COMMAND_CODE: BitField = BitField::new("command_code", 0, 8);
const PWR_STATE_CMD: BitField = BitField::new("pwr_state_cmd", 0, 3);

/// Command register code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum CommandCode {
    #[default]
    Nop,
    SoftReset,
    /// Prepare all registers for read.
    PrepareForRead,
    /// Generate test packets as described by the test control register.
    GenerateTestPackets,
    Unrecognized(u8),
}

impl CommandCode {
    const LAST_KNOWN: u32 = 3;

    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Nop,
            1 => Self::SoftReset,
            2 => Self::PrepareForRead,
            3 => Self::GenerateTestPackets,
            other => Self::Unrecognized(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Nop => 0,
            Self::SoftReset => 1,
            Self::PrepareForRead => 2,
            Self::GenerateTestPackets => 3,
            Self::Unrecognized(other) => other,
        }
    }
}

/// Decoded command register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CommandRegister {
    pub command: CommandCode,
}

impl Register for CommandRegister {
    const KIND: RegisterKind = RegisterKind::Command;

    fn decode(raw: u32) -> Self {
        Self {
            command: CommandCode::from_code(COMMAND_CODE.get(raw) as u8),
        }
    }

    fn encode(&self) -> TicResult<u32> {
        let code = check_known(
            Self::KIND,
            COMMAND_CODE.name,
            u32::from(self.command.code()),
            CommandCode::LAST_KNOWN,
        )?;
        COMMAND_CODE.put(Self::KIND, code)
    }
}

/// Power management control command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum PowerCommand {
    /// No change to power state.
    #[default]
    Nop,
    /// Set when the system enters connected standby.
    Sleep,
    /// Set after a period of inactivity.
    Doze,
    /// Set when a "finger off" message is received.
    Armed,
    /// Not typically set by the host.
    Sensing,
    /// Code 5..=7; the device treats these as no change.
    Unrecognized(u8),
}

impl PowerCommand {
    const LAST_KNOWN: u32 = 4;

    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Nop,
            1 => Self::Sleep,
            2 => Self::Doze,
            3 => Self::Armed,
            4 => Self::Sensing,
            other => Self::Unrecognized(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Nop => 0,
            Self::Sleep => 1,
            Self::Doze => 2,
            Self::Armed => 3,
            Self::Sensing => 4,
            Self::Unrecognized(other) => other,
        }
    }

    /// `true` for commands that leave the power state untouched.
    pub fn is_no_op(self) -> bool {
        matches!(self, Self::Nop | Self::Unrecognized(_))
    }
}

/// Decoded power management control register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PowerManagementControl {
    pub command: PowerCommand,
}

impl Register for PowerManagementControl {
    const KIND: RegisterKind = RegisterKind::PowerManagementControl;

    fn decode(raw: u32) -> Self {
        Self {
            command: PowerCommand::from_code(PWR_STATE_CMD.get(raw) as u8),
        }
    }

    fn encode(&self) -> TicResult<u32> {
        let code = check_known(
            Self::KIND,
            PWR_STATE_CMD.name,
            u32::from(self.command.code()),
            PowerCommand::LAST_KNOWN,
        )?;
        PWR_STATE_CMD.put(Self::KIND, code)
    }
}
