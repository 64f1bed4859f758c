//! Register codec: fixed-offset 32-bit registers and their field views.
//!
//! Every register is modelled as a plain struct with explicit mask-and-shift
//! decode/encode. Decoding never fails; encoding rejects values wider than
//! their field and always writes reserved bits as zero.

use core::fmt;
use core::str::FromStr;

use serde::Serialize;

use crate::error::{TicError, TicResult};

pub mod block;
pub mod caps;
pub mod command;
pub mod configuration;
pub mod data_size;
pub mod error_reg;
pub mod field;
pub mod frame_char;
pub mod ident;
pub mod status;
pub mod test_ctrl;

pub use block::{REGISTER_BLOCK_LEN, RegisterBlock};
pub use caps::{Capabilities, ReadDelay};
pub use command::{CommandCode, CommandRegister, PowerCommand, PowerManagementControl};
pub use configuration::{BulkTransferSize, Configuration, Frequency, PacketMode};
pub use data_size::{DATA_SIZE_INCREMENT, DataSize};
pub use error_reg::ErrorRegister;
pub use frame_char::{FrameCharacteristics, MAX_MICROFRAME_SIZE, MAX_MICROFRAMES};
pub use ident::{
    CompatRevision, EDS_INTF_REV, EDS_REV_MAJOR, EDS_REV_MINOR, FirmwareRevision,
    HardwareRevision, Identification, TOUCH_ID_VALUE, VendorHwInfo,
};
pub use status::{InitState, InterruptType, PowerState, SYNC_BYTE, StatusRegister};
pub use test_ctrl::TestControl;

/// Register offsets and address-space limits.
pub mod offsets {
    pub const STATUS: u32 = 0x00;
    pub const FRAME_CHARACTERISTICS: u32 = 0x04;
    pub const ERROR: u32 = 0x08;
    pub const IDENTIFICATION: u32 = 0x10;
    pub const DATA_SIZE: u32 = 0x14;
    pub const CAPABILITIES: u32 = 0x18;
    pub const CONFIGURATION: u32 = 0x1C;
    pub const COMMAND: u32 = 0x20;
    pub const POWER_MANAGEMENT_CONTROL: u32 = 0x24;
    pub const VENDOR_HW_INFO: u32 = 0x28;
    pub const HARDWARE_REVISION: u32 = 0x2C;
    pub const FIRMWARE_REVISION: u32 = 0x30;
    pub const COMPAT_REVISION: u32 = 0x34;
    pub const TEST_CONTROL: u32 = 0x40;

    /// Offsets up to and including this value are reserved for registers.
    pub const REGISTER_LIMIT: u32 = 0xFFF;
    /// First byte of the data window.
    pub const DATA_WINDOW_OFFSET: u32 = 0x1000;
    /// Last byte of the data window.
    pub const DATA_WINDOW_LIMIT: u32 = 0x1_FFFF;
    /// Largest destination offset a feedback header may carry.
    pub const MAX_FEEDBACK_OFFSET: u32 = 0x1_EFFF;
}

/// Register width in bytes.
pub const REGISTER_WIDTH: usize = 4;

/// Every named register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RegisterKind {
    Status,
    FrameCharacteristics,
    Error,
    Identification,
    DataSize,
    Capabilities,
    Configuration,
    Command,
    PowerManagementControl,
    VendorHwInfo,
    HardwareRevision,
    FirmwareRevision,
    CompatRevision,
    TestControl,
}

impl RegisterKind {
    /// All registers in offset order.
    pub const ALL: [RegisterKind; 14] = [
        RegisterKind::Status,
        RegisterKind::FrameCharacteristics,
        RegisterKind::Error,
        RegisterKind::Identification,
        RegisterKind::DataSize,
        RegisterKind::Capabilities,
        RegisterKind::Configuration,
        RegisterKind::Command,
        RegisterKind::PowerManagementControl,
        RegisterKind::VendorHwInfo,
        RegisterKind::HardwareRevision,
        RegisterKind::FirmwareRevision,
        RegisterKind::CompatRevision,
        RegisterKind::TestControl,
    ];

    pub fn offset(self) -> u32 {
        match self {
            RegisterKind::Status => offsets::STATUS,
            RegisterKind::FrameCharacteristics => offsets::FRAME_CHARACTERISTICS,
            RegisterKind::Error => offsets::ERROR,
            RegisterKind::Identification => offsets::IDENTIFICATION,
            RegisterKind::DataSize => offsets::DATA_SIZE,
            RegisterKind::Capabilities => offsets::CAPABILITIES,
            RegisterKind::Configuration => offsets::CONFIGURATION,
            RegisterKind::Command => offsets::COMMAND,
            RegisterKind::PowerManagementControl => offsets::POWER_MANAGEMENT_CONTROL,
            RegisterKind::VendorHwInfo => offsets::VENDOR_HW_INFO,
            RegisterKind::HardwareRevision => offsets::HARDWARE_REVISION,
            RegisterKind::FirmwareRevision => offsets::FIRMWARE_REVISION,
            RegisterKind::CompatRevision => offsets::COMPAT_REVISION,
            RegisterKind::TestControl => offsets::TEST_CONTROL,
        }
    }

    pub fn from_offset(offset: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.offset() == offset)
    }

    pub fn name(self) -> &'static str {
        match self {
            RegisterKind::Status => "Status",
            RegisterKind::FrameCharacteristics => "FrameCharacteristics",
            RegisterKind::Error => "Error",
            RegisterKind::Identification => "Identification",
            RegisterKind::DataSize => "DataSize",
            RegisterKind::Capabilities => "Capabilities",
            RegisterKind::Configuration => "Configuration",
            RegisterKind::Command => "Command",
            RegisterKind::PowerManagementControl => "PowerManagementControl",
            RegisterKind::VendorHwInfo => "VendorHwInfo",
            RegisterKind::HardwareRevision => "HardwareRevision",
            RegisterKind::FirmwareRevision => "FirmwareRevision",
            RegisterKind::CompatRevision => "CompatRevision",
            RegisterKind::TestControl => "TestControl",
        }
    }

    /// Registers the host writes to.
    pub fn is_writable(self) -> bool {
        matches!(
            self,
            RegisterKind::Configuration
                | RegisterKind::Command
                | RegisterKind::PowerManagementControl
                | RegisterKind::TestControl
        )
    }
}

impl fmt::Display for RegisterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RegisterKind {
    type Err = TicError;

    /// Accepts the register name in any case, a short alias, or an offset
    /// such as `0x1c`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', '_'], "");
        if let Some(hex) = key.strip_prefix("0x")
            && let Ok(offset) = u32::from_str_radix(hex, 16)
        {
            return Self::from_offset(offset).ok_or_else(|| TicError::UnknownRegister(s.into()));
        }
        let kind = match key.as_str() {
            "status" | "sts" => RegisterKind::Status,
            "framecharacteristics" | "framechar" | "fc" => RegisterKind::FrameCharacteristics,
            "error" | "err" => RegisterKind::Error,
            "identification" | "id" => RegisterKind::Identification,
            "datasize" | "datasz" => RegisterKind::DataSize,
            "capabilities" | "caps" => RegisterKind::Capabilities,
            "configuration" | "cfg" | "config" => RegisterKind::Configuration,
            "command" | "cmd" => RegisterKind::Command,
            "powermanagementcontrol" | "power" | "pwr" => RegisterKind::PowerManagementControl,
            "vendorhwinfo" | "venhwinfo" => RegisterKind::VendorHwInfo,
            "hardwarerevision" | "hwrev" => RegisterKind::HardwareRevision,
            "firmwarerevision" | "fwrev" => RegisterKind::FirmwareRevision,
            "compatrevision" | "compatrev" | "compat" => RegisterKind::CompatRevision,
            "testcontrol" | "testctrl" => RegisterKind::TestControl,
            _ => return Err(TicError::UnknownRegister(s.into())),
        };
        Ok(kind)
    }
}

/// A typed view over one 32-bit register.
pub trait Register: Sized {
    /// Which register this view describes.
    const KIND: RegisterKind;

    /// Decode a raw register word. Never fails; all bit patterns are
    /// representable.
    fn decode(raw: u32) -> Self;

    /// Encode the view back into a raw word with reserved bits cleared.
    ///
    /// # Errors
    ///
    /// [`TicError::FieldOutOfRange`] when a field does not fit its width,
    /// or an enumerated selector of a host-written register is undefined.
    fn encode(&self) -> TicResult<u32>;
}

/// Decoded value of any register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "register", content = "fields")]
pub enum RegisterValue {
    Status(StatusRegister),
    FrameCharacteristics(FrameCharacteristics),
    Error(ErrorRegister),
    Identification(Identification),
    DataSize(DataSize),
    Capabilities(Capabilities),
    Configuration(Configuration),
    Command(CommandRegister),
    PowerManagementControl(PowerManagementControl),
    VendorHwInfo(VendorHwInfo),
    HardwareRevision(HardwareRevision),
    FirmwareRevision(FirmwareRevision),
    CompatRevision(CompatRevision),
    TestControl(TestControl),
}

impl RegisterValue {
    pub fn kind(&self) -> RegisterKind {
        match self {
            RegisterValue::Status(_) => RegisterKind::Status,
            RegisterValue::FrameCharacteristics(_) => RegisterKind::FrameCharacteristics,
            RegisterValue::Error(_) => RegisterKind::Error,
            RegisterValue::Identification(_) => RegisterKind::Identification,
            RegisterValue::DataSize(_) => RegisterKind::DataSize,
            RegisterValue::Capabilities(_) => RegisterKind::Capabilities,
            RegisterValue::Configuration(_) => RegisterKind::Configuration,
            RegisterValue::Command(_) => RegisterKind::Command,
            RegisterValue::PowerManagementControl(_) => RegisterKind::PowerManagementControl,
            RegisterValue::VendorHwInfo(_) => RegisterKind::VendorHwInfo,
            RegisterValue::HardwareRevision(_) => RegisterKind::HardwareRevision,
            RegisterValue::FirmwareRevision(_) => RegisterKind::FirmwareRevision,
            RegisterValue::CompatRevision(_) => RegisterKind::CompatRevision,
            RegisterValue::TestControl(_) => RegisterKind::TestControl,
        }
    }

    fn encode(&self) -> TicResult<u32> {
        match self {
            RegisterValue::Status(v) => v.encode(),
            RegisterValue::FrameCharacteristics(v) => v.encode(),
            RegisterValue::Error(v) => v.encode(),
            RegisterValue::Identification(v) => v.encode(),
            RegisterValue::DataSize(v) => v.encode(),
            RegisterValue::Capabilities(v) => v.encode(),
            RegisterValue::Configuration(v) => v.encode(),
            RegisterValue::Command(v) => v.encode(),
            RegisterValue::PowerManagementControl(v) => v.encode(),
            RegisterValue::VendorHwInfo(v) => v.encode(),
            RegisterValue::HardwareRevision(v) => v.encode(),
            RegisterValue::FirmwareRevision(v) => v.encode(),
            RegisterValue::CompatRevision(v) => v.encode(),
            RegisterValue::TestControl(v) => v.encode(),
        }
    }
}

/// Condition attached to a decode that did not fail but cannot be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DecodeCondition {
    /// Status sync byte differs from [`SYNC_BYTE`].
    SyncMismatch { found: u8 },
}

/// Result of [`decode_register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecodedRegister {
    pub value: RegisterValue,
    /// Set when the accompanying value is unreliable.
    pub condition: Option<DecodeCondition>,
}

impl DecodedRegister {
    pub fn is_trusted(&self) -> bool {
        self.condition.is_none()
    }
}

/// Decode a raw word read from `kind`.
pub fn decode_register(kind: RegisterKind, raw: u32) -> DecodedRegister {
    let value = match kind {
        RegisterKind::Status => RegisterValue::Status(StatusRegister::decode(raw)),
        RegisterKind::FrameCharacteristics => {
            RegisterValue::FrameCharacteristics(FrameCharacteristics::decode(raw))
        }
        RegisterKind::Error => RegisterValue::Error(ErrorRegister::decode(raw)),
        RegisterKind::Identification => RegisterValue::Identification(Identification::decode(raw)),
        RegisterKind::DataSize => RegisterValue::DataSize(DataSize::decode(raw)),
        RegisterKind::Capabilities => RegisterValue::Capabilities(Capabilities::decode(raw)),
        RegisterKind::Configuration => RegisterValue::Configuration(Configuration::decode(raw)),
        RegisterKind::Command => RegisterValue::Command(CommandRegister::decode(raw)),
        RegisterKind::PowerManagementControl => {
            RegisterValue::PowerManagementControl(PowerManagementControl::decode(raw))
        }
        RegisterKind::VendorHwInfo => RegisterValue::VendorHwInfo(VendorHwInfo::decode(raw)),
        RegisterKind::HardwareRevision => {
            RegisterValue::HardwareRevision(HardwareRevision::decode(raw))
        }
        RegisterKind::FirmwareRevision => {
            RegisterValue::FirmwareRevision(FirmwareRevision::decode(raw))
        }
        RegisterKind::CompatRevision => RegisterValue::CompatRevision(CompatRevision::decode(raw)),
        RegisterKind::TestControl => RegisterValue::TestControl(TestControl::decode(raw)),
    };

    let condition = match &value {
        RegisterValue::Status(status) if status.sync_mismatch() => {
            Some(DecodeCondition::SyncMismatch {
                found: status.sync_byte,
            })
        }
        _ => None,
    };

    DecodedRegister { value, condition }
}

/// Encode `value` for a write to `kind`.
///
/// # Errors
///
/// [`TicError::KindMismatch`] when `value` describes another register, or
/// any error from the register's own [`Register::encode`].
pub fn encode_register(kind: RegisterKind, value: &RegisterValue) -> TicResult<u32> {
    if value.kind() != kind {
        return Err(TicError::KindMismatch {
            expected: kind,
            actual: value.kind(),
        });
    }
    value.encode()
}
