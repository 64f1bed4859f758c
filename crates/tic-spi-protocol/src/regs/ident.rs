//! Identification registers: 0x10 (id), 0x28 (vendor HW info),
//! 0x2C (HW revision), 0x30 (FW revision) and 0x34 (compatibility revision).

use serde::Serialize;

use crate::error::TicResult;
use crate::regs::field::BitField;
use crate::regs::{Register, RegisterKind};

/// Expected identification register value, ASCII "$TIC".
pub const TOUCH_ID_VALUE: u32 = 0x4349_5424;

/// EDS minor revision implemented by this codec.
pub const EDS_REV_MINOR: u8 = 0;
/// EDS major revision implemented by this codec.
pub const EDS_REV_MAJOR: u8 = 1;
/// EDS interface revision implemented by this codec.
pub const EDS_INTF_REV: u8 = 1;

const VENDOR_ID: BitField = BitField::new("vendor_id", 0, 16);
const DEVICE_ID: BitField = BitField::new("device_id", 16, 16);

/// Identification register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Identification {
    pub value: u32,
}

impl Identification {
    /// Whether the register carries the "$TIC" signature.
    pub fn is_valid(&self) -> bool {
        self.value == TOUCH_ID_VALUE
    }
}

impl Default for Identification {
    fn default() -> Self {
        Self {
            value: TOUCH_ID_VALUE,
        }
    }
}

impl Register for Identification {
    const KIND: RegisterKind = RegisterKind::Identification;

    fn decode(raw: u32) -> Self {
        Self { value: raw }
    }

    fn encode(&self) -> TicResult<u32> {
        Ok(self.value)
    }
}

/// Vendor hardware information register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct VendorHwInfo {
    pub vendor_id: u16,
    pub device_id: u16,
}

impl Register for VendorHwInfo {
    const KIND: RegisterKind = RegisterKind::VendorHwInfo;

    fn decode(raw: u32) -> Self {
        Self {
            vendor_id: VENDOR_ID.get(raw) as u16,
            device_id: DEVICE_ID.get(raw) as u16,
        }
    }

    fn encode(&self) -> TicResult<u32> {
        Ok(VENDOR_ID.put(Self::KIND, u32::from(self.vendor_id))?
            | DEVICE_ID.put(Self::KIND, u32::from(self.device_id))?)
    }
}

/// Vendor hardware revision, opaque to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HardwareRevision(pub u32);

impl Register for HardwareRevision {
    const KIND: RegisterKind = RegisterKind::HardwareRevision;

    fn decode(raw: u32) -> Self {
        Self(raw)
    }

    fn encode(&self) -> TicResult<u32> {
        Ok(self.0)
    }
}

/// Vendor firmware revision, opaque to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FirmwareRevision(pub u32);

impl Register for FirmwareRevision {
    const KIND: RegisterKind = RegisterKind::FirmwareRevision;

    fn decode(raw: u32) -> Self {
        Self(raw)
    }

    fn encode(&self) -> TicResult<u32> {
        Ok(self.0)
    }
}

/// Compatibility revision register.
///
/// For an EDS revision `x.y`, `major` is `x` and `minor` is `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CompatRevision {
    pub minor: u8,
    pub major: u8,
    pub intf_rev: u8,
    /// Vendor-specific kernel compatibility version. Raw data headers copy
    /// this value into their compatibility id.
    pub kernel_compat_ver: u8,
}

impl CompatRevision {
    /// Revision matching the constants this codec was written against.
    pub fn host() -> Self {
        Self {
            minor: EDS_REV_MINOR,
            major: EDS_REV_MAJOR,
            intf_rev: EDS_INTF_REV,
            kernel_compat_ver: 0,
        }
    }

    /// Major EDS revision and interface revision must match the host.
    pub fn is_supported(&self) -> bool {
        self.major == EDS_REV_MAJOR && self.intf_rev == EDS_INTF_REV
    }
}

impl Register for CompatRevision {
    const KIND: RegisterKind = RegisterKind::CompatRevision;

    fn decode(raw: u32) -> Self {
        let [minor, major, intf_rev, kernel_compat_ver] = raw.to_le_bytes();
        Self {
            minor,
            major,
            intf_rev,
            kernel_compat_ver,
        }
    }

    fn encode(&self) -> TicResult<u32> {
        Ok(u32::from_le_bytes([
            self.minor,
            self.major,
            self.intf_rev,
            self.kernel_compat_ver,
        ]))
    }
}
