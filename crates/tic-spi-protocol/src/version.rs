//! Host/device compatibility checks.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::envelope::{FeedbackHeader, RawDataHeader};
use crate::error::{TicError, TicResult};
use crate::regs::CompatRevision;

/// Protocol version carried in raw data and feedback headers.
pub const PROTOCOL_VERSION: u32 = 0;

/// Header fields the host expects the device to agree on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compatibility {
    pub protocol_version: u32,
    /// Expected kernel compatibility id. `None` until the device's
    /// compatibility revision register has been read.
    pub kernel_compat_id: Option<u8>,
}

impl Default for Compatibility {
    fn default() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            kernel_compat_id: None,
        }
    }
}

impl Compatibility {
    /// Expectations taken from the device's compatibility revision
    /// register; raw data headers must echo its kernel compatibility version.
    pub fn from_compat_revision(rev: &CompatRevision) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            kernel_compat_id: Some(rev.kernel_compat_ver),
        }
    }

    /// Check a raw data header read from the device.
    pub fn check_raw_data(&self, header: &RawDataHeader) -> TicResult<()> {
        self.check_protocol(header.protocol_version)?;
        if let Some(expected) = self.kernel_compat_id
            && expected != header.kernel_compat_id
        {
            warn!(
                expected,
                actual = header.kernel_compat_id,
                buffer_id = header.buffer_id,
                "kernel compatibility id mismatch"
            );
            return Err(TicError::VersionMismatch {
                field: "kernel_compat_id",
                expected: u32::from(expected),
                actual: u32::from(header.kernel_compat_id),
            });
        }
        Ok(())
    }

    /// Check a feedback header before it is written to the device.
    pub fn check_feedback(&self, header: &FeedbackHeader) -> TicResult<()> {
        self.check_protocol(header.protocol_version)
    }

    fn check_protocol(&self, actual: u32) -> TicResult<()> {
        if actual != self.protocol_version {
            warn!(
                expected = self.protocol_version,
                actual, "protocol version mismatch"
            );
            return Err(TicError::VersionMismatch {
                field: "protocol_version",
                expected: self.protocol_version,
                actual,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_raw_header_passes() {
        let header = RawDataHeader::default();
        assert!(Compatibility::default().check_raw_data(&header).is_ok());
    }

    #[test]
    fn test_protocol_version_mismatch() {
        let header = RawDataHeader {
            protocol_version: 2,
            ..RawDataHeader::default()
        };
        assert_eq!(
            Compatibility::default().check_raw_data(&header),
            Err(TicError::VersionMismatch {
                field: "protocol_version",
                expected: 0,
                actual: 2,
            })
        );
    }

    #[test]
    fn test_kernel_compat_id_enforced_when_set() {
        let header = RawDataHeader {
            kernel_compat_id: 4,
            ..RawDataHeader::default()
        };
        let lenient = Compatibility::default();
        assert!(lenient.check_raw_data(&header).is_ok());

        let strict = Compatibility {
            kernel_compat_id: Some(5),
            ..Compatibility::default()
        };
        assert!(matches!(
            strict.check_raw_data(&header),
            Err(TicError::VersionMismatch {
                field: "kernel_compat_id",
                ..
            })
        ));
    }

    #[test]
    fn test_compat_revision_enforces_kernel_compat_id() {
        let rev = CompatRevision {
            kernel_compat_ver: 0x12,
            ..CompatRevision::host()
        };
        let compat = Compatibility::from_compat_revision(&rev);
        assert_eq!(compat.kernel_compat_id, Some(0x12));

        let matching = RawDataHeader {
            kernel_compat_id: 0x12,
            ..RawDataHeader::default()
        };
        assert_eq!(compat.check_raw_data(&matching), Ok(()));

        let stale = RawDataHeader {
            kernel_compat_id: 0x7F,
            ..RawDataHeader::default()
        };
        assert_eq!(
            compat.check_raw_data(&stale),
            Err(TicError::VersionMismatch {
                field: "kernel_compat_id",
                expected: 0x12,
                actual: 0x7F,
            })
        );
    }

    #[test]
    fn test_feedback_protocol_checked() {
        let header = FeedbackHeader {
            protocol_version: 1,
            ..FeedbackHeader::default()
        };
        assert!(Compatibility::default().check_feedback(&header).is_err());
    }
}
