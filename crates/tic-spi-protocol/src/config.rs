//! Codec configuration: host expectations and payload limits.

use serde::{Deserialize, Serialize};

use crate::envelope::WRITE_HEADER_LEN;
use crate::regs::{CompatRevision, DataSize, RegisterBlock};
use crate::regs::offsets::{DATA_WINDOW_LIMIT, DATA_WINDOW_OFFSET};
use crate::error::{TicError, TicResult};
use crate::version::{Compatibility, PROTOCOL_VERSION};

/// Protocol cap on a raw frame (32KB).
pub const MAX_FRAME_SIZE: usize = 32 * 1024;

/// Protocol cap on a feedback payload (16KB).
pub const MAX_FEEDBACK_SIZE: usize = 16 * 1024;

/// Bytes addressable through the data window.
pub const DATA_WINDOW_LEN: usize = (DATA_WINDOW_LIMIT - DATA_WINDOW_OFFSET + 1) as usize;

/// Largest firmware/data load that fits the data window after its header.
pub const MAX_BULK_WRITE_SIZE: usize = DATA_WINDOW_LEN - WRITE_HEADER_LEN;

/// Host-side codec configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Protocol version both sides must carry in their headers.
    pub protocol_version: u32,
    /// Kernel compatibility id expected in raw data headers, if enforced.
    pub kernel_compat_id: Option<u8>,
    /// Largest assembled frame or raw data payload.
    pub max_frame_size: usize,
    /// Largest feedback payload.
    pub max_feedback_size: usize,
    /// Largest firmware or data load carried in a write envelope.
    pub max_bulk_write_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            kernel_compat_id: None,
            max_frame_size: MAX_FRAME_SIZE,
            max_feedback_size: MAX_FEEDBACK_SIZE,
            max_bulk_write_size: MAX_BULK_WRITE_SIZE,
        }
    }
}

impl CodecConfig {
    /// Narrow the limits to what the device declares in its data size
    /// register. A zero field leaves the protocol cap in place; the result
    /// never exceeds the protocol caps.
    pub fn with_data_size(mut self, data_size: DataSize) -> Self {
        let frame = data_size.max_frame_bytes();
        if frame != 0 {
            self.max_frame_size = frame.min(MAX_FRAME_SIZE);
        }
        let feedback = data_size.max_feedback_bytes();
        if feedback != 0 {
            self.max_feedback_size = feedback.min(MAX_FEEDBACK_SIZE);
        }
        self
    }

    /// Expect raw data headers to carry the device's kernel compatibility
    /// version. Replaces any configured id.
    pub fn with_compat_revision(mut self, rev: CompatRevision) -> Self {
        self.kernel_compat_id = Some(rev.kernel_compat_ver);
        self
    }

    /// Apply everything a register block read tells the host: payload
    /// limits and the kernel compatibility id.
    pub fn with_register_block(self, block: &RegisterBlock) -> Self {
        self.with_data_size(block.data_size)
            .with_compat_revision(block.compat_revision)
    }

    /// Expected header fields for compatibility checks.
    pub fn compatibility(&self) -> Compatibility {
        Compatibility {
            protocol_version: self.protocol_version,
            kernel_compat_id: self.kernel_compat_id,
        }
    }

    /// Reject limits that are zero or above the protocol caps.
    pub fn validate(&self) -> TicResult<()> {
        check_limit("max_frame_size", self.max_frame_size, MAX_FRAME_SIZE)?;
        check_limit("max_feedback_size", self.max_feedback_size, MAX_FEEDBACK_SIZE)?;
        check_limit(
            "max_bulk_write_size",
            self.max_bulk_write_size,
            MAX_BULK_WRITE_SIZE,
        )?;
        Ok(())
    }
}

fn check_limit(name: &str, value: usize, cap: usize) -> TicResult<()> {
    if value == 0 || value > cap {
        return Err(TicError::InvalidConfig(format!(
            "{name} must be between 1 and {cap}, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_protocol_caps() {
        let config = CodecConfig::default();
        assert_eq!(config.max_frame_size, 32 * 1024);
        assert_eq!(config.max_feedback_size, 16 * 1024);
        assert_eq!(config.max_bulk_write_size, 0x1F000 - 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_data_size_narrows() {
        let config = CodecConfig::default().with_data_size(DataSize {
            max_frame_units: 64,
            max_feedback_units: 16,
        });
        assert_eq!(config.max_frame_size, 4096);
        assert_eq!(config.max_feedback_size, 1024);
    }

    #[test]
    fn test_with_data_size_never_exceeds_caps() {
        let config = CodecConfig::default().with_data_size(DataSize {
            max_frame_units: 0xFFF,
            max_feedback_units: 0,
        });
        assert_eq!(config.max_frame_size, MAX_FRAME_SIZE);
        assert_eq!(config.max_feedback_size, MAX_FEEDBACK_SIZE);
    }

    #[test]
    fn test_with_register_block_sets_limits_and_compat_id() {
        let block = RegisterBlock {
            data_size: DataSize {
                max_frame_units: 64,
                max_feedback_units: 0,
            },
            compat_revision: CompatRevision {
                kernel_compat_ver: 9,
                ..CompatRevision::host()
            },
            ..RegisterBlock::default()
        };
        let config = CodecConfig {
            kernel_compat_id: Some(1),
            ..CodecConfig::default()
        }
        .with_register_block(&block);
        assert_eq!(config.kernel_compat_id, Some(9));
        assert_eq!(config.max_frame_size, 4096);
        assert_eq!(config.max_feedback_size, MAX_FEEDBACK_SIZE);

        let mismatched = crate::envelope::RawDataHeader {
            kernel_compat_id: 8,
            ..Default::default()
        };
        assert!(matches!(
            config.compatibility().check_raw_data(&mismatched),
            Err(TicError::VersionMismatch {
                field: "kernel_compat_id",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_and_over_cap() {
        let zero = CodecConfig {
            max_frame_size: 0,
            ..CodecConfig::default()
        };
        assert!(matches!(zero.validate(), Err(TicError::InvalidConfig(_))));

        let over = CodecConfig {
            max_feedback_size: MAX_FEEDBACK_SIZE + 1,
            ..CodecConfig::default()
        };
        assert!(over.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial_json() -> Result<(), Box<dyn std::error::Error>> {
        let config: CodecConfig =
            serde_json::from_str(r#"{ "kernel_compat_id": 3, "max_feedback_size": 4096 }"#)?;
        assert_eq!(config.kernel_compat_id, Some(3));
        assert_eq!(config.max_feedback_size, 4096);
        assert_eq!(config.max_frame_size, MAX_FRAME_SIZE);
        assert_eq!(config.protocol_version, PROTOCOL_VERSION);
        Ok(())
    }
}
