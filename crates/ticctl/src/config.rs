//! Codec configuration loading.

use std::fs;
use std::path::Path;

use tic_spi_protocol::{CodecConfig, RegisterBlock};
use tracing::debug;

use crate::error::CliError;

/// Load a [`CodecConfig`] from a YAML or JSON file, or fall back to the
/// protocol defaults when no file is given.
pub fn load(path: Option<&Path>) -> Result<CodecConfig, CliError> {
    let Some(path) = path else {
        return Ok(CodecConfig::default());
    };

    let text = fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let config: CodecConfig = match extension.as_deref() {
        Some("yaml" | "yml") => serde_yaml::from_str(&text)
            .map_err(|e| CliError::InvalidConfiguration(format!("{}: {e}", path.display())))?,
        Some("json") => serde_json::from_str(&text)
            .map_err(|e| CliError::InvalidConfiguration(format!("{}: {e}", path.display())))?,
        _ => {
            return Err(CliError::InvalidConfiguration(format!(
                "{}: expected a .yaml, .yml or .json file",
                path.display()
            )));
        }
    };
    config.validate()?;
    debug!(?config, "loaded codec configuration");
    Ok(config)
}

/// Narrow `config` with a captured 64-byte register block: limits come from
/// its data size register, the kernel compatibility id from its
/// compatibility revision register.
pub fn apply_register_block(config: CodecConfig, path: &Path) -> Result<CodecConfig, CliError> {
    let bytes = fs::read(path)?;
    let block = RegisterBlock::parse(&bytes)?;
    let config = config.with_register_block(&block);
    debug!(
        kernel_compat_id = ?config.kernel_compat_id,
        max_frame_size = config.max_frame_size,
        "applied register block"
    );
    Ok(config)
}
