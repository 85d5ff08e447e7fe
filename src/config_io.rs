use std::path::Path;

use restricted_fs_core::policy::EngineConfig;
use restricted_fs_core::{Error, Result};

const MAX_CONFIG_BYTES: usize = 1024 * 1024;

/// Load and validate an [`EngineConfig`] from a TOML or JSON file, picked
/// by extension; extensionless files are read as TOML.
pub fn load_config(path: impl AsRef<Path>) -> Result<EngineConfig> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        path: path.display().to_string(),
        source,
    })?;
    if bytes.len() > MAX_CONFIG_BYTES {
        return Err(Error::InvalidConfig(format!(
            "config file is too large ({} bytes; max {} bytes)",
            bytes.len(),
            MAX_CONFIG_BYTES
        )));
    }
    let raw = String::from_utf8(bytes)
        .map_err(|err| Error::InvalidConfig(format!("config file is not valid UTF-8: {err}")))?;

    let ext = path.extension().and_then(|ext| ext.to_str());
    let config: EngineConfig = match ext {
        Some("json") => serde_json::from_str(&raw)
            .map_err(|err| Error::InvalidConfig(format!("invalid JSON config: {err}")))?,
        Some("toml") | None => toml::from_str(&raw)
            .map_err(|err| Error::InvalidConfig(format!("invalid TOML config: {err}")))?,
        Some(other) => {
            return Err(Error::InvalidConfig(format!(
                "unsupported config extension: {other}"
            )));
        }
    };
    config.validate()?;
    Ok(config)
}
