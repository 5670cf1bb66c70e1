//! Reading and writing run configuration files.
//!
//! The format follows the file extension: `.json` or `.toml`.

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult, Validate};
use crate::run::RunConfig;

/// On-disk configuration format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON, camelCase keys.
    Json,
    /// TOML, camelCase keys.
    Toml,
}

impl ConfigFormat {
    /// Picks the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Parses a run configuration without validating it.
pub fn parse_run_config(text: &str, format: ConfigFormat) -> ConfigResult<RunConfig> {
    match format {
        ConfigFormat::Json => Ok(serde_json::from_str(text)?),
        ConfigFormat::Toml => Ok(toml::from_str(text)?),
    }
}

/// Reads, parses and validates a run configuration file.
pub fn load_run_config(path: impl AsRef<Path>) -> ConfigResult<RunConfig> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let text = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;

    let config = parse_run_config(&text, format)?;
    config.validate_or_error()?;

    log::debug!("loaded run '{}' from {}", config.name, path.display());
    Ok(config)
}

/// Writes a run configuration in the format named by the extension.
pub fn save_run_config(config: &RunConfig, path: impl AsRef<Path>) -> ConfigResult<()> {
    let path = path.as_ref();
    let text = match ConfigFormat::from_path(path)? {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
    };

    fs::write(path, text).map_err(|e| ConfigError::io(path, e))
}
