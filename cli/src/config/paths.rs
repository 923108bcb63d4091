//! Platform-specific path utilities for bufete.

use std::path::PathBuf;

use crate::error::{BufeteError, Result};

/// Get the configuration directory for bufete.
///
/// - Linux: `~/.config/bufete`
/// - macOS: `~/Library/Application Support/bufete`
/// - Windows: `%APPDATA%\bufete`
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| BufeteError::Config("Cannot determine config directory".to_string()))?;
    Ok(base.join("bufete"))
}

/// Get the data directory for bufete.
///
/// - Linux: `~/.local/share/bufete`
/// - macOS: `~/Library/Application Support/bufete`
/// - Windows: `%APPDATA%\bufete`
pub fn data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir()
        .ok_or_else(|| BufeteError::Config("Cannot determine data directory".to_string()))?;
    Ok(base.join("bufete"))
}

/// Get the main configuration file path.
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Get the preferences file path.
pub fn preferences_file() -> Result<PathBuf> {
    Ok(data_dir()?.join("preferences.json"))
}
