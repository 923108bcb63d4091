//! Configuration management for bufete.

pub mod paths;
pub mod preferences;
pub mod settings;

pub use paths::config_file;
pub use preferences::{Preferences, Theme};
pub use settings::{ApiConfig, BufeteConfig};

use std::path::Path;

use crate::error::Result;

/// Load configuration from the default config file.
///
/// If the config file doesn't exist, returns default configuration.
pub fn load_config() -> Result<BufeteConfig> {
    let path = config_file()?;
    load_config_from(&path)
}

/// Load configuration from a specific path.
///
/// If the file doesn't exist, returns default configuration.
pub fn load_config_from(path: &Path) -> Result<BufeteConfig> {
    if !path.exists() {
        return Ok(BufeteConfig::default().with_env_overrides());
    }

    let contents = std::fs::read_to_string(path)?;
    let config: BufeteConfig = toml::from_str(&contents)?;

    Ok(config.with_env_overrides())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BufeteError;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_config_from(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn invalid_toml_is_a_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, BufeteError::ConfigRead(_)));
    }
}
