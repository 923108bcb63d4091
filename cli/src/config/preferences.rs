//! Local user preferences.
//!
//! Stored as JSON in the data directory under two documented keys:
//! - `theme`: `"light"`, `"dark"` or `"system"`
//! - `remember_email`: the email to prefill on login, if the user opted in
//!
//! A missing or corrupted file yields the defaults; reading never fails on bad
//! content.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::paths::preferences_file;
use crate::error::Result;

/// Color theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
            Self::System => write!(f, "system"),
        }
    }
}

/// Persisted preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default, deserialize_with = "theme_or_default")]
    pub theme: Theme,

    #[serde(default, rename = "remember_email")]
    pub remembered_email: Option<String>,
}

/// Unknown theme values fall back to the default instead of rejecting the file.
fn theme_or_default<'de, D>(deserializer: D) -> std::result::Result<Theme, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

impl Preferences {
    /// Load preferences from the default location.
    pub fn load() -> Result<Self> {
        Ok(Self::load_from(&preferences_file()?))
    }

    /// Load preferences from a specific path, degrading to defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            return Self::default();
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), "Ignoring unreadable preferences: {e}");
            Self::default()
        })
    }

    /// Save preferences to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&preferences_file()?)
    }

    /// Save preferences to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Remember (or forget, with `None`) the login email.
    pub fn remember_email(&mut self, email: Option<&str>) {
        self.remembered_email = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(ToString::to_string);
    }
}

/// Path of the preferences file, for display.
pub fn location() -> Result<PathBuf> {
    preferences_file()
}
