//! Admin configuration.
//!
//! A small sectioned settings file supplies the process-wide display
//! defaults: the admin timezone and the admin display format. It lives at
//! `<config_dir>/floatstamp/settings.toml`; when the file is absent a
//! bundled default is written there on first use. The loaded value is
//! immutable and cached for the process lifetime behind [`Settings::shared`];
//! components still take `&Settings` explicitly so tests and embedders can
//! substitute their own.

use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StampError};

/// Bundled default admin timezone.
pub const DEFAULT_ADMIN_TIMEZONE: &str = "America/Chicago";

/// Bundled default admin display format.
pub const DEFAULT_ADMIN_DATE_FMT: &str = "%a %m/%d/%Y %I:%M:%S %p";

/// Top-level settings, one `[admin]` section. Unknown keys are ignored and
/// missing keys fall back to the bundled defaults, so partial files merge.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub admin: AdminSettings,
}

/// The `[admin]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdminSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_fmt: Option<String>,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            timezone: Some(DEFAULT_ADMIN_TIMEZONE.to_string()),
            date_fmt: Some(DEFAULT_ADMIN_DATE_FMT.to_string()),
        }
    }
}

impl Settings {
    /// Load from the default path, writing the bundled default file first if
    /// none exists yet.
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            Self::write_default(&path)?;
        }
        Self::load_from(&path)
    }

    /// Load from an explicit file path.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| StampError::Config(format!("failed to read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| StampError::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// The process-wide settings, loaded once and cached. A failed load logs
    /// a warning and falls back to the bundled defaults.
    pub fn shared() -> &'static Settings {
        static CELL: OnceCell<Settings> = OnceCell::new();
        CELL.get_or_init(|| {
            Settings::load().unwrap_or_else(|err| {
                log::warn!("falling back to default settings: {err}");
                Settings::default()
            })
        })
    }

    /// The per-user configuration directory.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("floatstamp"))
            .ok_or_else(|| StampError::Config("could not determine config directory".to_string()))
    }

    /// The default settings file path.
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("settings.toml"))
    }

    /// Write the bundled default settings file to `path`, creating parent
    /// directories as needed.
    pub fn write_default<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        let body = toml::to_string_pretty(&Settings::default())
            .map_err(|e| StampError::Config(format!("failed to serialize defaults: {e}")))?;
        let content = format!("# floatstamp settings\n\n{body}");
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StampError::Config(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
        std::fs::write(path, content)
            .map_err(|e| StampError::Config(format!("failed to write {}: {e}", path.display())))?;
        log::debug!("wrote default settings to {}", path.display());
        Ok(())
    }

    /// The admin timezone, with empty strings treated as unset.
    pub fn admin_timezone(&self) -> Option<&str> {
        self.admin.timezone.as_deref().filter(|s| !s.is_empty())
    }

    /// The admin display format, with empty strings treated as unset.
    pub fn admin_date_fmt(&self) -> Option<&str> {
        self.admin.date_fmt.as_deref().filter(|s| !s.is_empty())
    }

    /// String-keyed accessor for the recognized settings.
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "admin_timezone" => self.admin_timezone(),
            "admin_date_fmt" => self.admin_date_fmt(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.admin_timezone(), Some("America/Chicago"));
        assert_eq!(settings.admin_date_fmt(), Some("%a %m/%d/%Y %I:%M:%S %p"));
    }

    #[test]
    fn test_get_accessor() {
        let settings = Settings::default();
        assert_eq!(settings.get("admin_timezone"), Some("America/Chicago"));
        assert_eq!(
            settings.get("admin_date_fmt"),
            Some("%a %m/%d/%Y %I:%M:%S %p")
        );
        assert_eq!(settings.get("nonexistent_setting"), None);
    }

    #[test]
    fn test_partial_file_merges_with_defaults() {
        let partial = r#"
[admin]
timezone = "Europe/London"
"#;
        let settings: Settings = toml::from_str(partial).unwrap();
        assert_eq!(settings.admin_timezone(), Some("Europe/London"));
        assert_eq!(settings.admin_date_fmt(), Some(DEFAULT_ADMIN_DATE_FMT));
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_empty_string_treated_as_unset() {
        let settings: Settings = toml::from_str("[admin]\ntimezone = \"\"\n").unwrap();
        assert_eq!(settings.admin_timezone(), None);
    }

    #[test]
    fn test_serialization_contains_defaults() {
        let body = toml::to_string_pretty(&Settings::default()).unwrap();
        assert!(body.contains("timezone = \"America/Chicago\""));
        assert!(body.contains("date_fmt"));
    }

    #[test]
    fn test_write_default_then_load_round_trips() {
        let dir = std::env::temp_dir().join(format!("floatstamp-test-{}", std::process::id()));
        let path = dir.join("settings.toml");
        Settings::write_default(&path).unwrap();
        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, Settings::default());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_from_missing_file_is_config_error() {
        let err = Settings::load_from("/nonexistent/floatstamp/settings.toml").unwrap_err();
        assert!(err.to_string().contains("Config error"), "got: {err}");
    }
}
