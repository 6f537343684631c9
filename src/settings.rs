//! Persisted settings for the station map tools.
//! Stored in the platform-specific config directory via `directories::ProjectDirs`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application settings that can be saved and loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Directory holding classes.json and markers.json (empty = platform data dir)
    pub data_dir: String,
    /// Default tracing filter when no environment filter is set
    pub log_filter: String,
    /// Pretty-print JSON output
    pub pretty_json: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            data_dir: String::new(),
            log_filter: "info".to_string(),
            pretty_json: true,
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("org", "firestation", "station-map")
}

impl AppSettings {
    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path.
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.json"))
    }

    /// Load settings from the config file.
    pub fn load() -> Self {
        Self::settings_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load settings from `path`, falling back to defaults when it is
    /// missing or malformed.
    pub fn load_from(path: &Path) -> Self {
        let defaults = Self::default();

        let mut loaded: Self = fs::read_to_string(path)
            .ok()
            .and_then(|content| Self::from_json(&content))
            .unwrap_or_default();

        // Backfill blank fields from older config files
        if loaded.log_filter.trim().is_empty() {
            loaded.log_filter = defaults.log_filter;
        }

        loaded
    }

    /// Parse settings JSON, ignoring malformed content.
    pub fn from_json(content: &str) -> Option<Self> {
        serde_json::from_str(content).ok()
    }

    /// Save settings to the config file.
    pub fn save(&self) -> Result<PathBuf, String> {
        let path = Self::settings_path().ok_or("Cannot determine config directory")?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save settings to `path`, creating its directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        fs::write(path, content).map_err(|e| format!("Failed to write settings file: {}", e))?;

        Ok(())
    }

    /// Set one field by its command line key.
    ///
    /// Keys: `data-dir`, `log-filter`, `pretty-json` (`true`/`false`).
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "data-dir" => self.data_dir = value.trim().to_string(),
            "log-filter" => {
                let value = value.trim();
                self.log_filter = if value.is_empty() {
                    Self::default().log_filter
                } else {
                    value.to_string()
                };
            }
            "pretty-json" => {
                self.pretty_json = match value.trim().to_lowercase().as_str() {
                    "true" | "1" | "yes" => true,
                    "false" | "0" | "no" => false,
                    other => return Err(format!("Expected true or false, got '{}'", other)),
                }
            }
            other => return Err(format!("Unknown setting: {}", other)),
        }
        Ok(())
    }

    /// Resolve the marker data directory.
    ///
    /// `override_dir` (e.g. from `STATION_MAP_DATA_DIR`) wins over the saved
    /// setting, which wins over the platform data directory.
    pub fn resolve_data_dir(&self, override_dir: Option<&str>) -> Option<PathBuf> {
        match override_dir.map(str::trim).filter(|d| !d.is_empty()) {
            Some(dir) => Some(PathBuf::from(dir)),
            None if !self.data_dir.trim().is_empty() => Some(PathBuf::from(self.data_dir.trim())),
            None => project_dirs().map(|dirs| dirs.data_dir().to_path_buf()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = AppSettings::default();
        assert!(settings.data_dir.is_empty());
        assert_eq!(settings.log_filter, "info");
        assert!(settings.pretty_json);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = AppSettings::from_json(r#"{"data_dir": "/srv/map"}"#).unwrap();
        assert_eq!(settings.data_dir, "/srv/map");
        assert_eq!(settings.log_filter, "info");
        assert!(AppSettings::from_json("not json").is_none());
    }

    #[test]
    fn test_set_known_keys() {
        let mut settings = AppSettings::default();
        settings.set("data-dir", " /srv/map ").unwrap();
        settings.set("pretty-json", "false").unwrap();
        settings.set("log-filter", "station_map=debug").unwrap();
        assert_eq!(settings.data_dir, "/srv/map");
        assert!(!settings.pretty_json);
        assert_eq!(settings.log_filter, "station_map=debug");

        settings.set("log-filter", "").unwrap();
        assert_eq!(settings.log_filter, "info");

        assert!(settings.set("pretty-json", "maybe").is_err());
        assert!(settings.set("colour", "red").is_err());
    }

    #[test]
    fn test_save_to_and_load_from() {
        let dir = std::env::temp_dir().join(format!("station_map_settings_{}", uuid::Uuid::new_v4()));
        let path = dir.join("settings.json");

        let mut settings = AppSettings::default();
        settings.set("data-dir", "/var/lib/station-map").unwrap();
        settings.save_to(&path).unwrap();

        assert_eq!(AppSettings::load_from(&path), settings);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_from_missing_or_blank_file() {
        let dir = std::env::temp_dir().join(format!("station_map_settings_{}", uuid::Uuid::new_v4()));
        let path = dir.join("settings.json");
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());

        fs::create_dir_all(&dir).unwrap();
        fs::write(&path, r#"{"log_filter": "  "}"#).unwrap();
        assert_eq!(AppSettings::load_from(&path).log_filter, "info");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_resolve_data_dir_precedence() {
        let settings = AppSettings {
            data_dir: "/srv/map".to_string(),
            ..Default::default()
        };
        assert_eq!(
            settings.resolve_data_dir(Some("/tmp/override")),
            Some(PathBuf::from("/tmp/override"))
        );
        assert_eq!(settings.resolve_data_dir(Some("  ")), Some(PathBuf::from("/srv/map")));
        assert_eq!(settings.resolve_data_dir(None), Some(PathBuf::from("/srv/map")));
    }
}
