//! Configuration management
//!
//! settings.json in the data directory:
//! ```json
//! {
//!   "server": { "bindAddress": "127.0.0.1:8080" },
//!   "database": { "file": "bankdesk.duckdb" }
//! }
//! ```
//! Keys this crate does not know about are kept when saving.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_DATABASE_FILE: &str = "bankdesk.duckdb";

/// Overrides the data directory
pub const DIR_ENV: &str = "BANKDESK_DIR";
/// Overrides `server.bindAddress`
pub const BIND_ADDRESS_ENV: &str = "BANKDESK_BIND_ADDRESS";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    server: ServerSettings,
    #[serde(default)]
    database: DatabaseSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bind_address: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatabaseSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Bankdesk configuration (resolved view of settings.json)
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub database_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            database_file: DEFAULT_DATABASE_FILE.to_string(),
        }
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// A missing settings.json yields defaults; a malformed one is an error.
    /// `BANKDESK_BIND_ADDRESS` wins over the file.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(data_dir)?;
        let defaults = Self::default();

        let bind_address = std::env::var(BIND_ADDRESS_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or(raw.server.bind_address)
            .unwrap_or(defaults.bind_address);

        Ok(Self {
            bind_address,
            database_file: raw.database.file.unwrap_or(defaults.database_file),
        })
    }

    /// Save config to the data directory, preserving unmanaged keys
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let mut settings = read_settings(data_dir)?;
        settings.server.bind_address = Some(self.bind_address.clone());
        settings.database.file = Some(self.database_file.clone());

        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("creating {}", data_dir.display()))?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(data_dir.join("settings.json"), content)?;
        Ok(())
    }

    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.database_file)
    }
}

fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
    let settings_path = data_dir.join("settings.json");
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)
        .with_context(|| format!("reading {}", settings_path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parsing {}", settings_path.display()))
}

/// Resolve the data directory: `BANKDESK_DIR`, else `~/.bankdesk`
pub fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".bankdesk")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_settings_file() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.database_file, DEFAULT_DATABASE_FILE);
        assert_eq!(
            config.database_path(dir.path()),
            dir.path().join("bankdesk.duckdb")
        );
    }

    #[test]
    fn test_load_reads_database_file() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"database": {"file": "branch.duckdb"}}"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.database_file, "branch.duckdb");
    }

    #[test]
    fn test_malformed_settings_is_an_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }

    #[test]
    fn test_save_preserves_unknown_keys() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"theme": "dark", "server": {"bindAddress": "0.0.0.0:9000", "workers": 4}}"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        config.database_file = "other.duckdb".to_string();
        config.save(dir.path()).unwrap();

        let raw: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("settings.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(raw["theme"], "dark");
        assert_eq!(raw["server"]["workers"], 4);
        assert_eq!(raw["database"]["file"], "other.duckdb");
    }
}
