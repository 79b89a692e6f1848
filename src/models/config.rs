//! Store configuration file model (`cookievault.toml`).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub store: StoreSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSection {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Container file name override, relative to the store root.
    #[serde(default)]
    pub store_file: Option<String>,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            version: default_version(),
            store_file: None,
        }
    }
}

fn default_version() -> u32 {
    1
}

pub fn load(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let mut config: ConfigFile =
        toml::from_str(&content).with_context(|| format!("parse config {}", path.display()))?;
    if config.store.version == 0 {
        config.store.version = 1;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_yields_default() {
        let dir = TempDir::new().unwrap();
        let config = load(&dir.path().join("cookievault.toml")).unwrap();
        assert_eq!(config.store.version, 1);
        assert!(config.store.store_file.is_none());
    }

    #[test]
    fn test_load_with_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cookievault.toml");
        fs::write(&path, "[store]\nstore_file = \"session.vault\"\n").unwrap();
        let config = load(&path).unwrap();
        assert_eq!(config.store.store_file.as_deref(), Some("session.vault"));
        assert_eq!(config.store.version, 1);
    }

    #[test]
    fn test_load_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cookievault.toml");
        fs::write(&path, "").unwrap();
        let config = load(&path).unwrap();
        assert_eq!(config.store.version, 1);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cookievault.toml");
        fs::write(&path, "[store\nnot toml").unwrap();
        assert!(load(&path).is_err());
    }
}
