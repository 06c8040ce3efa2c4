//! Configuration file management.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Complete daemon configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Collaboration settings.
    #[serde(default)]
    pub collabs: CollabsConfig,
    /// Curation settings.
    #[serde(default)]
    pub curation: CurationConfig,
    /// Advanced settings.
    #[serde(default)]
    pub advanced: AdvancedConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory. Empty = platform default.
    #[serde(default)]
    pub data_dir: String,
}

/// Collaboration configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollabsConfig {
    /// Location assigned to local collaborations when the creator's profile
    /// has no city. Must stay stable: it feeds a public grouping.
    #[serde(default = "default_location")]
    pub default_location: String,
}

/// Curation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurationConfig {
    /// Upper bound on the size of a random selection draw.
    #[serde(default = "default_random_selection_cap")]
    pub random_selection_cap: usize,
}

/// Advanced configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvancedConfig {
    /// Log level: "debug" | "info" | "warn" | "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Default value functions

fn default_location() -> String {
    "Community Hall".to_string()
}

fn default_random_selection_cap() -> usize {
    verso_types::DEFAULT_RANDOM_SELECTION_CAP
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CollabsConfig {
    fn default() -> Self {
        Self {
            default_location: default_location(),
        }
    }
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            random_selection_cap: default_random_selection_cap(),
        }
    }
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl DaemonConfig {
    /// Load configuration from the default config file location.
    ///
    /// Falls back to defaults if file does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: DaemonConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> PathBuf {
        if self.storage.data_dir.is_empty() {
            Self::default_data_dir()
        } else {
            PathBuf::from(&self.storage.data_dir)
        }
    }

    /// Get the config file path.
    fn config_path() -> PathBuf {
        // Check env var override first
        if let Ok(dir) = std::env::var("VERSO_DATA_DIR") {
            return PathBuf::from(dir).join("config.toml");
        }
        Self::default_data_dir().join("config.toml")
    }

    /// Platform-specific default data directory.
    fn default_data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("VERSO_DATA_DIR") {
            return PathBuf::from(dir);
        }
        #[cfg(target_os = "macos")]
        {
            dirs_fallback("Library/Application Support/Verso")
        }
        #[cfg(target_os = "linux")]
        {
            dirs_fallback(".verso")
        }
        #[cfg(target_os = "windows")]
        {
            dirs_fallback("Verso")
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            dirs_fallback(".verso")
        }
    }
}

/// Fallback home directory resolution.
fn dirs_fallback(subpath: &str) -> PathBuf {
    std::env::var("HOME")
        .map(|h| PathBuf::from(h).join(subpath))
        .unwrap_or_else(|_| PathBuf::from("/tmp/verso"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DaemonConfig::default();
        assert!(config.storage.data_dir.is_empty());
        assert_eq!(config.collabs.default_location, "Community Hall");
        assert_eq!(config.curation.random_selection_cap, 10);
        assert_eq!(config.advanced.log_level, "info");
    }

    #[test]
    fn test_config_serialization() {
        let config = DaemonConfig::default();
        let toml_str = toml::to_string(&config).expect("serialize");
        let _parsed: DaemonConfig = toml::from_str(&toml_str).expect("parse");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: DaemonConfig = toml::from_str(
            r#"
            [collabs]
            default_location = "Town Square"
            "#,
        )
        .expect("parse");
        assert_eq!(config.collabs.default_location, "Town Square");
        assert_eq!(config.curation.random_selection_cap, 10);
    }
}
