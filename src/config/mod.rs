// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for Photofolio

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    /// Where the catalog and the image files live
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Grid settings
    #[serde(default)]
    pub gallery: GalleryConfig,

    /// Embedded metadata extraction
    #[serde(default)]
    pub metadata: MetadataConfig,

    /// Web UI settings
    #[serde(default)]
    pub web: WebConfig,

    /// Display preference storage
    #[serde(default)]
    pub preferences: PreferencesConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CatalogConfig {
    /// Catalog JSON: a file path or an http(s) URL
    #[serde(default = "default_catalog_source")]
    pub source: String,
    /// Directory or http(s) base URL holding the image files
    #[serde(default = "default_photo_root")]
    pub photo_root: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GalleryConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MetadataConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Per-photo budget for fetching and reading the image
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WebConfig {
    #[serde(default = "default_web_host")]
    pub host: String,
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// Reload the catalog when the file changes on disk
    #[serde(default = "default_true")]
    pub watch_catalog: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PreferencesConfig {
    #[serde(default = "default_preferences_path")]
    pub path: String,
}

// Default value functions
fn default_catalog_source() -> String { "data/photos.json".to_string() }
fn default_photo_root() -> String { "assets/photos".to_string() }
fn default_page_size() -> usize { 6 }
fn default_true() -> bool { true }
fn default_timeout() -> u64 { 30 }
fn default_web_host() -> String { "127.0.0.1".to_string() }
fn default_web_port() -> u16 { 8080 }
fn default_preferences_path() -> String { "preferences.json".to_string() }

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: default_catalog_source(),
            photo_root: default_photo_root(),
        }
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
            watch_catalog: true,
        }
    }
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            path: default_preferences_path(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| crate::GalleryError::Config(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the gallery cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        if self.gallery.page_size == 0 {
            return Err(crate::GalleryError::Config("gallery.page_size must be at least 1".to_string()));
        }
        if self.catalog.source.trim().is_empty() {
            return Err(crate::GalleryError::Config("catalog.source must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config.gallery.page_size, 6);
        assert_eq!(config.catalog.source, "data/photos.json");
        assert_eq!(config.web.port, 8080);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "gallery": { "page_size": 9 }, "web": { "port": 9000 } }"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.gallery.page_size, 9);
        assert_eq!(config.web.port, 9000);
        assert_eq!(config.web.host, "127.0.0.1");
        assert!(config.metadata.enabled);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "gallery": { "page_size": 0 } }"#).unwrap();
        assert!(AppConfig::load(&path).is_err());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = AppConfig::default();
        config.catalog.photo_root = "https://cdn.example.com/photos".to_string();
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.catalog.photo_root, "https://cdn.example.com/photos");
    }
}
