//! Dump settings
//!
//! Non-sensitive run configuration: where to write, what to put in the spec
//! `info` block, and whether schemas are externalized into components.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;

/// Settings for one generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DumpSettings {
    /// Output root directory the document tree is written under
    pub out_root: PathBuf,
    /// Spec info title
    pub title: String,
    /// Spec info description
    pub description: String,
    /// Spec info version
    pub version: String,
    /// Server URLs for the spec `servers` block
    pub server_urls: Vec<String>,
    /// Write schemas into `components/schemas` and `$ref` them instead of inlining
    pub externalize_schemas: bool,
}

impl Default for DumpSettings {
    fn default() -> Self {
        Self {
            out_root: PathBuf::from("oas"),
            title: "Captured API".to_string(),
            description: "OpenAPI spec generated from captured traffic".to_string(),
            version: "0.0.1".to_string(),
            server_urls: Vec::new(),
            externalize_schemas: false,
        }
    }
}

impl DumpSettings {
    /// Load settings from a JSON file, falling back to defaults when absent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("no settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&contents)?;
        debug!("loaded settings from {}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = DumpSettings::default();
        assert_eq!(settings.version, "0.0.1");
        assert!(!settings.externalize_schemas);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let settings = DumpSettings::load(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings.title, "Captured API");
    }

    #[test]
    fn test_load_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let mut settings = DumpSettings::default();
        settings.title = "test api".to_string();
        settings.externalize_schemas = true;
        std::fs::write(&path, serde_json::to_string_pretty(&settings).unwrap()).unwrap();

        let loaded = DumpSettings::load(&path).unwrap();
        assert_eq!(loaded.title, "test api");
        assert!(loaded.externalize_schemas);
    }
}
