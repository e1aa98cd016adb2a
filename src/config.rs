//! Site configuration
//!
//! Loaded from a TOML file such as:
//!
//! ```toml
//! ssr = true
//! pages_dir = "src/pages"
//! page_extensions = ["tsx", "jsx"]
//! default_layout = "default"
//! ```
//!
//! Every field is optional.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Render pages on the server; copied onto every route
    pub ssr: bool,
    /// Page directory, relative to the site root
    pub pages_dir: PathBuf,
    /// File extensions (without the dot) treated as page files
    pub page_extensions: Vec<String>,
    /// Layout used when a page does not export one
    pub default_layout: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            ssr: true,
            pages_dir: PathBuf::from("src/pages"),
            page_extensions: vec!["tsx".to_string(), "jsx".to_string()],
            default_layout: "default".to_string(),
        }
    }
}

impl SiteConfig {
    /// Read and parse a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn with_ssr(mut self, ssr: bool) -> Self {
        self.ssr = ssr;
        self
    }

    /// Whether `ext` (without the dot) is a page-file extension
    pub fn is_page_extension(&self, ext: &str) -> bool {
        self.page_extensions.iter().any(|e| e == ext)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SiteConfig::from_toml_str("").unwrap();
        assert_eq!(config, SiteConfig::default());
        assert!(config.ssr);
        assert!(config.is_page_extension("tsx"));
        assert!(!config.is_page_extension("ts"));
    }

    #[test]
    fn test_partial_override() {
        let config = SiteConfig::from_toml_str("ssr = false\npage_extensions = [\"html\"]").unwrap();
        assert!(!config.ssr);
        assert_eq!(config.page_extensions, vec!["html"]);
        assert_eq!(config.default_layout, "default");
    }

    #[test]
    fn test_invalid_toml() {
        let err = SiteConfig::from_toml_str("ssr = \"maybe\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pagekit.toml");
        std::fs::write(&path, "default_layout = \"docs\"").unwrap();

        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.default_layout, "docs");

        let missing = SiteConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
