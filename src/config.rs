//! Configuration management for the artifact vault
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (vault.toml)
//! - Environment variables (VAULT__*)
//!
//! ## Example config file (vault.toml):
//! ```toml
//! [catalog]
//! root = "public/artifacts"
//! output = "public/catalog.json"
//! metadata_file = "meta.json"
//! renderable_file = "index.html"
//! output_format = "pretty"
//!
//! [categories]
//! known = ["Engineering", "Product", "MKT", "BD", "HR"]
//!
//! [display]
//! visible_tags = 6
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::builder::BuildOptions;

/// Main configuration for the artifact vault
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Catalog build settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Known categories
    #[serde(default)]
    pub categories: CategoryConfig,

    /// Presentation defaults
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Catalog build configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Directory scanned for artifacts
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Where the compiled catalog is written
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Name of the per-artifact metadata file
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,

    /// Name of the file that must sit next to each metadata file
    #[serde(default = "default_renderable_file")]
    pub renderable_file: String,

    /// URL prefix under which the artifact root is served
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,

    /// Follow symbolic links while scanning
    #[serde(default = "default_true")]
    pub follow_links: bool,

    /// Create the artifact root when it does not exist
    #[serde(default = "default_true")]
    pub create_missing_root: bool,

    /// Output format (pretty or compact)
    #[serde(default)]
    pub output_format: OutputFormat,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

/// Categorical values offered by the category picker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    #[serde(default = "default_categories")]
    pub known: Vec<String>,
}

/// Presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Tags shown before "show all"
    #[serde(default = "default_visible_tags")]
    pub visible_tags: usize,
}

// Default value functions
fn default_root() -> PathBuf {
    PathBuf::from("public/artifacts")
}

fn default_output() -> PathBuf {
    PathBuf::from("public/catalog.json")
}

fn default_metadata_file() -> String {
    "meta.json".to_string()
}

fn default_renderable_file() -> String {
    "index.html".to_string()
}

fn default_public_prefix() -> String {
    "/artifacts".to_string()
}

fn default_true() -> bool {
    true
}

fn default_categories() -> Vec<String> {
    ["Engineering", "Product", "MKT", "BD", "HR"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_visible_tags() -> usize {
    6
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            output: default_output(),
            metadata_file: default_metadata_file(),
            renderable_file: default_renderable_file(),
            public_prefix: default_public_prefix(),
            follow_links: true,
            create_missing_root: true,
            output_format: OutputFormat::Pretty,
        }
    }
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            known: default_categories(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            visible_tags: default_visible_tags(),
        }
    }
}

impl VaultConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, layering an explicit file over the default locations
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["vault.toml", ".vault.toml", "config/vault.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "artifact-vault", "vault") {
            let xdg_config = config_dir.config_dir().join("vault.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // VAULT__CATALOG__ROOT=... etc.
        builder = builder.add_source(
            Environment::with_prefix("VAULT")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Artifact root (resolves relative paths)
    pub fn root_path(&self) -> std::io::Result<PathBuf> {
        resolve(&self.catalog.root)
    }

    /// Catalog output file (resolves relative paths)
    pub fn output_path(&self) -> std::io::Result<PathBuf> {
        resolve(&self.catalog.output)
    }

    /// Whether `function` is one of the configured categories
    pub fn is_known_category(&self, function: &str) -> bool {
        self.categories.known.iter().any(|c| c == function)
    }

    /// Builder options matching this configuration
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            metadata_file: self.catalog.metadata_file.clone(),
            renderable_file: self.catalog.renderable_file.clone(),
            public_prefix: self.catalog.public_prefix.clone(),
            follow_links: self.catalog.follow_links,
            create_missing_root: self.catalog.create_missing_root,
            known_categories: self.categories.known.clone(),
        }
    }
}

fn resolve(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VaultConfig::default();
        assert_eq!(config.catalog.metadata_file, "meta.json");
        assert_eq!(config.catalog.output_format, OutputFormat::Pretty);
        assert_eq!(config.display.visible_tags, 6);
        assert!(config.build_options().follow_links);
        assert!(config.build_options().create_missing_root);
        assert!(config.is_known_category("MKT"));
        assert!(!config.is_known_category("Legal"));
    }

    #[test]
    fn test_serialize_config() {
        let config = VaultConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[catalog]"));
        assert!(toml_str.contains("[display]"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: VaultConfig = toml::from_str(
            r#"
            [catalog]
            root = "site/artifacts"
            output_format = "compact"
            "#,
        )
        .unwrap();
        assert_eq!(config.catalog.root, PathBuf::from("site/artifacts"));
        assert_eq!(config.catalog.output_format, OutputFormat::Compact);
        assert_eq!(config.catalog.renderable_file, "index.html");
        assert!(config.catalog.follow_links);
        assert_eq!(config.categories.known.len(), 5);
    }

    #[test]
    fn test_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[display]\nvisible_tags = 10\n").unwrap();

        let config = VaultConfig::load_from(path.to_str()).unwrap();
        assert_eq!(config.display.visible_tags, 10);
    }

    #[test]
    fn test_relative_paths_resolve() {
        let config = VaultConfig::default();
        assert!(config.root_path().unwrap().is_absolute());
        assert!(config.output_path().unwrap().ends_with("public/catalog.json"));

        let absolute = std::env::temp_dir().join("catalog.json");
        assert_eq!(resolve(&absolute).unwrap(), absolute);
    }
}
