//! Configuration loading.
//!
//! Settings live in a YAML file, by default `~/.config/freshen/config.yml`.
//! A catalog is configured either by `catalog.url` (synchronized with git
//! before each run) or `catalog.path` (used as-is, no sync). At least one of
//! the two must be set.

use crate::error::{FreshenError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Catalog source settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogSettings {
    /// Git URL of the catalog repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Branch or tag to track. Defaults to the remote HEAD.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,

    /// Local catalog directory. Takes precedence over `url` and skips sync.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Top-level settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub catalog: CatalogSettings,
}

impl Settings {
    /// Load settings from a specific file. A missing file yields defaults,
    /// which later fail the catalog-source check with its dedicated exit code.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(settings)
    }

    /// Load settings from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&default_config_path())
    }

    /// The catalog directory entries are loaded from.
    ///
    /// A configured local path wins; otherwise the managed clone location
    /// under the user data directory.
    pub fn catalog_dir(&self) -> PathBuf {
        match &self.catalog.path {
            Some(path) => path.clone(),
            None => default_catalog_dir(),
        }
    }

    /// Whether the catalog needs a git sync before use.
    pub fn needs_sync(&self) -> bool {
        self.catalog.path.is_none() && self.catalog.url.is_some()
    }

    /// Fail unless a catalog source is configured.
    pub fn require_catalog_source(&self, config_path: &Path) -> Result<()> {
        if self.catalog.url.is_none() && self.catalog.path.is_none() {
            return Err(FreshenError::CatalogSourceMissing {
                config_path: config_path.to_path_buf(),
            });
        }
        Ok(())
    }
}

/// Default config file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("freshen")
        .join("config.yml")
}

/// Where the managed catalog clone lives when no local path is configured.
pub fn default_catalog_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("freshen")
        .join("catalog")
}
