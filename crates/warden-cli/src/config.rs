//! Configuration file for the `warden` binary.
//!
//! ```toml
//! content_root = "content"
//! log_level = "warn"
//! templates = ["post", "blog"]
//!
//! [access]
//! field_name = "access"
//! home_page = "home"
//! error_page = "error"
//! redirect = "/login"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use warden_core::{AccessConfig, Error, Result};

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "WARDEN_CONFIG";

const PROJECT_NAME: &str = "warden";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    /// Directory holding the content tree
    pub content_root: PathBuf,
    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,
    /// Template names; a content file named after one is preferred when a
    /// page directory holds several
    pub templates: Vec<String>,
    /// Access rule settings
    pub access: AccessConfig,
}

impl Default for WardenConfig {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from("content"),
            log_level: "warn".to_string(),
            templates: Vec::new(),
            access: AccessConfig::default(),
        }
    }
}

impl WardenConfig {
    /// Project name used for the config directory and in messages.
    pub fn project_name() -> &'static str {
        PROJECT_NAME
    }

    /// `<platform config dir>/warden/config.toml`.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(PROJECT_NAME).join(CONFIG_FILE_NAME))
    }

    /// Resolve the config path: explicit flag, then `WARDEN_CONFIG`, then
    /// the platform default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        resolve_with(explicit, std::env::var(CONFIG_ENV_VAR).ok())
    }

    /// Load the configuration. A missing file yields defaults.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        match Self::resolve_config_path(explicit) {
            Some(path) if path.exists() => Self::from_file(&path),
            Some(path) => {
                log::debug!("no config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Read and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;
        config.validate()?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Check field values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.log_level.trim().is_empty() {
            return Err(Error::config("log_level must not be empty"));
        }
        self.access.validate()
    }

    /// Serialize as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }
}

fn resolve_with(explicit: Option<&str>, env: Option<String>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(PathBuf::from(path));
    }
    if let Some(path) = env.filter(|p| !p.trim().is_empty()) {
        return Some(PathBuf::from(path));
    }
    WardenConfig::default_config_path()
}
