//! Configuration management for Gatehouse
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. Environment variables (GATEHOUSE_* prefix, `__` between nested keys)
//! 2. gatehouse.local.toml (gitignored, local overrides)
//! 3. gatehouse.toml (git-tracked, project config)
//! 4. ~/.config/gatehouse/config.toml (user defaults)
//! 5. Built-in defaults (lowest precedence)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::{ConfigFiles, LOCAL_FILE, PROJECT_FILE, user_config_dir};

/// Main Gatehouse configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatehouseConfig {
    pub audit: AuditConfig,
    pub seed: SeedConfig,
}

/// Per-decision audit logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub enabled: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Initial roles and groups, restored from a JSON dump at startup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub dump_path: Option<PathBuf>,
}

impl GatehouseConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        ConfigLoader::new().load()
    }

    /// Load configuration from specific project directory
    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> Result<Self> {
        ConfigLoader::new().with_project_dir(project_dir).load()
    }

    /// Read a single TOML file, without layering
    pub fn from_file(path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&text).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(dir) = path.parent() {
            config.resolve_paths(dir);
        }
        config.validate()?;
        Ok(config)
    }

    /// Create a configuration for tests and tooling: no audit noise, no seed
    pub fn quiet() -> Self {
        Self {
            audit: AuditConfig { enabled: false },
            ..Default::default()
        }
    }

    /// Resolve relative paths to absolute
    pub fn resolve_paths(&mut self, base_dir: impl AsRef<Path>) {
        let base = base_dir.as_ref();

        if let Some(dump_path) = &self.seed.dump_path {
            if dump_path.is_relative() {
                self.seed.dump_path = Some(base.join(dump_path));
            }
        }
    }

    /// Check values that deserialize fine but make no sense
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if let Some(dump_path) = &self.seed.dump_path {
            if dump_path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError(
                    "seed.dump_path must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}
