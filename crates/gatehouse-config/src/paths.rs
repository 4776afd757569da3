//! Config file discovery

use crate::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Git-tracked project file.
pub const PROJECT_FILE: &str = "gatehouse.toml";
/// Gitignored per-checkout overrides.
pub const LOCAL_FILE: &str = "gatehouse.local.toml";
const USER_FILE: &str = "config.toml";

/// The TOML files a project's configuration is merged from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFiles {
    user: Option<PathBuf>,
    project: PathBuf,
    local: PathBuf,
}

impl ConfigFiles {
    /// Files for `project_dir`, including the user file when the platform
    /// has a config directory.
    pub fn for_project(project_dir: impl AsRef<Path>) -> Self {
        let dir = project_dir.as_ref();
        Self {
            user: user_config_dir().ok().map(|d| d.join(USER_FILE)),
            project: dir.join(PROJECT_FILE),
            local: dir.join(LOCAL_FILE),
        }
    }

    /// Drops the per-user file from the layering.
    pub fn without_user(mut self) -> Self {
        self.user = None;
        self
    }

    pub fn user(&self) -> Option<&Path> {
        self.user.as_deref()
    }

    pub fn project(&self) -> &Path {
        &self.project
    }

    pub fn local(&self) -> &Path {
        &self.local
    }

    /// Files that exist on disk, lowest precedence first.
    pub fn existing(&self) -> Vec<&Path> {
        self.user
            .as_deref()
            .into_iter()
            .chain([self.project.as_path(), self.local.as_path()])
            .filter(|path| path.is_file())
            .collect()
    }
}

/// Per-user config directory (e.g. `~/.config/gatehouse/`).
pub fn user_config_dir() -> Result<PathBuf, ConfigError> {
    ProjectDirs::from("com", "Gatehouse", "gatehouse")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| ConfigError::XdgError("no home directory for user config".to_string()))
}
