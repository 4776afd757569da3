//! Error types for the access control facade.

use std::path::PathBuf;

use gatehouse_config::ConfigError;
use gatehouse_rbac::RbacError;
use thiserror::Error;

/// Error type for [`AccessControl`](crate::AccessControl) operations.
#[derive(Debug, Error)]
pub enum AccessControlError {
    /// Store mutation or dump/restore failure.
    #[error(transparent)]
    Rbac(#[from] RbacError),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The configured seed dump could not be read.
    #[error("Failed to read seed dump at {path}: {source}")]
    SeedRead {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for access control operations.
pub type Result<T> = std::result::Result<T, AccessControlError>;
