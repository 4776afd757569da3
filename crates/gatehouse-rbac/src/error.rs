//! Error types for the role store.

use thiserror::Error;

/// Error type for role store operations.
#[derive(Debug, Error)]
pub enum RbacError {
    /// A role referenced a group that does not exist.
    #[error("Group not found: {group}")]
    GroupNotFound { group: String },

    /// A dump could not be parsed or does not have the expected shape.
    #[error("Malformed dump: {0}")]
    MalformedDump(#[source] serde_json::Error),

    /// A dump could not be rendered as text.
    #[error("Failed to serialize dump: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl RbacError {
    pub(crate) fn group_not_found(group: impl Into<String>) -> Self {
        Self::GroupNotFound {
            group: group.into(),
        }
    }
}

/// Result type for role store operations.
pub type Result<T> = std::result::Result<T, RbacError>;
