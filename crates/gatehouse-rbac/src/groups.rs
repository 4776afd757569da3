//! Group definitions.
//!
//! A group is a named, reusable bundle of permissions. Groups are leaves:
//! they carry permissions but never belong to anything themselves.

use crate::permissions::{Permission, PermissionSet};

/// Permission bundle that roles may be members of.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    permissions: PermissionSet,
}

impl Group {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the permissions carried by this group.
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    pub(crate) fn grant_all<I, P>(&mut self, permissions: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        self.permissions.grant_all(permissions);
    }

    pub(crate) fn revoke_all<I, P>(&mut self, permissions: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        self.permissions.revoke_all(permissions);
    }
}
