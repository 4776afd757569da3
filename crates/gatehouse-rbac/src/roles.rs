//! Role definitions for RBAC.
//!
//! A role holds two things:
//! - permissions granted to it directly
//! - the names of the groups it is a member of ("memberOf")
//!
//! Memberships are names, not pointers. The store looks each group up at
//! query time, so a group removed after the fact simply stops contributing.

use std::collections::BTreeSet;

use crate::permissions::{Permission, PermissionSet};

/// Role in the access control system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Role {
    permissions: PermissionSet,
    member_of: BTreeSet<String>,
}

impl Role {
    /// Creates a role with no permissions and no memberships.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the permissions granted directly to this role.
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// Returns the names of the groups this role belongs to.
    pub fn member_of(&self) -> &BTreeSet<String> {
        &self.member_of
    }

    /// Returns whether this role lists `group` among its memberships.
    pub fn is_member_of(&self, group: &str) -> bool {
        self.member_of.contains(group)
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

    pub(crate) fn join(&mut self, group: impl Into<String>) {
        self.member_of.insert(group.into());
    }

    /// Returns whether the membership was present.
    pub(crate) fn leave(&mut self, group: &str) -> bool {
        self.member_of.remove(group)
    }
}
