//! Permission types for access control.
//!
//! A permission is an opaque token. The engine never looks inside it: two
//! permissions are equal only when their strings are byte-for-byte equal, so
//! `"article:*"` grants exactly `"article:*"` and nothing else.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Permission that can be granted to a role or a group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(String);

impl Permission {
    /// Creates a new permission token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the permission, returning the raw token.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Permission {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for Permission {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&String> for Permission {
    fn from(token: &String) -> Self {
        Self(token.clone())
    }
}

impl AsRef<str> for Permission {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for Permission {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Deduplicated set of permissions held by a role or a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet {
    permissions: BTreeSet<Permission>,
}

impl PermissionSet {
    /// Creates an empty permission set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns whether this set contains the given permission.
    pub fn contains(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    /// Adds a permission to the set. Granting twice is a no-op.
    pub fn grant(&mut self, permission: impl Into<Permission>) {
        self.permissions.insert(permission.into());
    }

    /// Adds every permission yielded by the iterator.
    pub fn grant_all<I, P>(&mut self, permissions: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        self.permissions
            .extend(permissions.into_iter().map(Into::into));
    }

    /// Removes a permission from the set.
    pub fn revoke(&mut self, permission: &str) {
        self.permissions.remove(permission);
    }

    /// Removes every permission yielded by the iterator.
    pub fn revoke_all<I, P>(&mut self, permissions: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        for permission in permissions {
            self.revoke(permission.as_ref());
        }
    }

    /// Unions `other` into this set.
    pub fn extend_from(&mut self, other: &PermissionSet) {
        self.permissions.extend(other.permissions.iter().cloned());
    }

    /// Returns all permissions in the set, in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.iter()
    }

    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Returns an owned snapshot of the underlying set.
    pub fn to_set(&self) -> BTreeSet<Permission> {
        self.permissions.clone()
    }

    /// Consumes the set, returning the underlying `BTreeSet`.
    pub fn into_set(self) -> BTreeSet<Permission> {
        self.permissions
    }
}

impl<P: Into<Permission>> FromIterator<P> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut set = Self::empty();
        set.grant_all(iter);
        set
    }
}

impl From<Vec<Permission>> for PermissionSet {
    fn from(permissions: Vec<Permission>) -> Self {
        permissions.into_iter().collect()
    }
}
