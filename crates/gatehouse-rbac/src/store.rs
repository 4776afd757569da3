//! Entity store and permission resolution.
//!
//! [`RoleStore`] owns every role and group. Mutations take effect before they
//! return; queries never mutate. Effective permissions are recomputed from the
//! current state on every query, so there is no cache to invalidate.
//!
//! Group prerequisite: a role may only join a group that exists at the time of
//! the call. Removing a group later strips it from every role's memberships.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::error::{RbacError, Result};
use crate::groups::Group;
use crate::permissions::{Permission, PermissionSet};
use crate::roles::Role;

/// In-memory store of roles and groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleStore {
    roles: BTreeMap<String, Role>,
    groups: BTreeMap<String, Group>,
}

impl RoleStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------------
    // Groups
    // ------------------------------------------------------------------------

    /// Creates the group if absent and grants it `permissions`.
    pub fn add_group(&mut self, name: &str, permissions: &[&str]) -> &mut Self {
        let group = self.groups.entry(name.to_string()).or_default();
        group.grant_all(permissions.iter().copied());

        debug!(group = %name, permissions = ?permissions, "Group permissions added");
        self
    }

    /// Revokes `permissions` from the group. No-op if the group is absent.
    pub fn remove_group_permissions(&mut self, name: &str, permissions: &[&str]) -> &mut Self {
        if let Some(group) = self.groups.get_mut(name) {
            group.revoke_all(permissions);
            debug!(group = %name, permissions = ?permissions, "Group permissions removed");
        }
        self
    }

    /// Deletes the group and drops it from every role's memberships.
    ///
    /// Roles themselves are kept. No-op if the group is absent.
    pub fn remove_group(&mut self, name: &str) -> &mut Self {
        if self.groups.remove(name).is_none() {
            return self;
        }

        let mut detached = 0usize;
        for role in self.roles.values_mut() {
            if role.leave(name) {
                detached += 1;
            }
        }

        debug!(group = %name, detached_roles = detached, "Group removed");
        self
    }

    pub fn has_group(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    /// Returns all group names.
    pub fn groups(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    /// Returns a snapshot of the group's own permissions (empty if absent).
    pub fn group_permissions(&self, name: &str) -> BTreeSet<Permission> {
        self.groups
            .get(name)
            .map(|group| group.permissions().to_set())
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------------
    // Roles
    // ------------------------------------------------------------------------

    /// Creates the role if absent, grants it `permissions` and adds it to
    /// every group in `groups`.
    ///
    /// # Errors
    ///
    /// Returns [`RbacError::GroupNotFound`] if any named group does not exist.
    /// Every group name is checked before anything is applied, so a failing
    /// call leaves the store untouched.
    pub fn add_role(&mut self, name: &str, permissions: &[&str], groups: &[&str]) -> Result<&mut Self> {
        self.require_groups(name, groups)?;

        let role = self.roles.entry(name.to_string()).or_default();
        role.grant_all(permissions.iter().copied());
        for group in groups {
            role.join(*group);
        }

        debug!(
            role = %name,
            permissions = ?permissions,
            groups = ?groups,
            "Role updated"
        );
        Ok(self)
    }

    /// Revokes direct `permissions` from the role. No-op if the role is absent.
    pub fn remove_role_permissions(&mut self, name: &str, permissions: &[&str]) -> &mut Self {
        if let Some(role) = self.roles.get_mut(name) {
            role.revoke_all(permissions);
            debug!(role = %name, permissions = ?permissions, "Role permissions removed");
        }
        self
    }

    /// Deletes the role. Groups are not affected.
    pub fn remove_role(&mut self, name: &str) -> &mut Self {
        if self.roles.remove(name).is_some() {
            debug!(role = %name, "Role removed");
        }
        self
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.roles.contains_key(name)
    }

    /// Returns all role names.
    pub fn roles(&self) -> Vec<&str> {
        self.roles.keys().map(String::as_str).collect()
    }

    pub fn role(&self, name: &str) -> Option<&Role> {
        self.roles.get(name)
    }

    /// Returns a snapshot of the role's direct permissions (empty if absent).
    pub fn role_permissions(&self, name: &str) -> BTreeSet<Permission> {
        self.roles
            .get(name)
            .map(|role| role.permissions().to_set())
            .unwrap_or_default()
    }

    /// Returns a snapshot of the role's group memberships (empty if absent).
    pub fn role_groups(&self, name: &str) -> BTreeSet<String> {
        self.roles
            .get(name)
            .map(|role| role.member_of().clone())
            .unwrap_or_default()
    }

    /// Adds `role` to `group`, creating the role if needed.
    ///
    /// # Errors
    ///
    /// Returns [`RbacError::GroupNotFound`] if the group does not exist; the
    /// role is not created in that case.
    pub fn add_role_to_group(&mut self, role: &str, group: &str) -> Result<&mut Self> {
        self.require_groups(role, &[group])?;

        self.roles.entry(role.to_string()).or_default().join(group);

        debug!(role = %role, group = %group, "Role joined group");
        Ok(self)
    }

    /// Removes `role` from `group`. No-op if the role is absent or was never
    /// a member.
    pub fn remove_role_from_group(&mut self, role: &str, group: &str) -> &mut Self {
        if let Some(entry) = self.roles.get_mut(role) {
            if entry.leave(group) {
                debug!(role = %role, group = %group, "Role left group");
            }
        }
        self
    }

    fn require_groups(&self, role: &str, groups: &[&str]) -> Result<()> {
        match groups.iter().find(|group| !self.groups.contains_key(**group)) {
            Some(missing) => {
                warn!(role = %role, group = %missing, "Rejected membership in unknown group");
                Err(RbacError::group_not_found(*missing))
            }
            None => Ok(()),
        }
    }

    // ------------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------------

    /// Returns the effective permissions of a role: the union of every
    /// existing member group's permissions and the role's own permissions.
    ///
    /// Unknown roles resolve to the empty set. The result is a snapshot;
    /// changing it does not affect the store.
    pub fn permissions(&self, role: &str) -> BTreeSet<Permission> {
        let Some(role) = self.roles.get(role) else {
            return BTreeSet::new();
        };

        let mut resolved = PermissionSet::empty();
        for group in role.member_of() {
            // Memberships of removed groups resolve to nothing
            if let Some(group) = self.groups.get(group) {
                resolved.extend_from(group.permissions());
            }
        }
        resolved.extend_from(role.permissions());

        resolved.into_set()
    }

    /// Returns whether the role's effective permissions include `permission`.
    pub fn has_permission(&self, role: &str, permission: &str) -> bool {
        let Some(role) = self.roles.get(role) else {
            return false;
        };

        role.permissions().contains(permission)
            || role.member_of().iter().any(|group| {
                self.groups
                    .get(group)
                    .is_some_and(|group| group.permissions().contains(permission))
            })
    }

    /// Returns whether the role holds at least one of `permissions`.
    pub fn has_some_permission(&self, role: &str, permissions: &[&str]) -> bool {
        if permissions.is_empty() || !self.has_role(role) {
            return false;
        }

        let resolved = self.permissions(role);
        permissions
            .iter()
            .any(|permission| resolved.contains(*permission))
    }

    /// Returns whether the role holds every one of `permissions`.
    ///
    /// Vacuously true for an empty query.
    pub fn has_every_permission(&self, role: &str, permissions: &[&str]) -> bool {
        if permissions.is_empty() {
            return true;
        }

        let resolved = self.permissions(role);
        permissions
            .iter()
            .all(|permission| resolved.contains(*permission))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn perms(items: &[&str]) -> BTreeSet<Permission> {
        items.iter().map(|p| Permission::from(*p)).collect()
    }

    #[test]
    fn test_add_role_requires_existing_group() {
        let mut store = RoleStore::new();

        let result = store.add_role("r", &[], &["g"]);
        match result {
            Err(RbacError::GroupNotFound { group }) => assert_eq!(group, "g"),
            _ => panic!("Expected GroupNotFound error"),
        }

        store.add_group("g", &[]);
        assert!(store.add_role("r", &[], &["g"]).is_ok());
        assert!(store.role("r").unwrap().is_member_of("g"));
    }

    #[test]
    fn test_add_role_failure_applies_nothing() {
        let mut store = RoleStore::new();
        store.add_group("present", &["p"]);

        let result = store.add_role("r", &["direct"], &["present", "missing"]);

        assert!(result.is_err());
        assert!(!store.has_role("r"), "role must not be created");
        assert!(store.permissions("r").is_empty());
    }

    #[test]
    fn test_add_role_failure_keeps_existing_role_unchanged() {
        let mut store = RoleStore::new();
        store.add_group("g", &["p"]);
        store.add_role("r", &["a"], &["g"]).unwrap();
        let before = store.clone();

        assert!(store.add_role("r", &["b"], &["missing"]).is_err());
        assert_eq!(store, before);
    }

    #[test]
    fn test_union_of_memberships() {
        let mut store = RoleStore::new();
        store.add_group("g1", &["a"]).add_group("g2", &["b"]);
        store.add_role("r", &["c"], &["g1", "g2"]).unwrap();

        assert_eq!(store.permissions("r"), perms(&["a", "b", "c"]));
    }

    #[test]
    fn test_unknown_role_resolves_to_nothing() {
        let store = RoleStore::new();

        assert!(store.permissions("ghost").is_empty());
        assert!(!store.has_permission("ghost", "a"));
        assert!(!store.has_some_permission("ghost", &["a"]));
        assert!(!store.has_role("ghost"));
        assert!(!store.has_group("ghost"));
    }

    #[test]
    fn test_remove_group_cascades_to_memberships() {
        let mut store = RoleStore::new();
        store.add_group("g", &["only-in-g"]);
        store.add_role("r", &["own"], &["g"]).unwrap();
        assert!(store.has_permission("r", "only-in-g"));

        store.remove_group("g");

        assert!(!store.has_permission("r", "only-in-g"));
        assert!(store.has_permission("r", "own"));
        assert!(store.has_role("r"));
        assert!(store.role_groups("r").is_empty());

        // Re-adding the group does not silently restore the membership
        store.add_group("g", &["only-in-g"]);
        assert!(!store.has_permission("r", "only-in-g"));
    }

    #[test]
    fn test_idempotent_add() {
        let mut store = RoleStore::new();
        store.add_role("r", &["x", "x"], &[]).unwrap();
        store.add_role("r", &["x"], &[]).unwrap();

        assert_eq!(store.permissions("r").len(), 1);
    }

    #[test]
    fn test_exact_matching_no_wildcards() {
        let mut store = RoleStore::new();
        store.add_group("admins", &["article:*"]);
        store.add_role("admins", &[], &["admins"]).unwrap();

        assert!(store.has_permission("admins", "article:*"));
        assert!(!store.has_permission("admins", "article:read"));
    }

    #[test]
    fn test_resolution_sees_later_group_changes() {
        let mut store = RoleStore::new();
        store.add_group("g", &[]);
        store.add_role("r", &[], &["g"]).unwrap();
        assert!(!store.has_permission("r", "late"));

        store.add_group("g", &["late"]);
        assert!(store.has_permission("r", "late"));

        store.remove_group_permissions("g", &["late"]);
        assert!(!store.has_permission("r", "late"));
    }

    #[test]
    fn test_resolved_set_is_a_snapshot() {
        let mut store = RoleStore::new();
        store.add_role("r", &["a"], &[]).unwrap();

        let mut snapshot = store.permissions("r");
        snapshot.insert(Permission::from("injected"));

        assert!(!store.has_permission("r", "injected"));
    }

    #[test]
    fn test_add_role_to_group() {
        let mut store = RoleStore::new();

        assert!(store.add_role_to_group("r", "g").is_err());
        assert!(!store.has_role("r"), "failed call must not create the role");

        store.add_group("g", &["p"]);
        store.add_role_to_group("r", "g").unwrap();

        assert!(store.has_role("r"));
        assert!(store.has_permission("r", "p"));
    }

    #[test]
    fn test_remove_role_from_group() {
        let mut store = RoleStore::new();
        store.add_group("g", &["p"]);
        store.add_role("r", &[], &["g"]).unwrap();

        store.remove_role_from_group("r", "never-joined");
        assert!(store.has_permission("r", "p"));

        store.remove_role_from_group("r", "g");
        assert!(!store.has_permission("r", "p"));

        // Unknown role is a no-op
        store.remove_role_from_group("ghost", "g");
        assert!(!store.has_role("ghost"));
    }

    #[test]
    fn test_remove_permissions_and_entities() {
        let mut store = RoleStore::new();
        store.add_group("g", &["a", "b"]);
        store.add_role("r", &["c", "d"], &["g"]).unwrap();

        store
            .remove_group_permissions("g", &["a"])
            .remove_role_permissions("r", &["c"])
            .remove_group_permissions("missing", &["a"])
            .remove_role_permissions("missing", &["a"]);

        assert_eq!(store.permissions("r"), perms(&["b", "d"]));

        store.remove_role("r");
        assert!(!store.has_role("r"));
        assert!(store.has_group("g"), "removing a role leaves groups alone");
        assert_eq!(store.group_permissions("g"), perms(&["b"]));
    }

    #[test]
    fn test_listing() {
        let mut store = RoleStore::new();
        store.add_group("g2", &[]).add_group("g1", &[]);
        store.add_role("r", &[], &[]).unwrap();

        let mut groups = store.groups();
        groups.sort_unstable();
        assert_eq!(groups, vec!["g1", "g2"]);
        assert_eq!(store.roles(), vec!["r"]);
    }

    #[test]
    fn test_has_some_and_every_permission() {
        let mut store = RoleStore::new();
        store.add_role("user", &["article:read"], &[]).unwrap();

        assert!(store.has_some_permission("user", &["*:*", "article:*", "article:read"]));
        assert!(!store.has_some_permission("user", &["*:*"]));
        assert!(!store.has_some_permission("user", &[]));

        assert!(store.has_every_permission("user", &["article:read"]));
        assert!(!store.has_every_permission("user", &["article:read", "article:update"]));
        assert!(store.has_every_permission("user", &[]));
    }

    fn token() -> impl Strategy<Value = String> {
        "[a-c]{1,2}"
    }

    proptest! {
        #[test]
        fn prop_duplicate_grants_never_grow_the_set(tokens in prop::collection::vec(token(), 0..12)) {
            let refs: Vec<&str> = tokens.iter().map(String::as_str).collect();
            let mut store = RoleStore::new();
            store.add_role("r", &refs, &[]).unwrap();
            let once = store.permissions("r");

            store.add_role("r", &refs, &[]).unwrap();
            prop_assert_eq!(store.permissions("r"), once.clone());

            let distinct: BTreeSet<&str> = refs.iter().copied().collect();
            prop_assert_eq!(once.len(), distinct.len());
        }

        #[test]
        fn prop_resolution_is_union(
            group_a in prop::collection::vec(token(), 0..6),
            group_b in prop::collection::vec(token(), 0..6),
            own in prop::collection::vec(token(), 0..6),
        ) {
            let a: Vec<&str> = group_a.iter().map(String::as_str).collect();
            let b: Vec<&str> = group_b.iter().map(String::as_str).collect();
            let o: Vec<&str> = own.iter().map(String::as_str).collect();

            let mut store = RoleStore::new();
            store.add_group("a", &a).add_group("b", &b);
            store.add_role("r", &o, &["a", "b"]).unwrap();

            let expected: BTreeSet<Permission> =
                a.iter().chain(&b).chain(&o).map(|p| Permission::from(*p)).collect();
            let resolved = store.permissions("r");
            prop_assert_eq!(&resolved, &expected);

            for permission in &expected {
                prop_assert!(store.has_permission("r", permission.as_str()));
            }
        }
    }
}
