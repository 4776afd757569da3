//! Dump and restore of the role store.
//!
//! The dump is a document with two mappings:
//!
//! ```json
//! {
//!   "roles":  { "editor": { "permissions": ["article:read"], "memberOf": ["editors"] } },
//!   "groups": { "editors": { "permissions": ["article:update"] } }
//! }
//! ```
//!
//! Both inner fields are optional; an empty object means "exists with nothing
//! granted". Rules are executable logic and never appear in a dump.
//!
//! Restore always materializes every group before touching any role, so key
//! order in the input does not matter. Restore is all-or-nothing: any error
//! discards the partially built store.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{RbacError, Result};
use crate::permissions::Permission;
use crate::store::RoleStore;

/// Serialized role entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,

    #[serde(rename = "memberOf", default, skip_serializing_if = "Option::is_none")]
    pub member_of: Option<Vec<String>>,
}

/// Serialized group entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

/// Structured form of a role store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dump {
    #[serde(default)]
    pub roles: BTreeMap<String, RoleEntry>,

    #[serde(default)]
    pub groups: BTreeMap<String, GroupEntry>,
}

impl Dump {
    /// Parses a dump from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(RbacError::MalformedDump)
    }

    /// Interprets an already-parsed JSON document as a dump.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(RbacError::MalformedDump)
    }

    /// Renders the dump as compact JSON text.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(RbacError::Serialize)
    }

    /// Renders the dump as indented JSON text.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(RbacError::Serialize)
    }

    /// Renders the dump as a JSON document.
    pub fn to_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(RbacError::Serialize)
    }
}

impl FromStr for Dump {
    type Err = RbacError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_json(s)
    }
}

impl fmt::Display for Dump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_json().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

fn non_empty(items: Vec<String>) -> Option<Vec<String>> {
    (!items.is_empty()).then_some(items)
}

fn as_strs(items: Option<&Vec<String>>) -> Vec<&str> {
    items
        .map(|items| items.iter().map(String::as_str).collect())
        .unwrap_or_default()
}

impl RoleStore {
    /// Exports every role and group.
    pub fn dump(&self) -> Dump {
        let groups = self
            .groups()
            .into_iter()
            .map(|name| {
                let permissions = self
                    .group_permissions(name)
                    .into_iter()
                    .map(Permission::into_inner)
                    .collect();
                (
                    name.to_string(),
                    GroupEntry {
                        permissions: non_empty(permissions),
                    },
                )
            })
            .collect();

        let roles = self
            .roles()
            .into_iter()
            .map(|name| {
                let permissions = self
                    .role_permissions(name)
                    .into_iter()
                    .map(Permission::into_inner)
                    .collect();
                let member_of = self.role_groups(name).into_iter().collect();
                (
                    name.to_string(),
                    RoleEntry {
                        permissions: non_empty(permissions),
                        member_of: non_empty(member_of),
                    },
                )
            })
            .collect();

        Dump { roles, groups }
    }

    /// Builds a fresh store from a dump.
    ///
    /// # Errors
    ///
    /// Returns [`RbacError::GroupNotFound`] if a role lists a group that the
    /// dump does not define.
    pub fn restore(dump: &Dump) -> Result<Self> {
        let mut store = Self::new();

        for (name, entry) in &dump.groups {
            store.add_group(name, &as_strs(entry.permissions.as_ref()));
        }

        for (name, entry) in &dump.roles {
            let permissions = as_strs(entry.permissions.as_ref());
            let groups = as_strs(entry.member_of.as_ref());
            if let Err(e) = store.add_role(name, &permissions, &groups) {
                warn!(role = %name, error = %e, "Restore failed");
                return Err(e);
            }
        }

        info!(
            roles = dump.roles.len(),
            groups = dump.groups.len(),
            "Role store restored"
        );
        Ok(store)
    }

    /// Builds a fresh store from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Self::restore(&Dump::from_json(text)?)
    }

    /// Builds a fresh store from a parsed JSON document.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Self::restore(&Dump::from_value(value)?)
    }
}
