//! # gatehouse-rbac: Role-Based Access Control
//!
//! In-memory store of roles and groups, plus the resolution engine that
//! computes a role's effective permissions.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Mutations (add/remove role, group, member)  │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  RoleStore                                   │
//! │  ├─ Groups: name → permissions               │
//! │  └─ Roles:  name → permissions + memberOf    │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Resolution                                  │
//! │  ∪ permissions of every existing member group│
//! │  ∪ the role's own permissions                │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Permissions are opaque strings compared exactly. There is no wildcard
//! expansion: a group holding `"article:*"` does not grant `"article:read"`.
//!
//! ## Examples
//!
//! ```
//! use gatehouse_rbac::RoleStore;
//!
//! let mut store = RoleStore::new();
//! store
//!     .add_group("admins", &["*:*"])
//!     .add_group("editors", &["article:read", "article:update"]);
//! store.add_role("editor", &[], &["editors"])?;
//! store.add_role("user", &["article:read"], &[])?;
//!
//! assert!(store.has_permission("editor", "article:update"));
//! assert!(!store.has_permission("editor", "article:*"));
//! assert!(store.has_some_permission("user", &["*:*", "article:read"]));
//!
//! // A role cannot join a group that does not exist
//! assert!(store.add_role("ghost", &[], &["nobody"]).is_err());
//! # Ok::<(), gatehouse_rbac::RbacError>(())
//! ```
//!
//! ### Dump and restore
//!
//! ```
//! use gatehouse_rbac::RoleStore;
//!
//! let mut store = RoleStore::new();
//! store.add_group("editors", &["article:update"]);
//! store.add_role("editor", &["article:read"], &["editors"])?;
//!
//! let text = store.dump().to_json()?;
//! let restored = RoleStore::from_json(&text)?;
//! assert!(restored.has_permission("editor", "article:update"));
//! # Ok::<(), gatehouse_rbac::RbacError>(())
//! ```

pub mod dump;
pub mod error;
pub mod groups;
pub mod permissions;
pub mod roles;
pub mod store;

// Re-export commonly used types
pub use dump::{Dump, GroupEntry, RoleEntry};
pub use error::{RbacError, Result};
pub use groups::Group;
pub use permissions::{Permission, PermissionSet};
pub use roles::Role;
pub use store::RoleStore;
