//! # Gatehouse
//!
//! In-memory authorization engine: role-based access control with an
//! optional attribute-based rule overlay.
//!
//! Gatehouse answers one question: *can this subject perform this action,
//! possibly on this resource, under this context?* It does not authenticate
//! anyone, persist anything, or serve requests; it is meant to be embedded.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      AccessControl                        │
//! │  ┌────────────┐   ┌──────────────┐   ┌────────────────┐  │
//! │  │ RoleStore  │ → │  Resolution  │ → │   Decision     │  │
//! │  │(roles,     │   │(groups ∪ own │   │(RBAC gate, then│  │
//! │  │ groups)    │   │ permissions) │   │ ABAC rule)     │  │
//! │  └────────────┘   └──────────────┘   └────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use gatehouse::{AccessControl, Attributes, Subject};
//!
//! let mut ac = AccessControl::new();
//! ac.add_group("admins", &["*:*"])
//!     .add_group("editors", &["article:read", "article:update"])
//!     .add_role("admin", &[], &["admins"])?
//!     .add_role("editor", &[], &["editors"])?
//!     .add_role("author", &["article:update"], &[])?;
//!
//! // Authors may only update their own articles
//! ac.add_rule("article:update", |subject, resource, _context| {
//!     resource
//!         .and_then(|r| r.get("authorId"))
//!         .is_some_and(|author| Some(author) == subject.get("id"))
//! });
//!
//! let author = Subject::new("author").with("id", "u1");
//! let mine = Attributes::new().with("authorId", "u1");
//! let theirs = Attributes::new().with("authorId", "u2");
//!
//! assert!(ac.can(&author, "article:update", Some(&mine), None));
//! assert!(!ac.can(&author, "article:update", Some(&theirs), None));
//!
//! // Rules are not part of a dump
//! let restored = AccessControl::from_json(&ac.to_json()?)?;
//! assert!(restored.rules().is_empty());
//! # Ok::<(), gatehouse::AccessControlError>(())
//! ```
//!
//! # Modules
//!
//! - **Engine**: [`AccessControl`] - Main API
//! - **RBAC**: [`gatehouse_rbac`] - roles, groups, resolution, dump
//! - **ABAC**: [`gatehouse_abac`] - attributes, rules, decisions
//! - **Config**: [`gatehouse_config`] - layered configuration

mod access_control;
mod error;

// Main API
pub use access_control::AccessControl;
pub use error::{AccessControlError, Result};

// Re-export RBAC types
pub use gatehouse_rbac::{Dump, GroupEntry, Permission, RbacError, RoleEntry, RoleStore};

// Re-export ABAC types
pub use gatehouse_abac::{
    AttributeValue, Attributes, Decision, Ownership, Rule, RuleSet, Subject, request_context,
};

// Re-export configuration
pub use gatehouse_config::{ConfigLoader, GatehouseConfig};
