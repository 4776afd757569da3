//! # gatehouse-abac: Attribute-Based Access Control
//!
//! Adds fine-grained, attribute-driven rules on top of the RBAC gate.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Access Request                              │
//! │  (Subject + Permission + Resource? + Context?)│
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  RBAC gate                                   │
//! │  Does subject.role hold the permission?      │
//! │  No  → Deny (no rule runs)                   │
//! └─────────────────┬───────────────────────────┘
//!                   │ Yes
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  ABAC rule for the permission                │
//! │  None       → Allow                          │
//! │  Registered → rule(subject, resource, ctx)   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Examples
//!
//! ```
//! use gatehouse_abac::{Attributes, RuleSet, Subject, evaluate};
//! use gatehouse_rbac::RoleStore;
//!
//! let mut store = RoleStore::new();
//! store.add_role("author", &["article:update"], &[])?;
//!
//! // Authors may only update their own articles
//! let mut rules = RuleSet::new();
//! rules.insert_fn("article:update", |subject, resource, _context| {
//!     resource
//!         .and_then(|r| r.get("authorId"))
//!         .is_some_and(|author| Some(author) == subject.get("id"))
//! });
//!
//! let subject = Subject::new("author").with("id", "u1");
//! let article = Attributes::new().with("authorId", "u1");
//!
//! let decision = evaluate(&store, &rules, &subject, "article:update", Some(&article), None);
//! assert!(decision.allowed);
//! # Ok::<(), gatehouse_rbac::RbacError>(())
//! ```

pub mod attributes;
pub mod evaluator;
pub mod rules;

pub use attributes::{AttributeValue, Attributes, Subject, request_context};
pub use evaluator::{Decision, evaluate};
pub use rules::{Ownership, Rule, RuleSet};
