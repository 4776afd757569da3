//! ABAC rule definitions.
//!
//! A rule is a predicate attached to one permission. It only runs after the
//! RBAC gate has already granted that permission, and its answer is final.
//! At most one rule exists per permission; registering another replaces it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::attributes::{Attributes, Subject};

// ============================================================================
// Rule
// ============================================================================

/// A fine-grained access predicate.
///
/// Rules should be fast, pure and total. They run inline within a decision,
/// so a slow rule slows every check of its permission. A panicking rule
/// unwinds through the caller.
pub trait Rule: Send + Sync {
    /// Decides whether `subject` may proceed. Absent bags are `None`; what
    /// that means is up to the rule.
    fn evaluate(
        &self,
        subject: &Subject,
        resource: Option<&Attributes>,
        context: Option<&Attributes>,
    ) -> bool;
}

impl<F> Rule for F
where
    F: Fn(&Subject, Option<&Attributes>, Option<&Attributes>) -> bool + Send + Sync,
{
    fn evaluate(
        &self,
        subject: &Subject,
        resource: Option<&Attributes>,
        context: Option<&Attributes>,
    ) -> bool {
        self(subject, resource, context)
    }
}

/// Allows access only when a resource attribute equals a subject attribute,
/// e.g. `resource.authorId == subject.id`.
///
/// Denies when the resource is absent or either attribute is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ownership {
    subject_key: String,
    resource_key: String,
}

impl Ownership {
    pub fn new(subject_key: impl Into<String>, resource_key: impl Into<String>) -> Self {
        Self {
            subject_key: subject_key.into(),
            resource_key: resource_key.into(),
        }
    }
}

impl Rule for Ownership {
    fn evaluate(
        &self,
        subject: &Subject,
        resource: Option<&Attributes>,
        _context: Option<&Attributes>,
    ) -> bool {
        let Some(resource) = resource else {
            return false;
        };

        match (subject.get(&self.subject_key), resource.get(&self.resource_key)) {
            (Some(owner), Some(claimed)) => owner == claimed,
            _ => false,
        }
    }
}

// ============================================================================
// Rule Set
// ============================================================================

/// Registry of rules keyed by permission.
#[derive(Clone, Default)]
pub struct RuleSet {
    rules: BTreeMap<String, Arc<dyn Rule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `rule` for `permission`, replacing any previous rule.
    ///
    /// Returns whether a rule was replaced.
    pub fn insert(&mut self, permission: impl Into<String>, rule: impl Rule + 'static) -> bool {
        self.rules
            .insert(permission.into(), Arc::new(rule))
            .is_some()
    }

    /// Registers a closure as the rule for `permission`.
    pub fn insert_fn<F>(&mut self, permission: impl Into<String>, rule: F) -> bool
    where
        F: Fn(&Subject, Option<&Attributes>, Option<&Attributes>) -> bool + Send + Sync + 'static,
    {
        self.insert(permission, rule)
    }

    /// Removes the rule for `permission`. Returns whether one was present.
    pub fn remove(&mut self, permission: &str) -> bool {
        self.rules.remove(permission).is_some()
    }

    pub fn contains(&self, permission: &str) -> bool {
        self.rules.contains_key(permission)
    }

    pub fn get(&self, permission: &str) -> Option<&dyn Rule> {
        self.rules.get(permission).map(|rule| &**rule)
    }

    /// Returns every permission that has a rule.
    pub fn permissions(&self) -> Vec<&str> {
        self.rules.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.rules.keys()).finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
