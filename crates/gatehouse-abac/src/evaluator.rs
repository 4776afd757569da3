//! Two-phase access decision.
//!
//! 1. **RBAC gate**: the subject's role must hold the permission. If it does
//!    not, access is denied and no rule runs. A rule can never grant what
//!    the role lacks.
//! 2. **ABAC rule**: if a rule is registered for the permission, its answer
//!    is returned verbatim. With no rule, the RBAC grant stands.

use gatehouse_rbac::RoleStore;

use crate::attributes::{Attributes, Subject};
use crate::rules::RuleSet;

// ============================================================================
// Decision
// ============================================================================

/// The result of evaluating an access request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Whether access is allowed.
    pub allowed: bool,
    /// Whether an ABAC rule was consulted.
    pub rule_applied: bool,
    /// Human-readable explanation of why this decision was made.
    pub reason: String,
}

// ============================================================================
// Public API
// ============================================================================

/// Evaluates an access request.
///
/// Unknown roles hold no permissions, so they are always denied.
pub fn evaluate(
    store: &RoleStore,
    rules: &RuleSet,
    subject: &Subject,
    permission: &str,
    resource: Option<&Attributes>,
    context: Option<&Attributes>,
) -> Decision {
    if !store.has_permission(subject.role(), permission) {
        return Decision {
            allowed: false,
            rule_applied: false,
            reason: format!(
                "Role '{}' does not hold permission '{permission}'",
                subject.role()
            ),
        };
    }

    let Some(rule) = rules.get(permission) else {
        return Decision {
            allowed: true,
            rule_applied: false,
            reason: format!(
                "Role '{}' holds permission '{permission}'; no rule registered",
                subject.role()
            ),
        };
    };

    let allowed = rule.evaluate(subject, resource, context);
    Decision {
        allowed,
        rule_applied: true,
        reason: format!(
            "Rule for '{permission}' {}",
            if allowed { "allowed access" } else { "denied access" }
        ),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Ownership;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn store_with(role: &str, permissions: &[&str]) -> RoleStore {
        let mut store = RoleStore::new();
        store.add_role(role, permissions, &[]).unwrap();
        store
    }

    #[test]
    fn test_rbac_gate_precedes_rule() {
        let store = store_with("author", &[]);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut rules = RuleSet::new();
        rules.insert_fn("p", move |_, _, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });

        let decision = evaluate(&store, &rules, &Subject::new("author"), "p", None, None);

        assert!(!decision.allowed);
        assert!(!decision.rule_applied);
        assert_eq!(calls.load(Ordering::SeqCst), 0, "rule must not run");
    }

    #[test]
    fn test_rbac_alone_suffices_without_rule() {
        let store = store_with("author", &["p"]);
        let rules = RuleSet::new();
        let resource = Attributes::new().with("anything", 1);
        let context = Attributes::new().with("is_business_hours", false);

        for (res, ctx) in [
            (None, None),
            (Some(&resource), None),
            (None, Some(&context)),
            (Some(&resource), Some(&context)),
        ] {
            let decision = evaluate(&store, &rules, &Subject::new("author"), "p", res, ctx);
            assert!(decision.allowed);
            assert!(!decision.rule_applied);
        }
    }

    #[test]
    fn test_rule_result_is_passed_through() {
        let store = store_with("author", &["article:update"]);
        let mut rules = RuleSet::new();
        rules.insert("article:update", Ownership::new("id", "authorId"));

        let subject = Subject::new("author").with("id", "u1");
        let mine = Attributes::new().with("authorId", "u1");
        let theirs = Attributes::new().with("authorId", "u2");

        let allowed = evaluate(&store, &rules, &subject, "article:update", Some(&mine), None);
        assert!(allowed.allowed);
        assert!(allowed.rule_applied);

        let denied = evaluate(&store, &rules, &subject, "article:update", Some(&theirs), None);
        assert!(!denied.allowed);
        assert!(denied.rule_applied);
        assert!(denied.reason.contains("denied"));
    }

    #[test]
    fn test_rule_receives_absent_bags_as_none() {
        let store = store_with("author", &["p"]);
        let mut rules = RuleSet::new();
        rules.insert_fn("p", |_, resource, context| {
            resource.is_none() && context.is_none()
        });

        let decision = evaluate(&store, &rules, &Subject::new("author"), "p", None, None);
        assert!(decision.allowed);
    }

    #[test]
    fn test_unknown_role_denied() {
        let store = RoleStore::new();
        let rules = RuleSet::new();

        let decision = evaluate(&store, &rules, &Subject::new("ghost"), "p", None, None);
        assert!(!decision.allowed);
        assert!(decision.reason.contains("ghost"));
    }

    #[test]
    fn test_rule_on_other_permission_is_ignored() {
        let store = store_with("author", &["a"]);
        let mut rules = RuleSet::new();
        rules.insert_fn("b", |_, _, _| false);

        let decision = evaluate(&store, &rules, &Subject::new("author"), "a", None, None);
        assert!(decision.allowed);
        assert!(!decision.rule_applied);
    }
}
