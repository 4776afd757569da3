//! The access control engine.
//!
//! [`AccessControl`] owns one [`RoleStore`] and one [`RuleSet`]. Each instance
//! is independent; construct one per application (or per test) and pass it by
//! reference. It has no internal locking: embedders sharing it across threads
//! must wrap it themselves, e.g. in an `RwLock`.

use std::collections::BTreeSet;
use std::fs;

use gatehouse_abac::{Attributes, Decision, Rule, RuleSet, Subject, evaluator};
use gatehouse_config::GatehouseConfig;
use gatehouse_rbac::{Dump, Permission, RoleStore};
use tracing::{debug, info, warn};

use crate::error::{AccessControlError, Result};

/// RBAC store plus ABAC rules, with a chaining mutation API.
#[derive(Debug, Clone)]
pub struct AccessControl {
    store: RoleStore,
    rules: RuleSet,

    /// Whether to log every decision.
    audit_enabled: bool,
}

impl Default for AccessControl {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessControl {
    /// Creates an empty engine with auditing on.
    pub fn new() -> Self {
        Self::with_store(RoleStore::new())
    }

    fn with_store(store: RoleStore) -> Self {
        Self {
            store,
            rules: RuleSet::new(),
            audit_enabled: true,
        }
    }

    /// Disables audit logging (for testing).
    pub fn without_audit(mut self) -> Self {
        self.audit_enabled = false;
        self
    }

    /// Builds an engine from configuration, restoring the seed dump if one
    /// is configured.
    pub fn from_config(config: &GatehouseConfig) -> Result<Self> {
        config.validate()?;

        let mut engine = match &config.seed.dump_path {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|source| {
                    AccessControlError::SeedRead {
                        path: path.clone(),
                        source,
                    }
                })?;
                info!(path = %path.display(), "Loading seed dump");
                Self::from_json(&text)?
            }
            None => Self::new(),
        };

        engine.audit_enabled = config.audit.enabled;
        Ok(engine)
    }

    /// Returns the underlying role store.
    pub fn store(&self) -> &RoleStore {
        &self.store
    }

    /// Returns the registered rules.
    pub fn rule_set(&self) -> &RuleSet {
        &self.rules
    }

    // ------------------------------------------------------------------------
    // Groups
    // ------------------------------------------------------------------------

    pub fn add_group(&mut self, name: &str, permissions: &[&str]) -> &mut Self {
        self.store.add_group(name, permissions);
        self
    }

    pub fn remove_group_permissions(&mut self, name: &str, permissions: &[&str]) -> &mut Self {
        self.store.remove_group_permissions(name, permissions);
        self
    }

    /// Deletes the group and drops it from every role's memberships.
    pub fn remove_group(&mut self, name: &str) -> &mut Self {
        self.store.remove_group(name);
        self
    }

    pub fn has_group(&self, name: &str) -> bool {
        self.store.has_group(name)
    }

    pub fn groups(&self) -> Vec<&str> {
        self.store.groups()
    }

    pub fn group_permissions(&self, name: &str) -> BTreeSet<Permission> {
        self.store.group_permissions(name)
    }

    // ------------------------------------------------------------------------
    // Roles
    // ------------------------------------------------------------------------

    /// Creates or extends a role. Fails without changing anything if a named
    /// group does not exist.
    pub fn add_role(&mut self, name: &str, permissions: &[&str], groups: &[&str]) -> Result<&mut Self> {
        self.store.add_role(name, permissions, groups)?;
        Ok(self)
    }

    pub fn remove_role_permissions(&mut self, name: &str, permissions: &[&str]) -> &mut Self {
        self.store.remove_role_permissions(name, permissions);
        self
    }

    pub fn remove_role(&mut self, name: &str) -> &mut Self {
        self.store.remove_role(name);
        self
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.store.has_role(name)
    }

    pub fn roles(&self) -> Vec<&str> {
        self.store.roles()
    }

    pub fn role_permissions(&self, name: &str) -> BTreeSet<Permission> {
        self.store.role_permissions(name)
    }

    pub fn role_groups(&self, name: &str) -> BTreeSet<String> {
        self.store.role_groups(name)
    }

    pub fn add_role_to_group(&mut self, role: &str, group: &str) -> Result<&mut Self> {
        self.store.add_role_to_group(role, group)?;
        Ok(self)
    }

    pub fn remove_role_from_group(&mut self, role: &str, group: &str) -> &mut Self {
        self.store.remove_role_from_group(role, group);
        self
    }

    // ------------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------------

    /// Returns the role's effective permissions (empty for unknown roles).
    pub fn permissions(&self, role: &str) -> BTreeSet<Permission> {
        self.store.permissions(role)
    }

    pub fn has_permission(&self, role: &str, permission: &str) -> bool {
        self.store.has_permission(role, permission)
    }

    pub fn has_some_permission(&self, role: &str, permissions: &[&str]) -> bool {
        self.store.has_some_permission(role, permissions)
    }

    pub fn has_every_permission(&self, role: &str, permissions: &[&str]) -> bool {
        self.store.has_every_permission(role, permissions)
    }

    // ------------------------------------------------------------------------
    // Rules
    // ------------------------------------------------------------------------

    /// Registers a closure as the rule for `permission`, replacing any
    /// previous rule.
    pub fn add_rule<F>(&mut self, permission: &str, rule: F) -> &mut Self
    where
        F: Fn(&Subject, Option<&Attributes>, Option<&Attributes>) -> bool + Send + Sync + 'static,
    {
        self.add_rule_object(permission, rule)
    }

    /// Registers any [`Rule`] implementation for `permission`.
    pub fn add_rule_object(&mut self, permission: &str, rule: impl Rule + 'static) -> &mut Self {
        let replaced = self.rules.insert(permission, rule);
        debug!(permission = %permission, replaced, "Rule registered");
        self
    }

    pub fn remove_rule(&mut self, permission: &str) -> &mut Self {
        if self.rules.remove(permission) {
            debug!(permission = %permission, "Rule removed");
        }
        self
    }

    pub fn has_rule(&self, permission: &str) -> bool {
        self.rules.contains(permission)
    }

    /// Returns every permission that has a rule.
    pub fn rules(&self) -> Vec<&str> {
        self.rules.permissions()
    }

    // ------------------------------------------------------------------------
    // Decisions
    // ------------------------------------------------------------------------

    /// Returns whether `subject` may use `permission`.
    ///
    /// The subject's role must hold the permission; if a rule is registered
    /// for it, the rule has the final word.
    pub fn can(
        &self,
        subject: &Subject,
        permission: &str,
        resource: Option<&Attributes>,
        context: Option<&Attributes>,
    ) -> bool {
        self.decide(subject, permission, resource, context).allowed
    }

    /// Like [`can`](Self::can), but explains the outcome.
    ///
    /// **Audit:** Logs every decision when auditing is enabled.
    pub fn decide(
        &self,
        subject: &Subject,
        permission: &str,
        resource: Option<&Attributes>,
        context: Option<&Attributes>,
    ) -> Decision {
        let decision = evaluator::evaluate(
            &self.store,
            &self.rules,
            subject,
            permission,
            resource,
            context,
        );

        if self.audit_enabled {
            if decision.allowed {
                info!(
                    role = %subject.role(),
                    permission = %permission,
                    rule = decision.rule_applied,
                    reason = %decision.reason,
                    "Access granted"
                );
            } else {
                warn!(
                    role = %subject.role(),
                    permission = %permission,
                    rule = decision.rule_applied,
                    reason = %decision.reason,
                    "Access denied"
                );
            }
        }

        decision
    }

    // ------------------------------------------------------------------------
    // Dump / Restore
    // ------------------------------------------------------------------------

    /// Exports roles and groups. Rules are never included.
    pub fn dump(&self) -> Dump {
        self.store.dump()
    }

    /// Exports roles and groups as JSON text.
    pub fn to_json(&self) -> Result<String> {
        Ok(self.store.dump().to_json()?)
    }

    /// Builds a fresh engine from a dump. The new engine has no rules;
    /// register them again after restoring.
    pub fn from_dump(dump: &Dump) -> Result<Self> {
        Ok(Self::with_store(RoleStore::restore(dump)?))
    }

    /// Builds a fresh engine from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(Self::with_store(RoleStore::from_json(text)?))
    }

    /// Builds a fresh engine from a parsed JSON document.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(Self::with_store(RoleStore::from_value(value)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_abac::Ownership;
    use gatehouse_rbac::RbacError;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn engine() -> AccessControl {
        AccessControl::new().without_audit()
    }

    #[test]
    fn test_chaining() {
        let mut ac = engine();
        ac.add_group("g", &["a"])
            .add_group("h", &["b"])
            .add_role("r", &["c"], &["g"])
            .unwrap()
            .add_role_to_group("r", "h")
            .unwrap()
            .remove_role_permissions("r", &["c"])
            .add_rule("a", |_, _, _| true);

        assert_eq!(ac.permissions("r").len(), 2);
        assert!(ac.has_rule("a"));
    }

    #[test]
    fn test_add_role_error_is_wrapped() {
        let mut ac = engine();
        match ac.add_role("r", &[], &["missing"]) {
            Err(AccessControlError::Rbac(RbacError::GroupNotFound { group })) => {
                assert_eq!(group, "missing");
            }
            _ => panic!("Expected GroupNotFound error"),
        }
    }

    #[test]
    fn test_rule_management() {
        let mut ac = engine();
        ac.add_rule("b", |_, _, _| true)
            .add_rule_object("a", Ownership::new("id", "ownerId"));

        assert_eq!(ac.rules(), vec!["a", "b"]);

        ac.remove_rule("b").remove_rule("never-registered");
        assert!(!ac.has_rule("b"));
        assert_eq!(ac.rules(), vec!["a"]);
    }

    #[test]
    fn test_decide_explains_outcome() {
        let mut ac = engine();
        ac.add_role("author", &["article:update"], &[]).unwrap();
        ac.add_rule("article:update", |_, _, _| false);

        let decision = ac.decide(&Subject::new("author"), "article:update", None, None);
        assert!(!decision.allowed);
        assert!(decision.rule_applied);
        assert!(!ac.can(&Subject::new("author"), "article:update", None, None));
    }

    #[test]
    fn test_audited_engine_decides_the_same() {
        let mut ac = AccessControl::new();
        ac.add_role("r", &["p"], &[]).unwrap();

        assert!(ac.can(&Subject::new("r"), "p", None, None));
        assert!(!ac.can(&Subject::new("r"), "q", None, None));
    }

    #[test]
    fn test_restore_drops_rules() {
        let mut ac = engine();
        ac.add_role("r", &["p"], &[]).unwrap();
        ac.add_rule("p", |_, _, _| false);
        assert!(!ac.can(&Subject::new("r"), "p", None, None));

        let restored = AccessControl::from_json(&ac.to_json().unwrap()).unwrap();

        assert!(restored.rules().is_empty());
        assert!(restored.can(&Subject::new("r"), "p", None, None));
    }

    #[test]
    fn test_from_config_without_seed() {
        let ac = AccessControl::from_config(&GatehouseConfig::quiet()).unwrap();
        assert!(ac.roles().is_empty());
        assert!(!ac.audit_enabled);
    }

    #[test]
    fn test_from_config_with_seed() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let seed = temp_dir.path().join("policy.json");
        fs::write(
            &seed,
            r#"{ "groups": { "editors": { "permissions": ["article:update"] } },
                 "roles": { "editor": { "memberOf": ["editors"] } } }"#,
        )
        .expect("Failed to write seed");

        let mut config = GatehouseConfig::default();
        config.seed.dump_path = Some(seed);

        let ac = AccessControl::from_config(&config).unwrap();
        assert!(ac.audit_enabled);
        assert!(ac.has_permission("editor", "article:update"));
    }

    #[test]
    fn test_from_config_seed_errors() {
        let temp_dir = tempdir().expect("Failed to create temp dir");

        let mut config = GatehouseConfig::quiet();
        config.seed.dump_path = Some(temp_dir.path().join("missing.json"));
        assert!(matches!(
            AccessControl::from_config(&config),
            Err(AccessControlError::SeedRead { .. })
        ));

        let bad = temp_dir.path().join("bad.json");
        fs::write(&bad, "not json").expect("Failed to write seed");
        config.seed.dump_path = Some(bad);
        assert!(matches!(
            AccessControl::from_config(&config),
            Err(AccessControlError::Rbac(RbacError::MalformedDump(_)))
        ));

        config.seed.dump_path = Some(PathBuf::new());
        assert!(matches!(
            AccessControl::from_config(&config),
            Err(AccessControlError::Config(_))
        ));
    }

    #[test]
    fn test_denied_role_never_runs_rule() {
        let mut ac = engine();
        ac.add_role("r", &[], &[]).unwrap();
        ac.add_rule("p", |_, _, _| panic!("rule exploded"));

        assert!(!ac.can(&Subject::new("r"), "p", None, None));
    }

    #[test]
    #[should_panic(expected = "rule exploded")]
    fn test_panicking_rule_unwinds_through_can() {
        let mut ac = engine();
        ac.add_role("r", &["p"], &[]).unwrap();
        ac.add_rule("p", |_, _, _| panic!("rule exploded"));

        assert!(ac.can(&Subject::new("r"), "p", None, None));
    }
}
