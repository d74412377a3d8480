//! Whole-CRD checks
//!
//! These operate on the complete old/new CustomResourceDefinition pair rather
//! than on per-path schema diffs: resource scope, removal of fields that
//! exist in a served version, and removal of versions still recorded as
//! stored.

use std::collections::BTreeSet;

use crate::compare::{ComparisonResult, CrdComparator};
use crate::config::{ConfigError, EnforcementPolicy};
use crate::flatten::{flatten_version, FlattenError};
use crate::schema::CustomResourceDefinition;

use super::{ensure_no_options, CheckOptions};

/// Flags a change of `spec.scope` (Namespaced <-> Cluster). Existing objects
/// of the old scope cannot be reinterpreted, so this is always a breaking
/// change.
#[derive(Debug, Default)]
pub struct ScopeCheck {
    enforcement: EnforcementPolicy,
}

impl ScopeCheck {
    pub const NAME: &'static str = "scope";

    pub fn from_options(options: &CheckOptions) -> Result<Self, ConfigError> {
        ensure_no_options(Self::NAME, options)?;
        Ok(Self::default())
    }
}

impl CrdComparator for ScopeCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_enforcement(&mut self, policy: EnforcementPolicy) {
        self.enforcement = policy;
    }

    fn compare(
        &self,
        old: &CustomResourceDefinition,
        new: &CustomResourceDefinition,
    ) -> Result<ComparisonResult, FlattenError> {
        let violation = (old.spec.scope != new.spec.scope).then(|| {
            format!(
                "scope changed from \"{}\" to \"{}\"",
                old.spec.scope, new.spec.scope
            )
        });

        Ok(ComparisonResult::from_violation(
            self.name(),
            self.enforcement,
            violation,
        ))
    }
}

/// Flags removal of any schema path that exists in a version shared by both
/// revisions. Persisted objects may still carry the field.
#[derive(Debug, Default)]
pub struct ExistingFieldRemovalCheck {
    enforcement: EnforcementPolicy,
}

impl ExistingFieldRemovalCheck {
    pub const NAME: &'static str = "existingFieldRemoval";

    pub fn from_options(options: &CheckOptions) -> Result<Self, ConfigError> {
        ensure_no_options(Self::NAME, options)?;
        Ok(Self::default())
    }
}

impl CrdComparator for ExistingFieldRemovalCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_enforcement(&mut self, policy: EnforcementPolicy) {
        self.enforcement = policy;
    }

    fn compare(
        &self,
        old: &CustomResourceDefinition,
        new: &CustomResourceDefinition,
    ) -> Result<ComparisonResult, FlattenError> {
        let mut violations = Vec::new();

        for new_version in &new.spec.versions {
            let Some(old_version) = old.version(&new_version.name) else {
                continue;
            };

            let old_paths: BTreeSet<String> =
                flatten_version(old_version)?.into_keys().collect();
            let new_paths: BTreeSet<String> =
                flatten_version(new_version)?.into_keys().collect();

            for removed in old_paths.difference(&new_paths) {
                violations.push(format!(
                    "crd/{} version/{} field/{} may not be removed",
                    new.name(),
                    new_version.name,
                    removed
                ));
            }
        }

        Ok(ComparisonResult::from_violations(
            self.name(),
            self.enforcement,
            violations,
        ))
    }
}

/// Flags removal of versions that the API server has persisted objects at
/// (`status.storedVersions`). Dropping one strands stored data.
#[derive(Debug, Default)]
pub struct StoredVersionRemovalCheck {
    enforcement: EnforcementPolicy,
}

impl StoredVersionRemovalCheck {
    pub const NAME: &'static str = "storedVersionRemoval";

    pub fn from_options(options: &CheckOptions) -> Result<Self, ConfigError> {
        ensure_no_options(Self::NAME, options)?;
        Ok(Self::default())
    }
}

impl CrdComparator for StoredVersionRemovalCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_enforcement(&mut self, policy: EnforcementPolicy) {
        self.enforcement = policy;
    }

    fn compare(
        &self,
        old: &CustomResourceDefinition,
        new: &CustomResourceDefinition,
    ) -> Result<ComparisonResult, FlattenError> {
        let new_versions: BTreeSet<&str> = new
            .spec
            .versions
            .iter()
            .map(|v| v.name.as_str())
            .collect();

        let removed: Vec<&str> = old
            .status
            .stored_versions
            .iter()
            .map(String::as_str)
            .filter(|stored| !new_versions.contains(stored))
            .collect();

        let violation = (!removed.is_empty())
            .then(|| format!("stored versions {removed:?} removed"));

        Ok(ComparisonResult::from_violation(
            self.name(),
            self.enforcement,
            violation,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crd(yaml: &str) -> CustomResourceDefinition {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn namespaced_crd_with_properties(properties: &str) -> CustomResourceDefinition {
        crd(&format!(
            r#"
metadata:
  name: widgets.example.com
spec:
  group: example.com
  scope: Namespaced
  versions:
    - name: v1alpha1
      served: true
      storage: true
      schema:
        openAPIV3Schema:
          type: object
          properties:
{properties}
"#,
        ))
    }

    #[test]
    fn test_scope_change_flagged() {
        let old = crd(
            r#"
metadata: {name: widgets.example.com}
spec:
  scope: Cluster
  versions: []
"#,
        );
        let new = crd(
            r#"
metadata: {name: widgets.example.com}
spec:
  scope: Namespaced
  versions: []
"#,
        );

        let mut check = ScopeCheck::default();
        check.set_enforcement(EnforcementPolicy::Error);

        let result = check.compare(&old, &new).unwrap();
        assert_eq!(
            result.errors,
            vec!["scope changed from \"Cluster\" to \"Namespaced\"".to_string()]
        );

        let result = check.compare(&old, &old).unwrap();
        assert!(result.is_zero());
    }

    #[test]
    fn test_existing_field_removal_flagged() {
        let old = namespaced_crd_with_properties(
            "            a: {type: string}\n            b: {type: string}",
        );
        let new = namespaced_crd_with_properties("            a: {type: string}");

        let mut check = ExistingFieldRemovalCheck::default();
        check.set_enforcement(EnforcementPolicy::Error);

        let result = check.compare(&old, &new).unwrap();
        assert_eq!(
            result.errors,
            vec![
                "crd/widgets.example.com version/v1alpha1 field/^.b may not be removed"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_existing_field_removal_ignores_unshared_versions() {
        let old = namespaced_crd_with_properties("            a: {type: string}");
        let mut new = namespaced_crd_with_properties("            a: {type: string}");
        new.spec.versions[0].name = "v1beta1".to_string();

        let mut check = ExistingFieldRemovalCheck::default();
        check.set_enforcement(EnforcementPolicy::Error);

        assert!(check.compare(&old, &new).unwrap().is_zero());
    }

    #[test]
    fn test_stored_version_removal_flagged() {
        let old = crd(
            r#"
metadata: {name: widgets.example.com}
spec:
  versions:
    - {name: v1alpha1, served: true, storage: false}
    - {name: v1, served: true, storage: true}
status:
  storedVersions: [v1alpha1, v1]
"#,
        );
        let new = crd(
            r#"
metadata: {name: widgets.example.com}
spec:
  versions:
    - {name: v1, served: true, storage: true}
"#,
        );

        let mut check = StoredVersionRemovalCheck::default();
        check.set_enforcement(EnforcementPolicy::Error);

        let result = check.compare(&old, &new).unwrap();
        assert_eq!(
            result.errors,
            vec!["stored versions [\"v1alpha1\"] removed".to_string()]
        );
    }

    #[test]
    fn test_stored_version_removal_warn_policy() {
        let old = crd(
            r#"
metadata: {name: widgets.example.com}
spec:
  versions: []
status:
  storedVersions: [v1]
"#,
        );
        let new = crd(
            r#"
metadata: {name: widgets.example.com}
spec:
  versions: []
"#,
        );

        let mut check = StoredVersionRemovalCheck::default();
        check.set_enforcement(EnforcementPolicy::Warn);

        let result = check.compare(&old, &new).unwrap();
        assert!(result.errors.is_empty());
        assert_eq!(result.warnings.len(), 1);
    }
}
