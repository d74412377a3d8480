//! Same-version validation pass
//!
//! Compares each version name present in both CRDs against itself. Versions
//! missing from the new CRD are skipped here; their removal is the business
//! of the CRD-scope checks (`existingFieldRemoval`, `storedVersionRemoval`).

use crate::compare::{compare_versions, PropertyComparator};
use crate::config::EnforcementPolicy;
use crate::flatten::FlattenError;
use crate::schema::CustomResourceDefinition;

use super::VersionedComparisonResult;

pub struct SameVersionValidator {
    enabled: bool,
    comparators: Vec<Box<dyn PropertyComparator>>,
    unhandled_enforcement: EnforcementPolicy,
}

impl SameVersionValidator {
    pub fn new(
        enabled: bool,
        comparators: Vec<Box<dyn PropertyComparator>>,
        unhandled_enforcement: EnforcementPolicy,
    ) -> Self {
        Self {
            enabled,
            comparators,
            unhandled_enforcement,
        }
    }

    pub fn validate(
        &self,
        old: &CustomResourceDefinition,
        new: &CustomResourceDefinition,
    ) -> Result<Vec<VersionedComparisonResult>, FlattenError> {
        if !self.enabled {
            return Ok(Vec::new());
        }

        let mut results = Vec::new();

        for old_version in &old.spec.versions {
            let Some(new_version) = new.version(&old_version.name) else {
                continue;
            };

            results.push(VersionedComparisonResult {
                version: old_version.name.clone(),
                property_comparisons: compare_versions(
                    old_version,
                    new_version,
                    self.unhandled_enforcement,
                    &self.comparators,
                )?,
            });
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::property::TypeCheck;

    fn crd(yaml: &str) -> CustomResourceDefinition {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn validator() -> SameVersionValidator {
        SameVersionValidator::new(
            true,
            vec![Box::new(TypeCheck::default())],
            EnforcementPolicy::Error,
        )
    }

    #[test]
    fn test_shared_version_compared() {
        let old = crd(
            r#"
metadata: {name: widgets.example.com}
spec:
  versions:
    - name: v1
      served: true
      storage: true
      schema:
        openAPIV3Schema:
          type: object
          properties:
            replicas: {type: integer}
"#,
        );
        let new = crd(
            r#"
metadata: {name: widgets.example.com}
spec:
  versions:
    - name: v1
      served: true
      storage: true
      schema:
        openAPIV3Schema:
          type: object
          properties:
            replicas: {type: string}
"#,
        );

        let results = validator().validate(&old, &new).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].version, "v1");

        let property = &results[0].property_comparisons[0];
        assert_eq!(property.property, "^.replicas");
        let type_result = property
            .comparison_results
            .iter()
            .find(|r| r.name == "type")
            .unwrap();
        assert_eq!(
            type_result.errors,
            vec!["type changed from \"integer\" to \"string\"".to_string()]
        );
    }

    #[test]
    fn test_removed_version_skipped() {
        let old = crd(
            r#"
metadata: {name: widgets.example.com}
spec:
  versions:
    - {name: v1alpha1, served: true, storage: true}
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

        assert!(validator().validate(&old, &new).unwrap().is_empty());
    }

    #[test]
    fn test_disabled_pass_yields_nothing() {
        let validator = SameVersionValidator::new(false, Vec::new(), EnforcementPolicy::Error);
        let crd = crd(
            r#"
metadata: {name: widgets.example.com}
spec:
  versions: []
"#,
        );

        assert!(validator.validate(&crd, &crd).unwrap().is_empty());
    }
}
