//! Served-version validation pass
//!
//! Checks compatibility across the set of versions a CRD currently serves:
//! clients may read at any served version, so every ordered pair must stay
//! convertible. The same pairing is evaluated on the old CRD and any finding
//! already present there is subtracted, leaving only incompatibilities the
//! new revision introduces.

use crate::compare::{compare_versions, ComparisonResult, PropertyComparator, PropertyComparisonResult};
use crate::config::{ConversionPolicy, EnforcementPolicy};
use crate::flatten::FlattenError;
use crate::kubeversion::compare_kube_aware;
use crate::schema::{CustomResourceDefinition, CustomResourceDefinitionVersion};

use super::VersionedComparisonResult;

pub struct ServedVersionValidator {
    enabled: bool,
    comparators: Vec<Box<dyn PropertyComparator>>,
    unhandled_enforcement: EnforcementPolicy,
    conversion_policy: ConversionPolicy,
}

impl ServedVersionValidator {
    pub fn new(
        enabled: bool,
        comparators: Vec<Box<dyn PropertyComparator>>,
        unhandled_enforcement: EnforcementPolicy,
        conversion_policy: ConversionPolicy,
    ) -> Self {
        Self {
            enabled,
            comparators,
            unhandled_enforcement,
            conversion_policy,
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

        // A conversion webhook translates between served versions, so their
        // schemas are allowed to diverge when the policy says to trust it.
        if self.conversion_policy == ConversionPolicy::Ignore && new.has_conversion_webhook() {
            return Ok(Vec::new());
        }

        let new_results = self.compare_pairs(new)?;
        let old_results = self.compare_pairs(old)?;

        Ok(subtract_known_findings(new_results, &old_results))
    }

    /// Compare every ordered pair of served versions, oldest first, keyed
    /// `"vOld -> vNew"`.
    fn compare_pairs(
        &self,
        crd: &CustomResourceDefinition,
    ) -> Result<Vec<VersionedComparisonResult>, FlattenError> {
        let mut served: Vec<&CustomResourceDefinitionVersion> = crd.served_versions().collect();
        if served.len() < 2 {
            return Ok(Vec::new());
        }

        served.sort_by(|a, b| compare_kube_aware(&a.name, &b.name));

        let mut results = Vec::new();

        for (i, older) in served.iter().enumerate() {
            for newer in &served[i + 1..] {
                results.push(VersionedComparisonResult {
                    version: format!("{} -> {}", older.name, newer.name),
                    property_comparisons: compare_versions(
                        older,
                        newer,
                        self.unhandled_enforcement,
                        &self.comparators,
                    )?,
                });
            }
        }

        Ok(results)
    }
}

/// Remove from `results` every error and warning string that appears in
/// `baseline` under the same (version pair, property, check) triple.
fn subtract_known_findings(
    results: Vec<VersionedComparisonResult>,
    baseline: &[VersionedComparisonResult],
) -> Vec<VersionedComparisonResult> {
    results
        .into_iter()
        .map(|versioned| {
            let known = baseline.iter().find(|b| b.version == versioned.version);
            match known {
                None => versioned,
                Some(known) => VersionedComparisonResult {
                    version: versioned.version,
                    property_comparisons: subtract_known_properties(
                        versioned.property_comparisons,
                        &known.property_comparisons,
                    ),
                },
            }
        })
        .collect()
}

fn subtract_known_properties(
    results: Vec<PropertyComparisonResult>,
    baseline: &[PropertyComparisonResult],
) -> Vec<PropertyComparisonResult> {
    results
        .into_iter()
        .map(|property| {
            let known = baseline.iter().find(|b| b.property == property.property);
            match known {
                None => property,
                Some(known) => PropertyComparisonResult {
                    property: property.property,
                    comparison_results: subtract_known_comparisons(
                        property.comparison_results,
                        &known.comparison_results,
                    ),
                },
            }
        })
        .collect()
}

fn subtract_known_comparisons(
    results: Vec<ComparisonResult>,
    baseline: &[ComparisonResult],
) -> Vec<ComparisonResult> {
    results
        .into_iter()
        .map(|result| {
            let known = baseline.iter().find(|b| b.name == result.name);
            match known {
                None => result,
                Some(known) => ComparisonResult {
                    name: result.name,
                    errors: result
                        .errors
                        .into_iter()
                        .filter(|message| !known.errors.contains(message))
                        .collect(),
                    warnings: result
                        .warnings
                        .into_iter()
                        .filter(|message| !known.warnings.contains(message))
                        .collect(),
                },
            }
        })
        .collect()
}
