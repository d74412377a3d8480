//! Comparator protocol
//!
//! A comparator inspects one pair of values (whole CRDs, or per-path
//! sub-schemas), claims the fields it understands, and reports violations
//! through its configured enforcement policy. Property comparators receive
//! mutable deep copies and must clear every field they inspect, so that the
//! trailing unhandled check can decide whether anything escaped the
//! configured checks by simply comparing the residues.

use serde::Serialize;

use crate::config::EnforcementPolicy;
use crate::diff::diff_flattened;
use crate::flatten::{flatten_version, FlattenError};
use crate::schema::{CustomResourceDefinition, CustomResourceDefinitionVersion, JsonSchemaProps};

/// Name under which unhandled residual changes are reported.
pub const UNHANDLED_NAME: &str = "unhandled";

/// The outcome of a single comparator run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub name: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ComparisonResult {
    /// Route a set of violation messages according to the enforcement policy:
    /// `Error` records them as errors, `Warn` as warnings, `None` drops them.
    pub fn from_violations(
        name: &str,
        policy: EnforcementPolicy,
        violations: Vec<String>,
    ) -> Self {
        let mut result = ComparisonResult {
            name: name.to_string(),
            ..Default::default()
        };

        match policy {
            EnforcementPolicy::Error => result.errors = violations,
            EnforcementPolicy::Warn => result.warnings = violations,
            EnforcementPolicy::None => {}
        }

        result
    }

    /// Shorthand for a result carrying at most one violation.
    pub fn from_violation(
        name: &str,
        policy: EnforcementPolicy,
        violation: Option<String>,
    ) -> Self {
        Self::from_violations(name, policy, violation.into_iter().collect())
    }

    /// True when the comparator found nothing to report. Zero results are
    /// dropped from rendered output.
    pub fn is_zero(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// A comparator over whole CustomResourceDefinitions.
///
/// Comparison is fallible only because checks that walk version schemas
/// inherit the flattener's depth guard.
pub trait CrdComparator {
    fn name(&self) -> &'static str;

    fn set_enforcement(&mut self, policy: EnforcementPolicy);

    fn compare(
        &self,
        old: &CustomResourceDefinition,
        new: &CustomResourceDefinition,
    ) -> Result<ComparisonResult, FlattenError>;
}

/// A comparator over a single pair of detached sub-schemas.
///
/// Implementations must clear every field they inspect on both arguments
/// before returning, whether or not a violation was found.
pub trait PropertyComparator {
    fn name(&self) -> &'static str;

    fn set_enforcement(&mut self, policy: EnforcementPolicy);

    fn compare(&self, old: &mut JsonSchemaProps, new: &mut JsonSchemaProps) -> ComparisonResult;
}

/// The set of comparison results for one property path.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyComparisonResult {
    /// Canonical path of the property the results apply to.
    pub property: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comparison_results: Vec<ComparisonResult>,
}

impl PropertyComparisonResult {
    pub fn is_zero(&self) -> bool {
        self.comparison_results.iter().all(ComparisonResult::is_zero)
    }
}

/// Compare one pair of detached sub-schemas with the provided comparators,
/// then check for residual, unhandled changes.
///
/// A side missing from the diff is treated as the empty schema, so removals
/// and additions flow through the same comparator logic as changes.
pub fn compare_properties(
    old: Option<&JsonSchemaProps>,
    new: Option<&JsonSchemaProps>,
    unhandled_enforcement: EnforcementPolicy,
    comparators: &[Box<dyn PropertyComparator>],
) -> Vec<ComparisonResult> {
    let mut old_copy = old.cloned().unwrap_or_default();
    let mut new_copy = new.cloned().unwrap_or_default();

    let mut results: Vec<ComparisonResult> = comparators
        .iter()
        .map(|comparator| comparator.compare(&mut old_copy, &mut new_copy))
        .collect();

    // The unhandled check always runs last, against whatever the claim-driven
    // comparators left behind.
    results.push(check_unhandled(&old_copy, &new_copy, unhandled_enforcement));

    results
}

/// Flatten and diff two versions, comparing every differing property.
pub fn compare_versions(
    old: &CustomResourceDefinitionVersion,
    new: &CustomResourceDefinitionVersion,
    unhandled_enforcement: EnforcementPolicy,
    comparators: &[Box<dyn PropertyComparator>],
) -> Result<Vec<PropertyComparisonResult>, FlattenError> {
    let old_flattened = flatten_version(old)?;
    let new_flattened = flatten_version(new)?;

    let results = diff_flattened(&old_flattened, &new_flattened)
        .into_iter()
        .map(|(property, diff)| PropertyComparisonResult {
            property,
            comparison_results: compare_properties(
                diff.old.as_ref(),
                diff.new.as_ref(),
                unhandled_enforcement,
                comparators,
            ),
        })
        .collect();

    Ok(results)
}

fn check_unhandled(
    old: &JsonSchemaProps,
    new: &JsonSchemaProps,
    enforcement: EnforcementPolicy,
) -> ComparisonResult {
    let violation = if old.semantic_eq(new) {
        None
    } else {
        Some(format!(
            "unhandled changes found:\n  old: {}\n  new: {}",
            render_schema(old),
            render_schema(new),
        ))
    };

    ComparisonResult::from_violation(UNHANDLED_NAME, enforcement, violation)
}

fn render_schema(schema: &JsonSchemaProps) -> String {
    serde_json::to_string(schema).unwrap_or_else(|_| format!("{schema:?}"))
}
