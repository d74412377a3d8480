//! Top-level entry point
//!
//! `Runner::new` resolves the registry against a validated config,
//! constructing the three validators with their enforcement-stamped,
//! option-bound check sets. `Runner::run` is pure: it takes the two CRDs and
//! returns the structured result tree, which renders to JSON, YAML, plain
//! text, or Markdown with zero results dropped and deterministic ordering.

use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::compare::{ComparisonResult, PropertyComparisonResult};
use crate::config::{CheckEntry, Config, ConfigError, ConversionPolicy, EnforcementPolicy};
use crate::flatten::FlattenError;
use crate::registry::{Check, Registry};
use crate::schema::CustomResourceDefinition;
use crate::validators::{
    CrdValidator, SameVersionValidator, ServedVersionValidator, VersionedComparisonResult,
};

/// Executes the whole-CRD, same-version, and served-version passes.
pub struct Runner {
    crd_validator: CrdValidator,
    same_version_validator: SameVersionValidator,
    served_version_validator: ServedVersionValidator,
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner").finish_non_exhaustive()
    }
}

impl Runner {
    /// Build a runner from the config and the default check registry.
    pub fn new(config: &Config) -> Result<Runner, ConfigError> {
        Self::with_registry(config, &Registry::default())
    }

    /// Build a runner resolving checks out of the provided registry.
    pub fn with_registry(config: &Config, registry: &Registry) -> Result<Runner, ConfigError> {
        let crd_validator = CrdValidator::new(build_crd_cohort(config, registry)?);

        let same = &config.checks.same_version;
        let same_version_validator = SameVersionValidator::new(
            same.enabled.unwrap_or(true),
            build_property_cohort("sameVersion", same.enforcement, &same.checks, registry)?,
            config.unhandled_enforcement,
        );

        let served = &config.checks.served_version;
        let conversion_policy = if served.ignore_conversion == Some(true) {
            ConversionPolicy::Ignore
        } else {
            config.conversion
        };
        let served_version_validator = ServedVersionValidator::new(
            served.enabled.unwrap_or(true),
            build_property_cohort("servedVersion", served.enforcement, &served.checks, registry)?,
            config.unhandled_enforcement,
            conversion_policy,
        );

        Ok(Runner {
            crd_validator,
            same_version_validator,
            served_version_validator,
        })
    }

    /// Run every configured pass. Pure: no IO, inputs are not modified.
    pub fn run(
        &self,
        old: &CustomResourceDefinition,
        new: &CustomResourceDefinition,
    ) -> Result<Results, FlattenError> {
        Ok(Results {
            crd_validation: self.crd_validator.validate(old, new)?,
            same_version_validation: self.same_version_validator.validate(old, new)?,
            served_version_validation: self.served_version_validator.validate(old, new)?,
        })
    }
}

fn build_crd_cohort(
    config: &Config,
    registry: &Registry,
) -> Result<Vec<Box<dyn crate::compare::CrdComparator>>, ConfigError> {
    let crd = &config.checks.crd;
    let entries: [(&str, &CheckEntry); 3] = [
        ("scope", &crd.scope),
        ("existingFieldRemoval", &crd.existing_field_removal),
        ("storedVersionRemoval", &crd.stored_version_removal),
    ];

    let mut comparators = Vec::new();

    for (name, entry) in entries {
        if !entry.is_enabled() {
            continue;
        }

        match registry.build(name, &entry.options)? {
            Check::Crd(mut comparator) => {
                if let Some(policy) = entry.enforcement {
                    comparator.set_enforcement(policy);
                }
                comparators.push(comparator);
            }
            Check::Property(_) => {
                return Err(ConfigError::WrongCohort {
                    name: name.to_string(),
                    cohort: "crd",
                })
            }
        }
    }

    Ok(comparators)
}

fn build_property_cohort(
    cohort: &'static str,
    cohort_enforcement: Option<EnforcementPolicy>,
    configured: &std::collections::BTreeMap<String, CheckEntry>,
    registry: &Registry,
) -> Result<Vec<Box<dyn crate::compare::PropertyComparator>>, ConfigError> {
    // Reject unknown names up front so a typo fails the whole run rather
    // than silently leaving a check unconfigured.
    for name in configured.keys() {
        if !registry.contains(name) {
            return Err(ConfigError::UnknownCheck {
                name: name.clone(),
                known: registry.names().collect::<Vec<_>>().join(", "),
            });
        }
    }

    let mut comparators = Vec::new();

    for name in registry.names().collect::<Vec<_>>() {
        let entry = configured.get(name);
        let resolved = entry.cloned().unwrap_or_default();
        if !resolved.is_enabled() {
            continue;
        }

        match registry.build(name, &resolved.options)? {
            Check::Property(mut comparator) => {
                if let Some(policy) = resolved.enforcement.or(cohort_enforcement) {
                    comparator.set_enforcement(policy);
                }
                comparators.push(comparator);
            }
            Check::Crd(_) => {
                // CRD-scoped checks never participate in property cohorts;
                // configuring one here is a mistake worth surfacing.
                if entry.is_some() {
                    return Err(ConfigError::WrongCohort {
                        name: name.to_string(),
                        cohort,
                    });
                }
            }
        }
    }

    Ok(comparators)
}

/// Output format for rendered results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    PlainText,
    Markdown,
}

impl FromStr for Format {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Format::Json),
            "yaml" => Ok(Format::Yaml),
            "plaintext" => Ok(Format::PlainText),
            "markdown" => Ok(Format::Markdown),
            other => Err(RenderError::UnknownFormat {
                format: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown render format {format:?}; supported formats are plaintext, markdown, json, yaml")]
    UnknownFormat { format: String },

    #[error("encoding results as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("encoding results as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// The structured outcome of one comparison run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Results {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub crd_validation: Vec<ComparisonResult>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub same_version_validation: Vec<VersionedComparisonResult>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub served_version_validation: Vec<VersionedComparisonResult>,
}

impl Results {
    /// True when any check anywhere recorded an error.
    pub fn has_failures(&self) -> bool {
        let versioned_failure = |results: &[VersionedComparisonResult]| {
            results.iter().any(|versioned| {
                versioned.property_comparisons.iter().any(|property| {
                    property
                        .comparison_results
                        .iter()
                        .any(|result| !result.errors.is_empty())
                })
            })
        };

        self.crd_validation
            .iter()
            .any(|result| !result.errors.is_empty())
            || versioned_failure(&self.same_version_validation)
            || versioned_failure(&self.served_version_validation)
    }

    /// Render the results in the requested format. Zero results are dropped
    /// and all sequences sorted, so equal inputs produce identical output.
    pub fn render(&self, format: Format) -> Result<String, RenderError> {
        let sanitized = self.sanitized();

        match format {
            Format::Json => Ok(serde_json::to_string_pretty(&sanitized)?),
            Format::Yaml => Ok(serde_yaml::to_string(&sanitized)?),
            Format::PlainText => Ok(sanitized.render_plain_text()),
            Format::Markdown => Ok(sanitized.render_markdown()),
        }
    }

    /// A copy with zero results removed and every sequence sorted by
    /// name/path/version.
    fn sanitized(&self) -> Results {
        let mut crd_validation: Vec<ComparisonResult> = self
            .crd_validation
            .iter()
            .filter(|result| !result.is_zero())
            .cloned()
            .collect();
        crd_validation.sort_by(|a, b| a.name.cmp(&b.name));

        Results {
            crd_validation,
            same_version_validation: sanitize_versioned(&self.same_version_validation),
            served_version_validation: sanitize_versioned(&self.served_version_validation),
        }
    }

    fn render_plain_text(&self) -> String {
        let mut out = String::new();

        for result in &self.crd_validation {
            for message in &result.errors {
                out.push_str(&format!("- {} - ERROR - {}\n", result.name, message));
            }
            for message in &result.warnings {
                out.push_str(&format!("- {} - WARNING - {}\n", result.name, message));
            }
        }

        self.each_versioned(|version, property, result| {
            for message in &result.errors {
                out.push_str(&format!(
                    "- {} - {} - {} - ERROR - {}\n",
                    version, property, result.name, message
                ));
            }
            for message in &result.warnings {
                out.push_str(&format!(
                    "- {} - {} - {} - WARNING - {}\n",
                    version, property, result.name, message
                ));
            }
        });

        out
    }

    fn render_markdown(&self) -> String {
        let mut out = String::new();

        for result in &self.crd_validation {
            for message in &result.errors {
                out.push_str(&format!("- **{}** - `ERROR` - {}\n", result.name, message));
            }
            for message in &result.warnings {
                out.push_str(&format!("- **{}** - `WARNING` - {}\n", result.name, message));
            }
        }

        self.each_versioned(|version, property, result| {
            for message in &result.errors {
                out.push_str(&format!(
                    "- **{}** - *{}* - {} - `ERROR` - {}\n",
                    version, property, result.name, message
                ));
            }
            for message in &result.warnings {
                out.push_str(&format!(
                    "- **{}** - *{}* - {} - `WARNING` - {}\n",
                    version, property, result.name, message
                ));
            }
        });

        out
    }

    fn each_versioned(&self, mut visit: impl FnMut(&str, &str, &ComparisonResult)) {
        for cohort in [&self.same_version_validation, &self.served_version_validation] {
            for versioned in cohort {
                for property in &versioned.property_comparisons {
                    for result in &property.comparison_results {
                        visit(&versioned.version, &property.property, result);
                    }
                }
            }
        }
    }
}

fn sanitize_versioned(results: &[VersionedComparisonResult]) -> Vec<VersionedComparisonResult> {
    let mut out: Vec<VersionedComparisonResult> = results
        .iter()
        .filter_map(|versioned| {
            let mut properties: Vec<PropertyComparisonResult> = versioned
                .property_comparisons
                .iter()
                .filter_map(|property| {
                    let mut comparisons: Vec<ComparisonResult> = property
                        .comparison_results
                        .iter()
                        .filter(|result| !result.is_zero())
                        .cloned()
                        .collect();
                    if comparisons.is_empty() {
                        return None;
                    }
                    comparisons.sort_by(|a, b| a.name.cmp(&b.name));

                    Some(PropertyComparisonResult {
                        property: property.property.clone(),
                        comparison_results: comparisons,
                    })
                })
                .collect();

            if properties.is_empty() {
                return None;
            }
            properties.sort_by(|a, b| a.property.cmp(&b.property));

            Some(VersionedComparisonResult {
                version: versioned.version.clone(),
                property_comparisons: properties,
            })
        })
        .collect();

    out.sort_by(|a, b| a.version.cmp(&b.version));
    out
}
