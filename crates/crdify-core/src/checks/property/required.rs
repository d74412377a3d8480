//! Required field-set check
//!
//! `required` is treated as a set: newly required names reject existing
//! objects that omit them, and names dropped from the set signal a contract
//! a consumer may still rely on. The two directions have independent gates.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::checks::{parse_options, CheckOptions};
use crate::compare::{ComparisonResult, PropertyComparator};
use crate::config::{ConfigError, EnforcementMode, EnforcementPolicy};
use crate::schema::JsonSchemaProps;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct RequiredOptions {
    /// Gate for names added to the required set.
    pub new_enforcement: EnforcementMode,

    /// Gate for names removed from the required set.
    pub removal_enforcement: EnforcementMode,
}

#[derive(Debug, Default)]
pub struct RequiredCheck {
    options: RequiredOptions,
    enforcement: EnforcementPolicy,
}

impl RequiredCheck {
    pub const NAME: &'static str = "required";

    pub fn from_options(options: &CheckOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            options: parse_options(Self::NAME, options)?,
            ..Default::default()
        })
    }
}

impl PropertyComparator for RequiredCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_enforcement(&mut self, policy: EnforcementPolicy) {
        self.enforcement = policy;
    }

    fn compare(&self, old: &mut JsonSchemaProps, new: &mut JsonSchemaProps) -> ComparisonResult {
        let old_required: BTreeSet<&String> = old.required.iter().collect();
        let new_required: BTreeSet<&String> = new.required.iter().collect();

        let mut violations = Vec::new();

        let added: Vec<&str> = new_required
            .difference(&old_required)
            .map(|name| name.as_str())
            .collect();
        if !added.is_empty() && self.options.new_enforcement.is_strict() {
            violations.push(format!("new required fields {added:?} added"));
        }

        let removed: Vec<&str> = old_required
            .difference(&new_required)
            .map(|name| name.as_str())
            .collect();
        if !removed.is_empty() && self.options.removal_enforcement.is_strict() {
            violations.push(format!("required fields {removed:?} removed"));
        }

        old.required = Vec::new();
        new.required = Vec::new();

        ComparisonResult::from_violations(self.name(), self.enforcement, violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testutil::{assert_flagged, props};

    #[test]
    fn test_new_required_field_flagged() {
        assert_flagged(
            RequiredCheck::default(),
            &props("required: [a]"),
            &props("required: [a, b]"),
            true,
        );
    }

    #[test]
    fn test_removed_required_field_flagged() {
        assert_flagged(
            RequiredCheck::default(),
            &props("required: [a, b]"),
            &props("required: [a]"),
            true,
        );
    }

    #[test]
    fn test_reordered_required_not_flagged() {
        assert_flagged(
            RequiredCheck::default(),
            &props("required: [a, b]"),
            &props("required: [b, a]"),
            false,
        );
    }

    #[test]
    fn test_gates_are_independent() {
        let additions_only = RequiredCheck {
            options: RequiredOptions {
                new_enforcement: EnforcementMode::Strict,
                removal_enforcement: EnforcementMode::None,
            },
            ..Default::default()
        };
        assert_flagged(additions_only, &props("required: [a, b]"), &props("required: [a]"), false);

        let removals_only = RequiredCheck {
            options: RequiredOptions {
                new_enforcement: EnforcementMode::None,
                removal_enforcement: EnforcementMode::Strict,
            },
            ..Default::default()
        };
        assert_flagged(removals_only, &props("required: [a]"), &props("required: [a, b]"), false);
    }

    #[test]
    fn test_required_claimed_on_both_sides() {
        let mut old = props("required: [a]");
        let mut new = props("required: [b]");

        RequiredCheck::default().compare(&mut old, &mut new);

        assert!(old.required.is_empty());
        assert!(new.required.is_empty());
    }
}
