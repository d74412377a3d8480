//! Pattern constraint check

use serde::Deserialize;

use crate::checks::{parse_options, CheckOptions};
use crate::compare::{ComparisonResult, PropertyComparator};
use crate::config::{ConfigError, EnforcementPolicy};
use crate::schema::JsonSchemaProps;

/// How removal of a pattern constraint is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum RemovalPolicy {
    /// Removal is compatible (relaxes validation).
    Allow,

    /// Removal is incompatible (the constraint may be part of the contract).
    #[default]
    Disallow,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct PatternOptions {
    pub removal_policy: RemovalPolicy,
}

/// Flags added or changed `pattern` constraints, and removed ones under the
/// default removal policy.
#[derive(Debug, Default)]
pub struct PatternCheck {
    options: PatternOptions,
    enforcement: EnforcementPolicy,
}

impl PatternCheck {
    pub const NAME: &'static str = "pattern";

    pub fn from_options(options: &CheckOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            options: parse_options(Self::NAME, options)?,
            ..Default::default()
        })
    }
}

impl PropertyComparator for PatternCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_enforcement(&mut self, policy: EnforcementPolicy) {
        self.enforcement = policy;
    }

    fn compare(&self, old: &mut JsonSchemaProps, new: &mut JsonSchemaProps) -> ComparisonResult {
        let old_pattern = old.pattern.as_deref().unwrap_or("");
        let new_pattern = new.pattern.as_deref().unwrap_or("");

        let violation = match (old_pattern.is_empty(), new_pattern.is_empty()) {
            _ if old_pattern == new_pattern => None,
            (true, false) => Some(format!(
                "pattern \"{new_pattern}\" added when there was no pattern previously"
            )),
            (false, true) => (self.options.removal_policy == RemovalPolicy::Disallow)
                .then(|| format!("pattern \"{old_pattern}\" removed")),
            _ => Some(format!(
                "pattern changed from \"{old_pattern}\" to \"{new_pattern}\""
            )),
        };

        old.pattern = None;
        new.pattern = None;

        ComparisonResult::from_violation(self.name(), self.enforcement, violation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testutil::{assert_flagged, props};

    #[test]
    fn test_pattern_added_flagged() {
        assert_flagged(
            PatternCheck::default(),
            &props("type: string"),
            &props("{type: string, pattern: '^a+$'}"),
            true,
        );
    }

    #[test]
    fn test_pattern_changed_flagged() {
        assert_flagged(
            PatternCheck::default(),
            &props("pattern: '^a+$'"),
            &props("pattern: '^b+$'"),
            true,
        );
    }

    #[test]
    fn test_pattern_removed_flagged_by_default() {
        assert_flagged(
            PatternCheck::default(),
            &props("pattern: '^a+$'"),
            &props("type: string"),
            true,
        );
    }

    #[test]
    fn test_pattern_removal_allowed_by_policy() {
        let check = PatternCheck {
            options: PatternOptions {
                removal_policy: RemovalPolicy::Allow,
            },
            ..Default::default()
        };

        assert_flagged(check, &props("pattern: '^a+$'"), &props("type: string"), false);
    }

    #[test]
    fn test_pattern_claimed_even_when_removal_allowed() {
        let check = PatternCheck {
            options: PatternOptions {
                removal_policy: RemovalPolicy::Allow,
            },
            ..Default::default()
        };
        let mut old = props("pattern: '^a+$'");
        let mut new = props("type: string");

        check.compare(&mut old, &mut new);

        assert!(old.pattern.is_none());
        assert!(new.pattern.is_none());
    }
}
