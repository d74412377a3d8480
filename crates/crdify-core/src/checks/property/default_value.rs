//! Default value check

use serde::Deserialize;

use crate::checks::{parse_options, CheckOptions};
use crate::compare::{ComparisonResult, PropertyComparator};
use crate::config::{ConfigError, EnforcementMode, EnforcementPolicy};
use crate::schema::JsonSchemaProps;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct DefaultOptions {
    pub change_enforcement: EnforcementMode,
    pub removal_enforcement: EnforcementMode,
    pub addition_enforcement: EnforcementMode,
}

/// Flags added, removed, or changed `default` values. The API server applies
/// defaults on write, so changing one silently changes persisted objects.
#[derive(Debug, Default)]
pub struct DefaultCheck {
    options: DefaultOptions,
    enforcement: EnforcementPolicy,
}

impl DefaultCheck {
    pub const NAME: &'static str = "default";

    pub fn from_options(options: &CheckOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            options: parse_options(Self::NAME, options)?,
            ..Default::default()
        })
    }
}

impl PropertyComparator for DefaultCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_enforcement(&mut self, policy: EnforcementPolicy) {
        self.enforcement = policy;
    }

    fn compare(&self, old: &mut JsonSchemaProps, new: &mut JsonSchemaProps) -> ComparisonResult {
        let violation = match (&old.default, &new.default) {
            (None, Some(added)) if self.options.addition_enforcement.is_strict() => Some(format!(
                "default value {} added when there was no default previously",
                render(added)
            )),
            (Some(removed), None) if self.options.removal_enforcement.is_strict() => {
                Some(format!("default value {} removed", render(removed)))
            }
            (Some(before), Some(after))
                if before != after && self.options.change_enforcement.is_strict() =>
            {
                Some(format!(
                    "default value changed from {} to {}",
                    render(before),
                    render(after)
                ))
            }
            _ => None,
        };

        old.default = None;
        new.default = None;

        ComparisonResult::from_violation(self.name(), self.enforcement, violation)
    }
}

fn render(value: &serde_json::Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testutil::{assert_flagged, props};

    #[test]
    fn test_default_added_flagged() {
        assert_flagged(
            DefaultCheck::default(),
            &props("type: string"),
            &props("{type: string, default: foo}"),
            true,
        );
    }

    #[test]
    fn test_default_removed_flagged() {
        assert_flagged(
            DefaultCheck::default(),
            &props("{type: string, default: foo}"),
            &props("type: string"),
            true,
        );
    }

    #[test]
    fn test_default_changed_message() {
        let check = DefaultCheck::default();
        let mut old = props("default: foo");
        let mut new = props("default: bar");

        let result = check.compare(&mut old, &mut new);
        assert_eq!(
            result.errors,
            vec!["default value changed from \"foo\" to \"bar\"".to_string()]
        );
        assert!(old.default.is_none());
        assert!(new.default.is_none());
    }

    #[test]
    fn test_structured_default_compared_semantically() {
        assert_flagged(
            DefaultCheck::default(),
            &props("default: {a: 1, b: 2}"),
            &props("default: {b: 2, a: 1}"),
            false,
        );
    }

    #[test]
    fn test_addition_gate_none_silences() {
        let check = DefaultCheck {
            options: DefaultOptions {
                addition_enforcement: EnforcementMode::None,
                ..Default::default()
            },
            ..Default::default()
        };

        assert_flagged(check, &props("type: string"), &props("default: foo"), false);
    }
}
