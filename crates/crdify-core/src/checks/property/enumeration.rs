//! Enum constraint check

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::checks::{join_values, parse_options, CheckOptions};
use crate::compare::{ComparisonResult, PropertyComparator};
use crate::config::{ConfigError, EnforcementPolicy};
use crate::schema::JsonSchemaProps;

/// How additions to an existing enum set are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum AdditionPolicy {
    /// Additions are compatible.
    Allow,

    /// Additions are incompatible.
    #[default]
    Disallow,

    /// Additions are compatible only when the old revision already
    /// constrained the property.
    IfPreviouslyConstrained,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct EnumOptions {
    pub addition_policy: AdditionPolicy,
}

/// Flags enum transitions: constraining a previously unconstrained property,
/// removing allowed values, and (per the addition policy) adding values.
#[derive(Debug, Default)]
pub struct EnumCheck {
    options: EnumOptions,
    enforcement: EnforcementPolicy,
}

impl EnumCheck {
    pub const NAME: &'static str = "enum";

    pub fn from_options(options: &CheckOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            options: parse_options(Self::NAME, options)?,
            ..Default::default()
        })
    }
}

impl PropertyComparator for EnumCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_enforcement(&mut self, policy: EnforcementPolicy) {
        self.enforcement = policy;
    }

    fn compare(&self, old: &mut JsonSchemaProps, new: &mut JsonSchemaProps) -> ComparisonResult {
        let old_values = value_set(&old.enum_);
        let new_values = value_set(&new.enum_);

        let mut violations = Vec::new();

        if old_values.is_empty() && !new_values.is_empty() {
            violations.push(format!(
                "enum constraints {} added when there were no restrictions previously",
                join_values(new_values.iter().cloned())
            ));
        } else {
            let removed: Vec<String> =
                old_values.difference(&new_values).cloned().collect();
            if !removed.is_empty() {
                violations.push(format!(
                    "enums {} removed from the set of previously allowed values",
                    join_values(removed)
                ));
            }

            let added: Vec<String> = new_values.difference(&old_values).cloned().collect();
            if !added.is_empty() && self.flags_additions() {
                violations.push(format!(
                    "enums {} added to the set of previously allowed values",
                    join_values(added)
                ));
            }
        }

        old.enum_ = Vec::new();
        new.enum_ = Vec::new();

        ComparisonResult::from_violations(self.name(), self.enforcement, violations)
    }
}

impl EnumCheck {
    // Additions only reach this point when the old set was non-empty, so
    // IfPreviouslyConstrained always permits them here.
    fn flags_additions(&self) -> bool {
        match self.options.addition_policy {
            AdditionPolicy::Disallow => true,
            AdditionPolicy::Allow | AdditionPolicy::IfPreviouslyConstrained => false,
        }
    }
}

fn value_set(values: &[serde_json::Value]) -> BTreeSet<String> {
    values
        .iter()
        .map(|value| serde_json::to_string(value).unwrap_or_else(|_| value.to_string()))
        .collect()
}
