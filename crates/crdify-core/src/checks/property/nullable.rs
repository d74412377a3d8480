//! Nullable constraint check

use serde::Deserialize;

use crate::checks::{parse_options, CheckOptions};
use crate::compare::{ComparisonResult, PropertyComparator};
use crate::config::{ConfigError, EnforcementPolicy};
use crate::schema::JsonSchemaProps;

/// How the non-nullable -> nullable transition is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ToNullablePolicy {
    /// Permitting null where it was not permitted is compatible.
    Allow,

    /// Clients may not expect null values; flag the transition.
    #[default]
    Disallow,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct NullableOptions {
    pub to_nullable_policy: ToNullablePolicy,
}

/// Flags `nullable` transitions. `true -> false` invalidates stored nulls
/// and is always flagged; `false -> true` is governed by the policy.
#[derive(Debug, Default)]
pub struct NullableCheck {
    options: NullableOptions,
    enforcement: EnforcementPolicy,
}

impl NullableCheck {
    pub const NAME: &'static str = "nullable";

    pub fn from_options(options: &CheckOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            options: parse_options(Self::NAME, options)?,
            ..Default::default()
        })
    }
}

impl PropertyComparator for NullableCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_enforcement(&mut self, policy: EnforcementPolicy) {
        self.enforcement = policy;
    }

    fn compare(&self, old: &mut JsonSchemaProps, new: &mut JsonSchemaProps) -> ComparisonResult {
        let violation = match (old.nullable, new.nullable) {
            (true, false) => {
                Some("property changed from nullable to non-nullable".to_string())
            }
            (false, true) if self.options.to_nullable_policy == ToNullablePolicy::Disallow => {
                Some("property changed from non-nullable to nullable".to_string())
            }
            _ => None,
        };

        old.nullable = false;
        new.nullable = false;

        ComparisonResult::from_violation(self.name(), self.enforcement, violation)
    }
}
