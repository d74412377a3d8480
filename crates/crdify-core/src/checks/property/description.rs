//! Description check
//!
//! Description text is documentation, not validation, so this check defaults
//! to the `Warn` policy; the addition/removal/change gates can silence the
//! transitions a project does not care about.

use serde::Deserialize;

use crate::checks::{parse_options, CheckOptions};
use crate::compare::{ComparisonResult, PropertyComparator};
use crate::config::{ConfigError, EnforcementMode, EnforcementPolicy};
use crate::schema::JsonSchemaProps;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct DescriptionOptions {
    /// Gate for changed descriptions.
    pub change_enforcement: EnforcementMode,

    /// Gate for removed descriptions.
    pub removal_enforcement: EnforcementMode,

    /// Gate for descriptions added where there was none.
    pub addition_enforcement: EnforcementMode,
}

/// Flags added, removed, or changed `description` text.
#[derive(Debug)]
pub struct DescriptionCheck {
    options: DescriptionOptions,
    enforcement: EnforcementPolicy,
}

impl Default for DescriptionCheck {
    fn default() -> Self {
        Self {
            options: DescriptionOptions::default(),
            enforcement: EnforcementPolicy::Warn,
        }
    }
}

impl DescriptionCheck {
    pub const NAME: &'static str = "description";

    pub fn from_options(options: &CheckOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            options: parse_options(Self::NAME, options)?,
            ..Default::default()
        })
    }
}

impl PropertyComparator for DescriptionCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_enforcement(&mut self, policy: EnforcementPolicy) {
        self.enforcement = policy;
    }

    fn compare(&self, old: &mut JsonSchemaProps, new: &mut JsonSchemaProps) -> ComparisonResult {
        let old_description = old.description.as_deref().unwrap_or("");
        let new_description = new.description.as_deref().unwrap_or("");

        let violation = match (old_description.is_empty(), new_description.is_empty()) {
            (true, false) if self.options.addition_enforcement.is_strict() => Some(format!(
                "description \"{new_description}\" added when there was no description previously"
            )),
            (false, true) if self.options.removal_enforcement.is_strict() => {
                Some(format!("description \"{old_description}\" removed"))
            }
            (false, false)
                if old_description != new_description
                    && self.options.change_enforcement.is_strict() =>
            {
                Some(format!(
                    "description changed from \"{old_description}\" to \"{new_description}\""
                ))
            }
            _ => None,
        };

        old.description = None;
        new.description = None;

        ComparisonResult::from_violation(self.name(), self.enforcement, violation)
    }
}
