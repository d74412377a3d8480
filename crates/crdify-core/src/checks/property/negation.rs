//! `not` constraint check

use crate::checks::{ensure_no_options, CheckOptions};
use crate::compare::{ComparisonResult, PropertyComparator};
use crate::config::{ConfigError, EnforcementPolicy};
use crate::schema::JsonSchemaProps;

/// Flags added or changed `not` subschemas. A `not` constraint excludes
/// values, so introducing or altering one can reject stored objects;
/// removing one only widens the accepted set.
#[derive(Debug, Default)]
pub struct NotCheck {
    enforcement: EnforcementPolicy,
}

impl NotCheck {
    pub const NAME: &'static str = "not";

    pub fn from_options(options: &CheckOptions) -> Result<Self, ConfigError> {
        ensure_no_options(Self::NAME, options)?;
        Ok(Self::default())
    }
}

impl PropertyComparator for NotCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_enforcement(&mut self, policy: EnforcementPolicy) {
        self.enforcement = policy;
    }

    fn compare(&self, old: &mut JsonSchemaProps, new: &mut JsonSchemaProps) -> ComparisonResult {
        let violation = match (&old.not, &new.not) {
            (None, Some(_)) => {
                Some("not constraint added when there was none previously".to_string())
            }
            (Some(before), Some(after)) if !before.semantic_eq(after) => {
                Some("not constraint changed".to_string())
            }
            _ => None,
        };

        old.not = None;
        new.not = None;

        ComparisonResult::from_violation(self.name(), self.enforcement, violation)
    }
}
