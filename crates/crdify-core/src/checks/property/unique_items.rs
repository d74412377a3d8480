//! uniqueItems constraint check

use crate::checks::{ensure_no_options, CheckOptions};
use crate::compare::{ComparisonResult, PropertyComparator};
use crate::config::{ConfigError, EnforcementPolicy};
use crate::schema::JsonSchemaProps;

/// Flags `uniqueItems` going from `false` to `true`: stored lists may hold
/// duplicates the new schema rejects. The relaxing direction is compatible.
#[derive(Debug, Default)]
pub struct UniqueItemsCheck {
    enforcement: EnforcementPolicy,
}

impl UniqueItemsCheck {
    pub const NAME: &'static str = "uniqueItems";

    pub fn from_options(options: &CheckOptions) -> Result<Self, ConfigError> {
        ensure_no_options(Self::NAME, options)?;
        Ok(Self::default())
    }
}

impl PropertyComparator for UniqueItemsCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_enforcement(&mut self, policy: EnforcementPolicy) {
        self.enforcement = policy;
    }

    fn compare(&self, old: &mut JsonSchemaProps, new: &mut JsonSchemaProps) -> ComparisonResult {
        let violation = (!old.unique_items && new.unique_items)
            .then(|| "uniqueItems constraint added when there was none previously".to_string());

        old.unique_items = false;
        new.unique_items = false;

        ComparisonResult::from_violation(self.name(), self.enforcement, violation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testutil::{assert_flagged, props};

    #[test]
    fn test_constraint_added_flagged() {
        assert_flagged(
            UniqueItemsCheck::default(),
            &props("type: array"),
            &props("{type: array, uniqueItems: true}"),
            true,
        );
    }

    #[test]
    fn test_constraint_removed_not_flagged() {
        assert_flagged(
            UniqueItemsCheck::default(),
            &props("{type: array, uniqueItems: true}"),
            &props("type: array"),
            false,
        );
    }
}
