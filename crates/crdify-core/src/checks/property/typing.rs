//! Type and format descriptor checks

use crate::checks::{ensure_no_options, CheckOptions};
use crate::compare::{ComparisonResult, PropertyComparator};
use crate::config::{ConfigError, EnforcementPolicy};
use crate::schema::JsonSchemaProps;

/// Flags any change of a property's `type`. A type change invalidates every
/// stored object that carries the old representation.
#[derive(Debug, Default)]
pub struct TypeCheck {
    enforcement: EnforcementPolicy,
}

impl TypeCheck {
    pub const NAME: &'static str = "type";

    pub fn from_options(options: &CheckOptions) -> Result<Self, ConfigError> {
        ensure_no_options(Self::NAME, options)?;
        Ok(Self::default())
    }
}

impl PropertyComparator for TypeCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_enforcement(&mut self, policy: EnforcementPolicy) {
        self.enforcement = policy;
    }

    fn compare(&self, old: &mut JsonSchemaProps, new: &mut JsonSchemaProps) -> ComparisonResult {
        let violation = (old.type_ != new.type_).then(|| {
            format!(
                "type changed from \"{}\" to \"{}\"",
                old.type_.as_deref().unwrap_or(""),
                new.type_.as_deref().unwrap_or("")
            )
        });

        old.type_ = None;
        new.type_ = None;

        ComparisonResult::from_violation(self.name(), self.enforcement, violation)
    }
}

/// Flags any change of a property's `format`. Formats alter validation (and
/// for some types the accepted wire form), so a change is incompatible.
#[derive(Debug, Default)]
pub struct FormatCheck {
    enforcement: EnforcementPolicy,
}

impl FormatCheck {
    pub const NAME: &'static str = "format";

    pub fn from_options(options: &CheckOptions) -> Result<Self, ConfigError> {
        ensure_no_options(Self::NAME, options)?;
        Ok(Self::default())
    }
}

impl PropertyComparator for FormatCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_enforcement(&mut self, policy: EnforcementPolicy) {
        self.enforcement = policy;
    }

    fn compare(&self, old: &mut JsonSchemaProps, new: &mut JsonSchemaProps) -> ComparisonResult {
        let violation = (old.format != new.format).then(|| {
            format!(
                "format changed from \"{}\" to \"{}\"",
                old.format.as_deref().unwrap_or(""),
                new.format.as_deref().unwrap_or("")
            )
        });

        old.format = None;
        new.format = None;

        ComparisonResult::from_violation(self.name(), self.enforcement, violation)
    }
}
