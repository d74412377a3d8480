//! Numeric and size bound checks
//!
//! Eight checks share two rules. Max-family bounds (`maximum`, `maxItems`,
//! `maxLength`, `maxProperties`) break when introduced or decreased;
//! min-family bounds (`minimum`, `minItems`, `minLength`, `minProperties`)
//! break when introduced or increased. In both cases stored objects that were
//! valid under the old bound may no longer validate. Each transition has its
//! own gate so a project can tolerate, say, tightened maxima while still
//! flagging brand-new constraints.
//!
//! The `minimum`/`maximum` checks also claim their `exclusiveMinimum`/
//! `exclusiveMaximum` flags; turning exclusivity on tightens the bound and is
//! reported under the same gate as an increase/decrease.

use std::fmt::Display;

use serde::Deserialize;

use crate::checks::{parse_options, CheckOptions};
use crate::compare::{ComparisonResult, PropertyComparator};
use crate::config::{ConfigError, EnforcementMode, EnforcementPolicy};
use crate::schema::JsonSchemaProps;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct MinOptions {
    /// Gate for bounds added where there was none.
    pub addition_enforcement: EnforcementMode,

    /// Gate for bounds that increased.
    pub increase_enforcement: EnforcementMode,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct MaxOptions {
    /// Gate for bounds added where there was none.
    pub addition_enforcement: EnforcementMode,

    /// Gate for bounds that decreased.
    pub decrease_enforcement: EnforcementMode,
}

fn min_violation<T>(field: &str, old: Option<T>, new: Option<T>, options: &MinOptions) -> Option<String>
where
    T: PartialOrd + Display,
{
    match (old, new) {
        (None, Some(added)) if options.addition_enforcement.is_strict() => Some(format!(
            "{field}: constraint {added} added when there were no restrictions previously"
        )),
        (Some(before), Some(after))
            if after > before && options.increase_enforcement.is_strict() =>
        {
            Some(format!("{field}: constraint increased from {before} to {after}"))
        }
        _ => None,
    }
}

fn max_violation<T>(field: &str, old: Option<T>, new: Option<T>, options: &MaxOptions) -> Option<String>
where
    T: PartialOrd + Display,
{
    match (old, new) {
        (None, Some(added)) if options.addition_enforcement.is_strict() => Some(format!(
            "{field}: constraint {added} added when there were no restrictions previously"
        )),
        (Some(before), Some(after))
            if after < before && options.decrease_enforcement.is_strict() =>
        {
            Some(format!("{field}: constraint decreased from {before} to {after}"))
        }
        _ => None,
    }
}

macro_rules! bound_check {
    ($(#[$doc:meta])* $check:ident, $name:literal, $field:ident, $options:ty, $violation:ident) => {
        $(#[$doc])*
        #[derive(Debug, Default)]
        pub struct $check {
            options: $options,
            enforcement: EnforcementPolicy,
        }

        impl $check {
            pub const NAME: &'static str = $name;

            pub fn from_options(options: &CheckOptions) -> Result<Self, ConfigError> {
                Ok(Self {
                    options: parse_options(Self::NAME, options)?,
                    ..Default::default()
                })
            }
        }

        impl PropertyComparator for $check {
            fn name(&self) -> &'static str {
                Self::NAME
            }

            fn set_enforcement(&mut self, policy: EnforcementPolicy) {
                self.enforcement = policy;
            }

            fn compare(
                &self,
                old: &mut JsonSchemaProps,
                new: &mut JsonSchemaProps,
            ) -> ComparisonResult {
                let violation = $violation($name, old.$field, new.$field, &self.options);

                old.$field = None;
                new.$field = None;

                ComparisonResult::from_violation(self.name(), self.enforcement, violation)
            }
        }
    };
}

/// Flags a `minimum` introduced or increased; also claims `exclusiveMinimum`.
#[derive(Debug, Default)]
pub struct MinimumCheck {
    options: MinOptions,
    enforcement: EnforcementPolicy,
}

impl MinimumCheck {
    pub const NAME: &'static str = "minimum";

    pub fn from_options(options: &CheckOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            options: parse_options(Self::NAME, options)?,
            ..Default::default()
        })
    }
}

impl PropertyComparator for MinimumCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_enforcement(&mut self, policy: EnforcementPolicy) {
        self.enforcement = policy;
    }

    fn compare(&self, old: &mut JsonSchemaProps, new: &mut JsonSchemaProps) -> ComparisonResult {
        let mut violations = Vec::new();

        if let Some(violation) = min_violation("minimum", old.minimum, new.minimum, &self.options)
        {
            violations.push(violation);
        }

        if !old.exclusive_minimum
            && new.exclusive_minimum
            && self.options.increase_enforcement.is_strict()
        {
            violations
                .push("minimum: exclusiveMinimum constraint added".to_string());
        }

        old.minimum = None;
        new.minimum = None;
        old.exclusive_minimum = false;
        new.exclusive_minimum = false;

        ComparisonResult::from_violations(self.name(), self.enforcement, violations)
    }
}

/// Flags a `maximum` introduced or decreased; also claims `exclusiveMaximum`.
#[derive(Debug, Default)]
pub struct MaximumCheck {
    options: MaxOptions,
    enforcement: EnforcementPolicy,
}

impl MaximumCheck {
    pub const NAME: &'static str = "maximum";

    pub fn from_options(options: &CheckOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            options: parse_options(Self::NAME, options)?,
            ..Default::default()
        })
    }
}

impl PropertyComparator for MaximumCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_enforcement(&mut self, policy: EnforcementPolicy) {
        self.enforcement = policy;
    }

    fn compare(&self, old: &mut JsonSchemaProps, new: &mut JsonSchemaProps) -> ComparisonResult {
        let mut violations = Vec::new();

        if let Some(violation) = max_violation("maximum", old.maximum, new.maximum, &self.options)
        {
            violations.push(violation);
        }

        if !old.exclusive_maximum
            && new.exclusive_maximum
            && self.options.decrease_enforcement.is_strict()
        {
            violations
                .push("maximum: exclusiveMaximum constraint added".to_string());
        }

        old.maximum = None;
        new.maximum = None;
        old.exclusive_maximum = false;
        new.exclusive_maximum = false;

        ComparisonResult::from_violations(self.name(), self.enforcement, violations)
    }
}

bound_check!(
    /// Flags a `minItems` bound introduced or increased.
    MinItemsCheck, "minItems", min_items, MinOptions, min_violation
);
bound_check!(
    /// Flags a `minLength` bound introduced or increased.
    MinLengthCheck, "minLength", min_length, MinOptions, min_violation
);
bound_check!(
    /// Flags a `minProperties` bound introduced or increased.
    MinPropertiesCheck, "minProperties", min_properties, MinOptions, min_violation
);
bound_check!(
    /// Flags a `maxItems` bound introduced or decreased.
    MaxItemsCheck, "maxItems", max_items, MaxOptions, max_violation
);
bound_check!(
    /// Flags a `maxLength` bound introduced or decreased.
    MaxLengthCheck, "maxLength", max_length, MaxOptions, max_violation
);
bound_check!(
    /// Flags a `maxProperties` bound introduced or decreased.
    MaxPropertiesCheck, "maxProperties", max_properties, MaxOptions, max_violation
);
