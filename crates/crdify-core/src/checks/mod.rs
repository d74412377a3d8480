//! The check library
//!
//! Every check is a comparator with a registry name, an enforcement policy,
//! and (for some) typed options parsed out of the free-form config mapping.
//!
//! - `crd`: whole-CRD checks (`scope`, `existingFieldRemoval`,
//!   `storedVersionRemoval`)
//! - `property`: per-path checks over detached sub-schemas (`type`, `enum`,
//!   the bound families, and friends)

pub mod crd;
pub mod property;

use serde::de::DeserializeOwned;

use crate::config::ConfigError;

/// Options mapping as captured from the config file.
pub type CheckOptions = serde_json::Map<String, serde_json::Value>;

/// Coerce a free-form options mapping into a check's typed options struct.
/// Unknown option keys are rejected with the check's name in the message.
pub(crate) fn parse_options<T>(name: &str, options: &CheckOptions) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    serde_json::from_value(serde_json::Value::Object(options.clone())).map_err(|err| {
        ConfigError::InvalidOptions {
            name: name.to_string(),
            message: err.to_string(),
        }
    })
}

/// Reject any options for checks that take none.
pub(crate) fn ensure_no_options(name: &str, options: &CheckOptions) -> Result<(), ConfigError> {
    if let Some(key) = options.keys().next() {
        return Err(ConfigError::InvalidOptions {
            name: name.to_string(),
            message: format!("unknown option {key:?}; this check takes no options"),
        });
    }

    Ok(())
}

/// Render a list of raw JSON values the way they appear in a manifest,
/// e.g. `["A", "B"]`.
pub(crate) fn join_values<I>(values: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let joined: Vec<String> = values.into_iter().collect();
    format!("[{}]", joined.join(", "))
}

#[cfg(test)]
pub(crate) mod testutil {
    use crate::compare::PropertyComparator;
    use crate::config::EnforcementPolicy;
    use crate::schema::JsonSchemaProps;

    pub fn props(yaml: &str) -> JsonSchemaProps {
        serde_yaml::from_str(yaml).unwrap()
    }

    /// Run a property check under all three enforcement policies against the
    /// same old/new pair and assert whether the transition is flagged.
    pub fn assert_flagged<C>(mut check: C, old: &JsonSchemaProps, new: &JsonSchemaProps, flagged: bool)
    where
        C: PropertyComparator,
    {
        check.set_enforcement(EnforcementPolicy::Error);
        let result = check.compare(&mut old.clone(), &mut new.clone());
        assert_eq!(
            !result.errors.is_empty(),
            flagged,
            "under Error policy, errors were {:?}",
            result.errors
        );
        assert!(result.warnings.is_empty());

        check.set_enforcement(EnforcementPolicy::Warn);
        let result = check.compare(&mut old.clone(), &mut new.clone());
        assert_eq!(
            !result.warnings.is_empty(),
            flagged,
            "under Warn policy, warnings were {:?}",
            result.warnings
        );
        assert!(result.errors.is_empty());

        check.set_enforcement(EnforcementPolicy::None);
        let result = check.compare(&mut old.clone(), &mut new.clone());
        assert!(result.is_zero(), "under None policy nothing may be reported");
    }
}
