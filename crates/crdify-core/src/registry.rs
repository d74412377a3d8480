//! Check registry
//!
//! Maps check names to factories. A factory takes the free-form options
//! mapping captured from the config file and returns a constructed check;
//! the runner resolves the registry against the config at build time. The
//! registry is populated once and read-only afterwards.

use std::collections::BTreeMap;

use crate::checks::crd::{ExistingFieldRemovalCheck, ScopeCheck, StoredVersionRemovalCheck};
use crate::checks::property::{
    AllOfCheck, AnyOfCheck, DefaultCheck, DescriptionCheck, EnumCheck, FormatCheck, MaxItemsCheck,
    MaxLengthCheck, MaxPropertiesCheck, MaximumCheck, MinItemsCheck, MinLengthCheck,
    MinPropertiesCheck, MinimumCheck, NotCheck, NullableCheck, OneOfCheck, PatternCheck,
    RequiredCheck, TypeCheck, UniqueItemsCheck,
};
use crate::checks::CheckOptions;
use crate::compare::{CrdComparator, PropertyComparator};
use crate::config::ConfigError;

/// A constructed check, typed by what it compares.
pub enum Check {
    Crd(Box<dyn CrdComparator>),
    Property(Box<dyn PropertyComparator>),
}

impl Check {
    pub fn name(&self) -> &'static str {
        match self {
            Check::Crd(check) => check.name(),
            Check::Property(check) => check.name(),
        }
    }
}

impl std::fmt::Debug for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Check").field(&self.name()).finish()
    }
}

/// Constructor for a check from its options mapping.
pub type CheckFactory = fn(&CheckOptions) -> Result<Check, ConfigError>;

/// Name-to-factory mapping for every known check.
pub struct Registry {
    factories: BTreeMap<&'static str, CheckFactory>,
}

impl Registry {
    /// An empty registry. Use `Registry::default()` for the full check
    /// library.
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, name: &'static str, factory: CheckFactory) {
        self.factories.insert(name, factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in deterministic (lexicographic) order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// Construct the named check from its options.
    pub fn build(&self, name: &str, options: &CheckOptions) -> Result<Check, ConfigError> {
        let factory = self.factories.get(name).ok_or_else(|| {
            ConfigError::UnknownCheck {
                name: name.to_string(),
                known: self.names().collect::<Vec<_>>().join(", "),
            }
        })?;

        factory(options)
    }
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Registry::new();

        registry.register(ScopeCheck::NAME, |options| {
            Ok(Check::Crd(Box::new(ScopeCheck::from_options(options)?)))
        });
        registry.register(ExistingFieldRemovalCheck::NAME, |options| {
            Ok(Check::Crd(Box::new(ExistingFieldRemovalCheck::from_options(options)?)))
        });
        registry.register(StoredVersionRemovalCheck::NAME, |options| {
            Ok(Check::Crd(Box::new(StoredVersionRemovalCheck::from_options(options)?)))
        });

        registry.register(TypeCheck::NAME, |options| {
            Ok(Check::Property(Box::new(TypeCheck::from_options(options)?)))
        });
        registry.register(FormatCheck::NAME, |options| {
            Ok(Check::Property(Box::new(FormatCheck::from_options(options)?)))
        });
        registry.register(DescriptionCheck::NAME, |options| {
            Ok(Check::Property(Box::new(DescriptionCheck::from_options(options)?)))
        });
        registry.register(DefaultCheck::NAME, |options| {
            Ok(Check::Property(Box::new(DefaultCheck::from_options(options)?)))
        });
        registry.register(RequiredCheck::NAME, |options| {
            Ok(Check::Property(Box::new(RequiredCheck::from_options(options)?)))
        });
        registry.register(EnumCheck::NAME, |options| {
            Ok(Check::Property(Box::new(EnumCheck::from_options(options)?)))
        });
        registry.register(PatternCheck::NAME, |options| {
            Ok(Check::Property(Box::new(PatternCheck::from_options(options)?)))
        });
        registry.register(NullableCheck::NAME, |options| {
            Ok(Check::Property(Box::new(NullableCheck::from_options(options)?)))
        });
        registry.register(UniqueItemsCheck::NAME, |options| {
            Ok(Check::Property(Box::new(UniqueItemsCheck::from_options(options)?)))
        });
        registry.register(NotCheck::NAME, |options| {
            Ok(Check::Property(Box::new(NotCheck::from_options(options)?)))
        });
        registry.register(AnyOfCheck::NAME, |options| {
            Ok(Check::Property(Box::new(AnyOfCheck::from_options(options)?)))
        });
        registry.register(OneOfCheck::NAME, |options| {
            Ok(Check::Property(Box::new(OneOfCheck::from_options(options)?)))
        });
        registry.register(AllOfCheck::NAME, |options| {
            Ok(Check::Property(Box::new(AllOfCheck::from_options(options)?)))
        });
        registry.register(MinimumCheck::NAME, |options| {
            Ok(Check::Property(Box::new(MinimumCheck::from_options(options)?)))
        });
        registry.register(MinItemsCheck::NAME, |options| {
            Ok(Check::Property(Box::new(MinItemsCheck::from_options(options)?)))
        });
        registry.register(MinLengthCheck::NAME, |options| {
            Ok(Check::Property(Box::new(MinLengthCheck::from_options(options)?)))
        });
        registry.register(MinPropertiesCheck::NAME, |options| {
            Ok(Check::Property(Box::new(MinPropertiesCheck::from_options(options)?)))
        });
        registry.register(MaximumCheck::NAME, |options| {
            Ok(Check::Property(Box::new(MaximumCheck::from_options(options)?)))
        });
        registry.register(MaxItemsCheck::NAME, |options| {
            Ok(Check::Property(Box::new(MaxItemsCheck::from_options(options)?)))
        });
        registry.register(MaxLengthCheck::NAME, |options| {
            Ok(Check::Property(Box::new(MaxLengthCheck::from_options(options)?)))
        });
        registry.register(MaxPropertiesCheck::NAME, |options| {
            Ok(Check::Property(Box::new(MaxPropertiesCheck::from_options(options)?)))
        });

        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_builds_every_check() {
        let registry = Registry::default();
        let options = CheckOptions::new();

        for name in registry.names().collect::<Vec<_>>() {
            let check = registry.build(name, &options).unwrap();
            assert_eq!(check.name(), name);
        }
    }

    #[test]
    fn test_unknown_check_rejected_with_known_names() {
        let registry = Registry::default();
        let err = registry.build("bogus", &CheckOptions::new()).unwrap_err();
        let message = err.to_string();

        assert!(message.contains("bogus"));
        assert!(message.contains("scope"));
        assert!(message.contains("minimum"));
    }

    #[test]
    fn test_options_reach_the_factory() {
        let registry = Registry::default();

        let mut options = CheckOptions::new();
        options.insert(
            "additionPolicy".to_string(),
            serde_json::Value::String("Allow".to_string()),
        );
        assert!(registry.build("enum", &options).is_ok());

        let mut bad = CheckOptions::new();
        bad.insert("nonsense".to_string(), serde_json::Value::Bool(true));
        assert!(registry.build("enum", &bad).is_err());
    }

    #[test]
    fn test_cohort_typing() {
        let registry = Registry::default();
        let options = CheckOptions::new();

        assert!(matches!(
            registry.build("scope", &options).unwrap(),
            Check::Crd(_)
        ));
        assert!(matches!(
            registry.build("type", &options).unwrap(),
            Check::Property(_)
        ));
    }
}
