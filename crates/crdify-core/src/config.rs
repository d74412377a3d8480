//! Declarative check configuration
//!
//! The config file selects which checks run, how their findings are enforced,
//! and any per-check options. It is YAML (or JSON, which YAML subsumes):
//!
//! ```yaml
//! unhandledEnforcement: Error
//! conversion: None
//! checks:
//!   crd:
//!     scope: {enabled: true, enforcement: Error}
//!   sameVersion:
//!     enforcement: Error
//!     enum:
//!       additionPolicy: Allow
//!   servedVersion:
//!     ignoreConversion: false
//!     pattern:
//!       enforcement: Warn
//! ```
//!
//! Unknown keys, enforcement values, and policy values are rejected at parse
//! or runner-construction time; no comparison runs against a bad config.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a check's findings are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnforcementPolicy {
    /// Findings are errors and fail the run.
    #[default]
    Error,
    /// Findings are reported as warnings.
    Warn,
    /// Findings are dropped.
    None,
}

/// How the served-version pass treats CRDs that declare a conversion webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConversionPolicy {
    /// Webhook presence does not affect the served-version pass.
    #[default]
    None,
    /// Skip the served-version pass entirely when a webhook converts between
    /// versions.
    Ignore,
}

/// Per-transition gate used by check options (e.g. whether a tightened bound
/// is a finding at all).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnforcementMode {
    #[default]
    Strict,
    None,
}

impl EnforcementMode {
    pub fn is_strict(self) -> bool {
        self == EnforcementMode::Strict
    }
}

/// Errors raised while loading a config or materializing checks from it.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("unknown check {name:?}; known checks are: {known}")]
    UnknownCheck { name: String, known: String },

    #[error("check {name:?} cannot be configured under {cohort:?}")]
    WrongCohort { name: String, cohort: &'static str },

    #[error("invalid options for check {name:?}: {message}")]
    InvalidOptions { name: String, message: String },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Config {
    /// Enforcement for changes no configured check claimed.
    pub unhandled_enforcement: EnforcementPolicy,

    /// Conversion-webhook policy for the served-version pass.
    pub conversion: ConversionPolicy,

    pub checks: ChecksConfig,
}

impl Config {
    /// Parse a config from YAML (or JSON) text.
    pub fn from_yaml(text: &str) -> Result<Config, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load a config file. A missing path argument is handled by the caller;
    /// this expects the file to exist.
    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ChecksConfig {
    pub crd: CrdChecksConfig,
    pub same_version: SameVersionConfig,
    pub served_version: ServedVersionConfig,
}

/// Configuration of the whole-CRD check cohort.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct CrdChecksConfig {
    pub scope: CheckEntry,
    pub existing_field_removal: CheckEntry,
    pub stored_version_removal: CheckEntry,
}

/// Configuration of the same-version property cohort. Keys other than
/// `enabled`/`enforcement` name property checks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SameVersionConfig {
    pub enabled: Option<bool>,

    /// Cohort-wide enforcement, overridable per check.
    pub enforcement: Option<EnforcementPolicy>,

    #[serde(flatten)]
    pub checks: BTreeMap<String, CheckEntry>,
}

/// Configuration of the served-version property cohort.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServedVersionConfig {
    pub enabled: Option<bool>,

    pub enforcement: Option<EnforcementPolicy>,

    /// When true, conversion-webhook presence skips the pass (equivalent to
    /// `conversion: Ignore` scoped to this cohort).
    pub ignore_conversion: Option<bool>,

    #[serde(flatten)]
    pub checks: BTreeMap<String, CheckEntry>,
}

/// Configuration of a single check: the shared `enabled`/`enforcement` pair
/// plus whatever options the check itself understands. Options are captured
/// as free-form values here and validated by the check's factory, which
/// rejects unknown fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckEntry {
    pub enabled: Option<bool>,

    pub enforcement: Option<EnforcementPolicy>,

    #[serde(flatten)]
    pub options: serde_json::Map<String, serde_json::Value>,
}

impl CheckEntry {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.unhandled_enforcement, EnforcementPolicy::Error);
        assert_eq!(config.conversion, ConversionPolicy::None);
        assert!(config.checks.crd.scope.is_enabled());
        assert!(config.checks.same_version.enabled.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_yaml(
            r#"
unhandledEnforcement: Warn
conversion: Ignore
checks:
  crd:
    scope:
      enabled: false
    storedVersionRemoval:
      enforcement: Warn
  sameVersion:
    enforcement: Error
    enum:
      additionPolicy: Allow
    minimum:
      enabled: false
  servedVersion:
    ignoreConversion: true
    pattern:
      enforcement: Warn
      removalPolicy: Allow
"#,
        )
        .unwrap();

        assert_eq!(config.unhandled_enforcement, EnforcementPolicy::Warn);
        assert_eq!(config.conversion, ConversionPolicy::Ignore);
        assert!(!config.checks.crd.scope.is_enabled());
        assert_eq!(
            config.checks.crd.stored_version_removal.enforcement,
            Some(EnforcementPolicy::Warn)
        );

        let enum_entry = &config.checks.same_version.checks["enum"];
        assert_eq!(enum_entry.options["additionPolicy"], "Allow");
        assert!(!config.checks.same_version.checks["minimum"].is_enabled());

        assert_eq!(config.checks.served_version.ignore_conversion, Some(true));
        let pattern = &config.checks.served_version.checks["pattern"];
        assert_eq!(pattern.enforcement, Some(EnforcementPolicy::Warn));
        assert_eq!(pattern.options["removalPolicy"], "Allow");
    }

    #[test]
    fn test_unknown_top_level_key_rejected() {
        let err = Config::from_yaml("notAKey: true").unwrap_err();
        assert!(err.to_string().contains("notAKey"));
    }

    #[test]
    fn test_unknown_enforcement_rejected_with_valid_values() {
        let err = Config::from_yaml("unhandledEnforcement: Fatal").unwrap_err();
        let message = err.to_string();

        assert!(message.contains("Fatal"));
        assert!(message.contains("Error"));
        assert!(message.contains("Warn"));
        assert!(message.contains("None"));
    }

    #[test]
    fn test_unknown_conversion_policy_rejected() {
        let err = Config::from_yaml("conversion: Sometimes").unwrap_err();
        let message = err.to_string();

        assert!(message.contains("Sometimes"));
        assert!(message.contains("Ignore"));
    }

    #[test]
    fn test_json_config_accepted() {
        let config = Config::from_yaml(r#"{"unhandledEnforcement": "None"}"#).unwrap();
        assert_eq!(config.unhandled_enforcement, EnforcementPolicy::None);
    }
}
