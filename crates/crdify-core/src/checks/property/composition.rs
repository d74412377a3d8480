//! Composition keyword checks (`anyOf`, `oneOf`, `allOf`)
//!
//! Member subschemas are compared by their canonical JSON encoding with
//! `description` and `example` elided, so documentation edits inside a member
//! do not register as member changes. Removing a member is flagged for all
//! three keywords; adding one is flagged for `anyOf`/`oneOf` only.

use std::collections::BTreeSet;

use crate::checks::{ensure_no_options, join_values, CheckOptions};
use crate::compare::{ComparisonResult, PropertyComparator};
use crate::config::{ConfigError, EnforcementPolicy};
use crate::schema::JsonSchemaProps;

fn composition_violations(
    keyword: &str,
    old_members: &[JsonSchemaProps],
    new_members: &[JsonSchemaProps],
    flag_additions: bool,
) -> Vec<String> {
    let mut violations = Vec::new();

    if old_members.is_empty() && !new_members.is_empty() {
        violations.push(format!(
            "{keyword} constraint added when there was none previously"
        ));
        return violations;
    }

    let old_set = fingerprints(old_members);
    let new_set = fingerprints(new_members);

    let removed: Vec<String> = old_set.difference(&new_set).cloned().collect();
    if !removed.is_empty() {
        violations.push(format!(
            "allowed {keyword} subschemas removed: {}",
            join_values(removed)
        ));
    }

    if flag_additions {
        let added: Vec<String> = new_set.difference(&old_set).cloned().collect();
        if !added.is_empty() {
            violations.push(format!(
                "allowed {keyword} subschemas added: {}",
                join_values(added)
            ));
        }
    }

    violations
}

/// Canonical JSON per member, with documentation-only fields elided.
fn fingerprints(members: &[JsonSchemaProps]) -> BTreeSet<String> {
    members
        .iter()
        .map(|member| {
            let mut stripped = member.clone();
            stripped.description = None;
            stripped.example = None;
            serde_json::to_string(&stripped).unwrap_or_else(|_| format!("{stripped:?}"))
        })
        .collect()
}

/// Flags `anyOf` transitions: a net-new constraint, removed members, and
/// added members (each added alternative changes which values validate).
#[derive(Debug, Default)]
pub struct AnyOfCheck {
    enforcement: EnforcementPolicy,
}

impl AnyOfCheck {
    pub const NAME: &'static str = "anyOf";

    pub fn from_options(options: &CheckOptions) -> Result<Self, ConfigError> {
        ensure_no_options(Self::NAME, options)?;
        Ok(Self::default())
    }
}

impl PropertyComparator for AnyOfCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_enforcement(&mut self, policy: EnforcementPolicy) {
        self.enforcement = policy;
    }

    fn compare(&self, old: &mut JsonSchemaProps, new: &mut JsonSchemaProps) -> ComparisonResult {
        let violations = composition_violations("anyOf", &old.any_of, &new.any_of, true);

        old.any_of = Vec::new();
        new.any_of = Vec::new();

        ComparisonResult::from_violations(self.name(), self.enforcement, violations)
    }
}

/// Flags `oneOf` transitions with the same rules as `anyOf`.
#[derive(Debug, Default)]
pub struct OneOfCheck {
    enforcement: EnforcementPolicy,
}

impl OneOfCheck {
    pub const NAME: &'static str = "oneOf";

    pub fn from_options(options: &CheckOptions) -> Result<Self, ConfigError> {
        ensure_no_options(Self::NAME, options)?;
        Ok(Self::default())
    }
}

impl PropertyComparator for OneOfCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_enforcement(&mut self, policy: EnforcementPolicy) {
        self.enforcement = policy;
    }

    fn compare(&self, old: &mut JsonSchemaProps, new: &mut JsonSchemaProps) -> ComparisonResult {
        let violations = composition_violations("oneOf", &old.one_of, &new.one_of, true);

        old.one_of = Vec::new();
        new.one_of = Vec::new();

        ComparisonResult::from_violations(self.name(), self.enforcement, violations)
    }
}

/// Flags `allOf` transitions: a net-new constraint and removed or changed
/// members. Pure member additions are not flagged.
#[derive(Debug, Default)]
pub struct AllOfCheck {
    enforcement: EnforcementPolicy,
}

impl AllOfCheck {
    pub const NAME: &'static str = "allOf";

    pub fn from_options(options: &CheckOptions) -> Result<Self, ConfigError> {
        ensure_no_options(Self::NAME, options)?;
        Ok(Self::default())
    }
}

impl PropertyComparator for AllOfCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_enforcement(&mut self, policy: EnforcementPolicy) {
        self.enforcement = policy;
    }

    fn compare(&self, old: &mut JsonSchemaProps, new: &mut JsonSchemaProps) -> ComparisonResult {
        let violations = composition_violations("allOf", &old.all_of, &new.all_of, false);

        old.all_of = Vec::new();
        new.all_of = Vec::new();

        ComparisonResult::from_violations(self.name(), self.enforcement, violations)
    }
}
