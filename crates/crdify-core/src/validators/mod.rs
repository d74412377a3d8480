//! Validation orchestrators
//!
//! Three cohorts compose the configured checks into passes:
//!
//! - `crd`: whole-CRD checks over the old/new pair
//! - `same_version`: per-property checks between equal version names
//! - `served_version`: per-property checks between every ordered pair of
//!   served versions, net of findings that already existed in the old CRD

mod crd;
mod same_version;
mod served_version;

pub use crd::CrdValidator;
pub use same_version::SameVersionValidator;
pub use served_version::ServedVersionValidator;

use serde::Serialize;

use crate::compare::PropertyComparisonResult;

/// Property comparison results scoped to a version, or to a `"vOld -> vNew"`
/// pair in the served-version pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionedComparisonResult {
    pub version: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub property_comparisons: Vec<PropertyComparisonResult>,
}

impl VersionedComparisonResult {
    pub fn is_zero(&self) -> bool {
        self.property_comparisons
            .iter()
            .all(PropertyComparisonResult::is_zero)
    }
}
