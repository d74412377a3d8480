//! Whole-CRD validation pass

use crate::compare::{ComparisonResult, CrdComparator};
use crate::flatten::FlattenError;
use crate::schema::CustomResourceDefinition;

/// Runs the configured whole-CRD checks in registration order.
pub struct CrdValidator {
    comparators: Vec<Box<dyn CrdComparator>>,
}

impl CrdValidator {
    pub fn new(comparators: Vec<Box<dyn CrdComparator>>) -> Self {
        Self { comparators }
    }

    pub fn validate(
        &self,
        old: &CustomResourceDefinition,
        new: &CustomResourceDefinition,
    ) -> Result<Vec<ComparisonResult>, FlattenError> {
        self.comparators
            .iter()
            .map(|comparator| comparator.compare(old, new))
            .collect()
    }
}
