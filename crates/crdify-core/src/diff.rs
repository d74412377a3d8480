//! Diffing of flattened schema views
//!
//! Pairs up the detached sub-schemas of two flattened versions by canonical
//! path. Paths whose detached nodes are semantically equal are omitted;
//! paths present on only one side carry `None` on the missing side.

use std::collections::BTreeMap;

use crate::flatten::FlattenedVersion;
use crate::schema::JsonSchemaProps;

/// The old/new pair of detached sub-schemas for a single path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaDiff {
    pub old: Option<JsonSchemaProps>,
    pub new: Option<JsonSchemaProps>,
}

/// Compute the per-path diff between two flattened versions.
pub fn diff_flattened(
    old: &FlattenedVersion,
    new: &FlattenedVersion,
) -> BTreeMap<String, SchemaDiff> {
    let mut diffs = BTreeMap::new();

    for (path, old_schema) in old {
        match new.get(path) {
            Some(new_schema) => {
                if !old_schema.semantic_eq(new_schema) {
                    diffs.insert(
                        path.clone(),
                        SchemaDiff {
                            old: Some(old_schema.clone()),
                            new: Some(new_schema.clone()),
                        },
                    );
                }
            }
            None => {
                diffs.insert(
                    path.clone(),
                    SchemaDiff {
                        old: Some(old_schema.clone()),
                        new: None,
                    },
                );
            }
        }
    }

    for (path, new_schema) in new {
        if !old.contains_key(path) {
            diffs.insert(
                path.clone(),
                SchemaDiff {
                    old: None,
                    new: Some(new_schema.clone()),
                },
            );
        }
    }

    diffs
}
