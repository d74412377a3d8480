//! Schema flattening
//!
//! Walks a version's root validation schema and produces an addressable map
//! of `canonical path -> detached sub-schema`. The canonical path starts at
//! `^` (the root) and appends one segment per recursive edge:
//!
//! ```text
//! ^.spec.replicas          properties
//! ^.spec.containers.items  single-schema items
//! ^.spec.ports.items[1]    tuple items
//! ^.spec.mode.anyOf[0]     compositions (allOf/anyOf/oneOf)
//! ^.spec.tag.not           not
//! ^.spec.labels.additionalProperties
//! ^.spec.extras.patternProperties[^x-]
//! ^.definitions[shared]
//! ^.dependencies[replicas]
//! ```
//!
//! Each entry is a deep copy of the node with its `properties` map cleared,
//! so a per-path comparison sees that node's own attributes only; children
//! surface under their own paths. The input schema is never modified.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::schema::{
    CustomResourceDefinitionVersion, JsonSchemaProps, SchemaOrArray, SchemaOrBool,
    SchemaOrStringArray,
};

/// Ordered mapping of canonical path to detached sub-schema.
pub type FlattenedVersion = BTreeMap<String, JsonSchemaProps>;

/// Maximum schema nesting the flattener will follow. Schemas are
/// user-authored; anything deeper than this is rejected rather than risking
/// a stack overflow.
pub const MAX_SCHEMA_DEPTH: usize = 128;

/// Error produced when a schema exceeds [`MAX_SCHEMA_DEPTH`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlattenError {
    #[error("schema nesting exceeds the maximum depth of {MAX_SCHEMA_DEPTH} at {path}")]
    MaxDepthExceeded { path: String },
}

/// Flatten a version's schema into its addressable per-path form.
///
/// A version without a schema flattens to an empty map.
pub fn flatten_version(
    version: &CustomResourceDefinitionVersion,
) -> Result<FlattenedVersion, FlattenError> {
    let mut flattened = FlattenedVersion::new();

    if let Some(root) = version.root_schema() {
        visit(root, "^", 0, &mut flattened)?;
    }

    Ok(flattened)
}

fn visit(
    schema: &JsonSchemaProps,
    path: &str,
    depth: usize,
    out: &mut FlattenedVersion,
) -> Result<(), FlattenError> {
    if depth > MAX_SCHEMA_DEPTH {
        return Err(FlattenError::MaxDepthExceeded {
            path: path.to_string(),
        });
    }

    out.insert(path.to_string(), detach(schema));

    // BTreeMap iteration keeps every unordered edge lexicographic, which in
    // turn keeps the flattened map and everything derived from it stable.
    for (name, child) in &schema.properties {
        visit(child, &format!("{path}.{name}"), depth + 1, out)?;
    }

    match &schema.items {
        Some(SchemaOrArray::Schema(child)) => {
            visit(child, &format!("{path}.items"), depth + 1, out)?;
        }
        Some(SchemaOrArray::Array(tuple)) => {
            for (i, child) in tuple.iter().enumerate() {
                visit(child, &format!("{path}.items[{i}]"), depth + 1, out)?;
            }
        }
        None => {}
    }

    for (keyword, members) in [
        ("allOf", &schema.all_of),
        ("anyOf", &schema.any_of),
        ("oneOf", &schema.one_of),
    ] {
        for (i, child) in members.iter().enumerate() {
            visit(child, &format!("{path}.{keyword}[{i}]"), depth + 1, out)?;
        }
    }

    if let Some(child) = &schema.not {
        visit(child, &format!("{path}.not"), depth + 1, out)?;
    }

    if let Some(SchemaOrBool::Schema(child)) = &schema.additional_properties {
        visit(child, &format!("{path}.additionalProperties"), depth + 1, out)?;
    }

    if let Some(SchemaOrBool::Schema(child)) = &schema.additional_items {
        visit(child, &format!("{path}.additionalItems"), depth + 1, out)?;
    }

    for (pattern, child) in &schema.pattern_properties {
        visit(
            child,
            &format!("{path}.patternProperties[{pattern}]"),
            depth + 1,
            out,
        )?;
    }

    for (name, child) in &schema.definitions {
        visit(child, &format!("{path}.definitions[{name}]"), depth + 1, out)?;
    }

    for (name, dependency) in &schema.dependencies {
        // The property-list form constrains sibling presence, not shape;
        // only the schema form contributes a child node.
        if let SchemaOrStringArray::Schema(child) = dependency {
            visit(child, &format!("{path}.dependencies[{name}]"), depth + 1, out)?;
        }
    }

    Ok(())
}

/// Deep-copy a node and clear its `properties` map so the entry describes
/// that node's own attributes only.
fn detach(schema: &JsonSchemaProps) -> JsonSchemaProps {
    let mut copy = schema.clone();
    copy.properties = BTreeMap::new();
    copy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::VersionSchema;

    fn version_with(yaml: &str) -> CustomResourceDefinitionVersion {
        CustomResourceDefinitionVersion {
            name: "v1".to_string(),
            served: true,
            storage: true,
            schema: Some(VersionSchema {
                open_api_v3_schema: Some(serde_yaml::from_str(yaml).unwrap()),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_flatten_covers_every_edge() {
        let version = version_with(
            r#"
type: object
properties:
  plain:
    type: string
  list:
    type: array
    items:
      type: string
  tuple:
    type: array
    items:
      - type: string
      - type: integer
  choice:
    anyOf:
      - type: string
    oneOf:
      - type: integer
    allOf:
      - type: number
  negated:
    not:
      type: string
  open:
    additionalProperties:
      type: string
  extras:
    patternProperties:
      "^x-":
        type: string
definitions:
  shared:
    type: string
dependencies:
  plain:
    properties:
      companion:
        type: string
  list: [plain]
"#,
        );

        let flattened = flatten_version(&version).unwrap();
        let paths: Vec<&str> = flattened.keys().map(String::as_str).collect();

        for expected in [
            "^",
            "^.plain",
            "^.list",
            "^.list.items",
            "^.tuple.items[0]",
            "^.tuple.items[1]",
            "^.choice.anyOf[0]",
            "^.choice.oneOf[0]",
            "^.choice.allOf[0]",
            "^.negated.not",
            "^.open.additionalProperties",
            "^.extras.patternProperties[^x-]",
            "^.definitions[shared]",
            "^.dependencies[plain]",
            "^.dependencies[plain].companion",
        ] {
            assert!(paths.contains(&expected), "missing path {expected}: {paths:?}");
        }

        // The property-list dependency form contributes no child node.
        assert!(!flattened.contains_key("^.dependencies[list]"));
    }

    #[test]
    fn test_flatten_detaches_properties() {
        let version = version_with(
            r#"
type: object
description: root
properties:
  spec:
    type: object
    properties:
      replicas:
        type: integer
"#,
        );

        let flattened = flatten_version(&version).unwrap();

        assert!(flattened["^"].properties.is_empty());
        assert!(flattened["^.spec"].properties.is_empty());
        assert_eq!(flattened["^"].description.as_deref(), Some("root"));
        assert_eq!(
            flattened["^.spec.replicas"].type_.as_deref(),
            Some("integer")
        );
    }

    #[test]
    fn test_flatten_does_not_mutate_input() {
        let version = version_with(
            r#"
type: object
properties:
  spec:
    type: object
    properties:
      replicas:
        type: integer
"#,
        );
        let before = version.clone();

        flatten_version(&version).unwrap();
        assert_eq!(version, before);
    }

    #[test]
    fn test_flatten_schemaless_version() {
        let version = CustomResourceDefinitionVersion {
            name: "v1".to_string(),
            ..Default::default()
        };

        assert!(flatten_version(&version).unwrap().is_empty());
    }

    #[test]
    fn test_flatten_boolean_gates_emit_no_child() {
        let version = version_with(
            r#"
type: object
properties:
  closed:
    additionalProperties: false
"#,
        );

        let flattened = flatten_version(&version).unwrap();
        assert!(flattened.contains_key("^.closed"));
        assert!(!flattened.contains_key("^.closed.additionalProperties"));
    }

    #[test]
    fn test_flatten_rejects_excessive_nesting() {
        let mut schema = JsonSchemaProps {
            type_: Some("string".to_string()),
            ..Default::default()
        };
        for _ in 0..(MAX_SCHEMA_DEPTH + 1) {
            let mut parent = JsonSchemaProps::default();
            parent.properties.insert("inner".to_string(), schema);
            schema = parent;
        }

        let version = CustomResourceDefinitionVersion {
            name: "v1".to_string(),
            served: true,
            storage: true,
            schema: Some(VersionSchema {
                open_api_v3_schema: Some(schema),
            }),
            ..Default::default()
        };

        assert!(matches!(
            flatten_version(&version),
            Err(FlattenError::MaxDepthExceeded { .. })
        ));
    }
}
