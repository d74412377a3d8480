//! OpenAPI v3 schema subset for CRD validation schemas
//!
//! `JsonSchemaProps` mirrors the shape Kubernetes accepts under
//! `spec.versions[].schema.openAPIV3Schema`, restricted to the fields the
//! compatibility checks care about. Deep copy is `Clone`; semantic equality
//! is `semantic_eq`, which treats `required` as a set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single schema node in a CRD's OpenAPI v3 validation schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JsonSchemaProps {
    /// Property type (`string`, `integer`, `number`, `boolean`, `array`, `object`)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    /// Format hint (e.g. `date-time`, `int64`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether null is an accepted value
    #[serde(skip_serializing_if = "is_false")]
    pub nullable: bool,

    /// Default value applied by the API server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Allowed values
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_: Vec<Value>,

    /// Regex constraint for strings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Example value (documentation only, never validated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    #[serde(skip_serializing_if = "is_false")]
    pub exclusive_minimum: bool,

    #[serde(skip_serializing_if = "is_false")]
    pub exclusive_maximum: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<i64>,

    /// Whether array items must be unique
    #[serde(skip_serializing_if = "is_false")]
    pub unique_items: bool,

    /// Names of required child properties
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<JsonSchemaProps>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<JsonSchemaProps>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<JsonSchemaProps>,

    /// Subschema values must not match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<JsonSchemaProps>>,

    /// Named child properties
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, JsonSchemaProps>,

    /// Array item schema, single or tuple form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<SchemaOrArray>,

    /// Schema or boolean gate for undeclared object properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<SchemaOrBool>,

    /// Schema or boolean gate for items beyond a tuple
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_items: Option<SchemaOrBool>,

    /// Child schemas keyed by property-name regex
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub pattern_properties: BTreeMap<String, JsonSchemaProps>,

    /// Reusable schema definitions
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub definitions: BTreeMap<String, JsonSchemaProps>,

    /// Per-property dependencies, schema or property-list form
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, SchemaOrStringArray>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl JsonSchemaProps {
    /// Semantic deep equality: field by field, with `required` compared as a
    /// set rather than an ordered list. Neither side is modified.
    pub fn semantic_eq(&self, other: &JsonSchemaProps) -> bool {
        self.normalized() == other.normalized()
    }

    /// Returns a copy with every set-like field in canonical order.
    fn normalized(&self) -> JsonSchemaProps {
        let mut copy = self.clone();
        copy.normalize();
        copy
    }

    fn normalize(&mut self) {
        self.required.sort();
        self.required.dedup();

        for child in self.properties.values_mut() {
            child.normalize();
        }
        for child in self.pattern_properties.values_mut() {
            child.normalize();
        }
        for child in self.definitions.values_mut() {
            child.normalize();
        }
        for child in self
            .all_of
            .iter_mut()
            .chain(self.any_of.iter_mut())
            .chain(self.one_of.iter_mut())
        {
            child.normalize();
        }
        if let Some(not) = self.not.as_mut() {
            not.normalize();
        }
        match self.items.as_mut() {
            Some(SchemaOrArray::Schema(child)) => child.normalize(),
            Some(SchemaOrArray::Array(children)) => {
                for child in children {
                    child.normalize();
                }
            }
            None => {}
        }
        for gate in [
            self.additional_properties.as_mut(),
            self.additional_items.as_mut(),
        ]
        .into_iter()
        .flatten()
        {
            if let SchemaOrBool::Schema(child) = gate {
                child.normalize();
            }
        }
        for dependency in self.dependencies.values_mut() {
            match dependency {
                SchemaOrStringArray::Schema(child) => child.normalize(),
                SchemaOrStringArray::Properties(names) => {
                    names.sort();
                    names.dedup();
                }
            }
        }
    }
}

/// Array item schema: a single schema applied to every item, or a tuple of
/// per-position schemas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrArray {
    Schema(Box<JsonSchemaProps>),
    Array(Vec<JsonSchemaProps>),
}

/// Boolean-or-schema form used by `additionalProperties` and `additionalItems`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrBool {
    Allowed(bool),
    Schema(Box<JsonSchemaProps>),
}

/// Dependency value: a schema the object must additionally satisfy, or a list
/// of property names that become required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrStringArray {
    Schema(Box<JsonSchemaProps>),
    Properties(Vec<String>),
}
