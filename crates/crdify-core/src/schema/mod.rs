//! Typed representation of CustomResourceDefinitions
//!
//! This module provides the structured types the engine compares:
//!
//! - `CustomResourceDefinition` and its versions (`crd`)
//! - `JsonSchemaProps`, the OpenAPI v3 subset Kubernetes validates CRs with (`props`)
//!
//! The types deliberately model only the fields that matter for compatibility
//! analysis. Manifests are parsed with serde and may carry additional fields
//! the engine does not inspect; those are ignored rather than rejected.

mod crd;
mod props;

pub use crd::{
    ConversionStrategy, CustomResourceConversion, CustomResourceDefinition,
    CustomResourceDefinitionSpec, CustomResourceDefinitionStatus, CustomResourceDefinitionVersion,
    ObjectMeta, Scope, VersionSchema,
};
pub use props::{JsonSchemaProps, SchemaOrArray, SchemaOrBool, SchemaOrStringArray};
