//! crdify-core - CRD compatibility diffing and validation
//!
//! This crate compares two revisions of a Kubernetes CustomResourceDefinition
//! and classifies their differences as compatible, warnings, or breaking:
//!
//! - `schema`: typed CRD and OpenAPI v3 schema model
//! - `flatten`: recursive visitor producing `path -> detached sub-schema` maps
//! - `diff`: per-path pairing of two flattened versions
//! - `compare`: the comparator protocol, results, and the unhandled sentinel
//! - `checks`: the check library (per-property and whole-CRD)
//! - `validators`: the CRD, same-version, and served-version passes
//! - `registry` / `config`: declarative selection and option binding
//! - `runner`: the top-level entry point and renderable result tree
//!
//! ```no_run
//! use crdify_core::{Config, Format, Runner};
//!
//! # fn load(_: &str) -> crdify_core::CustomResourceDefinition { unimplemented!() }
//! let old = load("old.yaml");
//! let new = load("new.yaml");
//!
//! let runner = Runner::new(&Config::default())?;
//! let results = runner.run(&old, &new)?;
//!
//! print!("{}", results.render(Format::PlainText)?);
//! assert!(!results.has_failures());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod checks;
pub mod compare;
pub mod config;
pub mod diff;
pub mod flatten;
pub mod kubeversion;
pub mod registry;
pub mod runner;
pub mod schema;
pub mod validators;

pub use compare::{ComparisonResult, PropertyComparisonResult};
pub use config::{Config, ConfigError, ConversionPolicy, EnforcementPolicy};
pub use flatten::{FlattenError, FlattenedVersion};
pub use registry::Registry;
pub use runner::{Format, RenderError, Results, Runner};
pub use schema::{CustomResourceDefinition, CustomResourceDefinitionVersion, JsonSchemaProps};
pub use validators::VersionedComparisonResult;
