//! Per-property checks
//!
//! Each check claims a small set of `JsonSchemaProps` fields: it inspects
//! them, reports incompatible transitions, and clears them on both copies so
//! the trailing unhandled comparison only sees what nothing claimed.

mod bounds;
mod composition;
mod default_value;
mod description;
mod enumeration;
mod negation;
mod nullable;
mod pattern;
mod required;
mod typing;
mod unique_items;

pub use bounds::{
    MaxItemsCheck, MaxLengthCheck, MaxOptions, MaxPropertiesCheck, MaximumCheck, MinItemsCheck,
    MinLengthCheck, MinOptions, MinPropertiesCheck, MinimumCheck,
};
pub use composition::{AllOfCheck, AnyOfCheck, OneOfCheck};
pub use default_value::{DefaultCheck, DefaultOptions};
pub use description::{DescriptionCheck, DescriptionOptions};
pub use enumeration::{AdditionPolicy, EnumCheck, EnumOptions};
pub use negation::NotCheck;
pub use nullable::{NullableCheck, NullableOptions, ToNullablePolicy};
pub use pattern::{PatternCheck, PatternOptions, RemovalPolicy};
pub use required::{RequiredCheck, RequiredOptions};
pub use typing::{FormatCheck, TypeCheck};
pub use unique_items::UniqueItemsCheck;
