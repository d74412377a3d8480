//! Exit codes for the crdify binary

/// Success - no incompatible changes found
pub const SUCCESS: i32 = 0;

/// One or more checks reported an error-level incompatibility
pub const INCOMPATIBLE: i32 = 1;
