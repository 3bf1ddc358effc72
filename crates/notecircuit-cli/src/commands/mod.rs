//! CLI command implementations

pub mod compile;
pub mod inspect;
pub mod json_output;
pub mod validate;

mod reporting;
