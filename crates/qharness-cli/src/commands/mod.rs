//! CLI command implementations.

pub mod common;
pub mod run;
pub mod version;
