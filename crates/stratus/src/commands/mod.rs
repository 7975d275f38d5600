//! CLI command implementations

pub mod providers;
