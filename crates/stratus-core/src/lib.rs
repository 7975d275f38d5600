//! # stratus-core
//!
//! Core library for the Stratus platform providing:
//! - Provider manifest types (provider.yaml)
//! - JSON Schema validation for manifests and UI field behaviours
//! - Registry record types shared by the platform components

pub mod error;
pub mod schema;
pub mod types;

pub use error::{Error, Result};
pub use schema::{SchemaValidator, FIELD_BEHAVIOURS_SCHEMA, PROVIDER_MANIFEST_SCHEMA};
