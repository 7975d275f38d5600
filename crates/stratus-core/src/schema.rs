//! JSON Schema validation for provider manifests and UI field behaviours

use crate::error::{Error, Result};
use jsonschema::Validator;
use rust_embed::RustEmbed;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Name of the schema every provider manifest must conform to
pub const PROVIDER_MANIFEST_SCHEMA: &str = "provider_manifest";

/// Name of the schema for connection-form field behaviour documents
pub const FIELD_BEHAVIOURS_SCHEMA: &str = "field_behaviours";

/// Embedded schema files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../schemas/"]
#[prefix = ""]
struct EmbeddedSchemas;

/// Schema validator with pre-compiled schemas
#[derive(Debug)]
pub struct SchemaValidator {
    /// Compiled schemas by name
    schemas: HashMap<String, Validator>,
}

impl SchemaValidator {
    /// Create a new schema validator with embedded schemas
    ///
    /// Both registry schemas are compiled exactly once here; validation
    /// afterwards is allocation-light and infallible to look up.
    pub fn new() -> Result<Self> {
        let mut schemas = HashMap::new();

        for file in EmbeddedSchemas::iter() {
            if file.ends_with(".schema.json") {
                let name = file.trim_end_matches(".schema.json").to_string();

                debug!("Loading embedded schema: {}", name);

                if let Some(content) = EmbeddedSchemas::get(&file) {
                    let json_str = std::str::from_utf8(&content.data).map_err(|_| {
                        Error::invalid_manifest(format!("Invalid UTF-8 in schema: {}", file))
                    })?;

                    let compiled = Self::compile(&name, json_str)?;
                    schemas.insert(name, compiled);
                }
            }
        }

        if schemas.is_empty() {
            return Err(Error::schema_not_found("no embedded schemas present"));
        }

        Ok(Self { schemas })
    }

    /// Load from an external schema directory (for development)
    pub fn from_directory(path: &std::path::Path) -> Result<Self> {
        let mut schemas = HashMap::new();

        if path.is_dir() {
            for entry in std::fs::read_dir(path)? {
                let entry = entry?;
                let file_path = entry.path();

                if file_path.extension().is_some_and(|e| e == "json") {
                    if let Some(name) = file_path.file_stem() {
                        let name = name
                            .to_string_lossy()
                            .trim_end_matches(".schema")
                            .to_string();

                        debug!("Loading schema from file: {:?}", file_path);

                        let content = std::fs::read_to_string(&file_path)?;
                        let compiled = Self::compile(&name, &content)?;
                        schemas.insert(name, compiled);
                    }
                }
            }
        }

        if schemas.is_empty() {
            return Err(Error::schema_not_found(format!(
                "No schemas found in {:?}",
                path
            )));
        }

        Ok(Self { schemas })
    }

    fn compile(name: &str, content: &str) -> Result<Validator> {
        let schema_value: Value = serde_json::from_str(content)?;

        jsonschema::validator_for(&schema_value).map_err(|e| {
            Error::invalid_manifest(format!("Failed to compile schema {}: {}", name, e))
        })
    }

    /// Validate a JSON value against a named schema
    pub fn validate(&self, value: &Value, schema_name: &str) -> Result<()> {
        let schema = self
            .schemas
            .get(schema_name)
            .ok_or_else(|| Error::schema_not_found(schema_name))?;

        let errors: Vec<String> = schema
            .iter_errors(value)
            .map(|e| {
                let path = e.instance_path().to_string();
                if path.is_empty() {
                    format!("  - {}", e)
                } else {
                    format!("  - {}: {}", path, e)
                }
            })
            .collect();

        if !errors.is_empty() {
            return Err(Error::schema_validation(errors));
        }

        Ok(())
    }

    /// Validate a YAML string against a named schema
    pub fn validate_yaml(&self, yaml: &str, schema_name: &str) -> Result<()> {
        let value: Value = serde_yaml_ng::from_str(yaml)?;
        self.validate(&value, schema_name)
    }

    /// Check if a schema exists
    pub fn has_schema(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// List available schemas
    pub fn list_schemas(&self) -> Vec<&str> {
        self.schemas.keys().map(|s| s.as_str()).collect()
    }
}
