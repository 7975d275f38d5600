//! Error types for stratus-core

use thiserror::Error;

/// Result type alias using stratus-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for Stratus
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid manifest content
    #[error("Invalid provider manifest: {message}")]
    InvalidManifest { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Schema validation error
    #[error("Schema validation failed:\n{errors}")]
    SchemaValidation { errors: String },

    /// Schema not found
    #[error("Schema not found: {name}")]
    SchemaNotFound { name: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Distribution name does not match the manifest it exposes
    #[error(
        "The distribution '{distribution}' and the manifest package-name '{manifest}' do not \
         match. Please make sure they are aligned"
    )]
    PackageNameMismatch {
        distribution: String,
        manifest: String,
    },
}

impl Error {
    /// Create an invalid manifest error
    pub fn invalid_manifest(message: impl Into<String>) -> Self {
        Self::InvalidManifest {
            message: message.into(),
        }
    }

    /// Create a schema validation error from a list of errors
    pub fn schema_validation(errors: Vec<String>) -> Self {
        Self::SchemaValidation {
            errors: errors.join("\n"),
        }
    }

    /// Create a schema not found error
    pub fn schema_not_found(name: impl Into<String>) -> Self {
        Self::SchemaNotFound { name: name.into() }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a package name mismatch error
    pub fn package_name_mismatch(
        distribution: impl Into<String>,
        manifest: impl Into<String>,
    ) -> Self {
        Self::PackageNameMismatch {
            distribution: distribution.into(),
            manifest: manifest.into(),
        }
    }
}
