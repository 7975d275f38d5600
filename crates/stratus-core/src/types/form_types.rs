//! Connection-form field types contributed by hooks

use serde::{Deserialize, Serialize};

/// Field kinds the connection form renderer supports
///
/// A hook declaring a widget with any other kind has its whole widget set
/// rejected by the registry.
pub const ALLOWED_FIELD_KINDS: &[&str] = &["integer", "password", "string", "boolean"];

/// Descriptor of a single connection-form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    /// Field kind, expected to be one of [`ALLOWED_FIELD_KINDS`]
    pub kind: String,

    /// Label shown next to the field
    #[serde(default)]
    pub label: Option<String>,

    /// Help text shown under the field
    #[serde(default)]
    pub description: Option<String>,
}

impl FormField {
    /// Create a field descriptor of an arbitrary kind
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            label: None,
            description: None,
        }
    }

    /// Create a string field
    pub fn string() -> Self {
        Self::new("string")
    }

    /// Create an integer field
    pub fn integer() -> Self {
        Self::new("integer")
    }

    /// Create a password field
    pub fn password() -> Self {
        Self::new("password")
    }

    /// Create a boolean field
    pub fn boolean() -> Self {
        Self::new("boolean")
    }

    /// Attach a label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Whether the field kind is supported by the form renderer
    pub fn is_allowed(&self) -> bool {
        ALLOWED_FIELD_KINDS.contains(&self.kind.as_str())
    }
}

/// One registered connection-form widget, keyed in the registry by its
/// namespaced field name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionFormWidgetInfo {
    /// Dotted path of the hook class that contributed the field
    pub hook_class_name: String,

    /// Package that contributed the field
    pub package_name: String,

    /// The field descriptor itself
    pub field: FormField,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_kinds() {
        assert!(FormField::string().is_allowed());
        assert!(FormField::integer().is_allowed());
        assert!(FormField::password().is_allowed());
        assert!(FormField::boolean().is_allowed());
        assert!(!FormField::new("datetime").is_allowed());
    }

    #[test]
    fn test_with_label() {
        let field = FormField::string().with_label("API token");
        assert_eq!(field.label.as_deref(), Some("API token"));
        assert_eq!(field.kind, "string");
    }
}
