//! Shared fixtures for registry integration tests

use serde_json::{json, Value};
use std::path::Path;

/// Write a provider.yaml descriptor into `dir`, creating it as needed
pub fn write_descriptor(dir: &Path, yaml: &str) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join("provider.yaml"), yaml).unwrap();
}

/// Minimal valid manifest document for an installed distribution
pub fn manifest_value(package_name: &str, version: &str) -> Value {
    json!({
        "package-name": package_name,
        "versions": [version],
    })
}

/// Manifest document declaring hook classes
pub fn manifest_with_hooks(package_name: &str, version: &str, hooks: &[&str]) -> Value {
    json!({
        "package-name": package_name,
        "versions": [version],
        "hook-class-names": hooks,
    })
}

/// A well-formed field-behaviours document
pub fn field_behaviours_doc() -> Value {
    json!({
        "hidden_fields": ["port"],
        "relabeling": {"host": "Service endpoint"},
    })
}
