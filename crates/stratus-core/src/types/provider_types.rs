//! Provider manifest and registry record types matching provider_manifest.schema.json

use serde::{Deserialize, Serialize};

/// Provider manifest from provider.yaml or an installed distribution
///
/// The serialized form uses kebab-case keys (`package-name`,
/// `hook-class-names`, ...) as owned by the manifest schema. Unknown keys
/// are tolerated; the runtime registry only reads the fields below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProviderManifest {
    /// Package name of the provider (unique registry key)
    pub package_name: String,

    /// Human-friendly provider name
    #[serde(default)]
    pub name: Option<String>,

    /// Short description
    #[serde(default)]
    pub description: Option<String>,

    /// Released versions, most recent first
    pub versions: Vec<String>,

    /// Hook class paths contributed by the provider
    #[serde(default)]
    pub hook_class_names: Vec<String>,

    /// Extra-link class paths contributed by the provider
    #[serde(default)]
    pub extra_links: Vec<String>,

    /// Logging handler class paths contributed by the provider
    #[serde(default)]
    pub logging: Vec<String>,

    /// Secrets backend class paths contributed by the provider
    #[serde(default)]
    pub secrets_backends: Vec<String>,

    /// API auth backend module paths contributed by the provider
    #[serde(default)]
    pub auth_backends: Vec<String>,
}

/// One registered provider: its current version and accepted manifest
#[derive(Debug, Clone)]
pub struct ProviderInfo {
    /// Current version of the provider package
    pub version: String,

    /// Validated manifest the provider was registered from
    pub manifest: ProviderManifest,
}

/// One registered hook, keyed in the registry by connection type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookInfo {
    /// Dotted path of the hook class
    pub hook_class_name: String,

    /// Name of the attribute holding the connection id on the hook
    pub connection_id_attribute_name: String,

    /// Package that contributed the hook
    pub package_name: String,

    /// Human-readable hook name
    pub hook_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_kebab_case_keys() {
        let yaml = r#"
package-name: stratus-providers-postgres
name: PostgreSQL
versions:
  - "2.1.0"
  - "2.0.0"
hook-class-names:
  - stratus.providers.postgres.hooks.PostgresHook
secrets-backends:
  - stratus.providers.postgres.secrets.PgVaultBackend
"#;

        let manifest: ProviderManifest = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(manifest.package_name, "stratus-providers-postgres");
        assert_eq!(manifest.versions[0], "2.1.0");
        assert_eq!(
            manifest.hook_class_names,
            vec!["stratus.providers.postgres.hooks.PostgresHook"]
        );
        assert_eq!(manifest.secrets_backends.len(), 1);
        assert!(manifest.extra_links.is_empty());
        assert!(manifest.auth_backends.is_empty());
    }

    #[test]
    fn test_manifest_ignores_unknown_keys() {
        let yaml = r#"
package-name: stratus-providers-http
versions: ["1.0.0"]
integrations:
  - name: HTTP
"#;

        let manifest: ProviderManifest = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(manifest.package_name, "stratus-providers-http");
    }
}
