//! Provider discovery sources
//!
//! Providers reach the registry from two places:
//! 1. Local source trees: any directory under the configured root containing
//!    a `provider.yaml` descriptor is one provider.
//! 2. Installed distributions: provider crates linked into the platform
//!    register a [`Distribution`] under the `stratus_provider` extension
//!    point, exposing a zero-argument callable returning their manifest.
//!
//! Local sources are always scanned first so that during development they
//! take precedence over installed packages of the same name.

use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::symbols::SymbolTable;

/// Descriptor filename recognized by the local source scan
pub const DESCRIPTOR_FILENAME: &str = "provider.yaml";

/// Package-name prefix synthesized for providers found in local sources
pub const LOCAL_PACKAGE_PREFIX: &str = "stratus-providers";

/// Well-known extension point name under which distributions advertise
/// their provider manifest callable
pub const PROVIDER_EXTENSION_POINT: &str = "stratus_provider";

/// Manifest callable exposed by a distribution
pub type ProviderInfoFn = Box<dyn Fn() -> Value + Send + Sync>;

/// One installed distribution advertising the provider extension point
pub struct Distribution {
    name: String,
    version: String,
    provider_info: ProviderInfoFn,
}

impl Distribution {
    /// Create a distribution record with its manifest callable
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        provider_info: impl Fn() -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            provider_info: Box::new(provider_info),
        }
    }

    /// Declared name of the distribution
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version of the distribution
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Invoke the manifest callable
    pub fn provider_info(&self) -> Value {
        (self.provider_info)()
    }
}

impl std::fmt::Debug for Distribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Distribution")
            .field("name", &self.name)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// Registrations made under the provider extension point
#[derive(Debug, Default)]
pub struct EntryPoints {
    distributions: Vec<Distribution>,
}

impl EntryPoints {
    /// Create an empty extension-point table
    pub fn new() -> Self {
        Self::default()
    }

    /// Advertise a distribution
    pub fn register(&mut self, distribution: Distribution) {
        self.distributions.push(distribution);
    }

    /// Iterate registrations in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Distribution> {
        self.distributions.iter()
    }

    /// Number of advertised distributions
    pub fn len(&self) -> usize {
        self.distributions.len()
    }

    /// Whether no distribution is advertised
    pub fn is_empty(&self) -> bool {
        self.distributions.is_empty()
    }
}

/// Everything the registry consults during discovery
///
/// Assembled by the platform start-up sequence before the providers manager
/// is constructed; immutable afterwards.
#[derive(Debug, Default)]
pub struct DiscoveryContext {
    /// Typed symbol registrations made by provider crates
    pub symbols: SymbolTable,

    /// Distributions advertising the provider extension point
    pub entry_points: EntryPoints,

    /// Root of the local provider source tree, if running from sources
    pub local_sources_root: Option<PathBuf>,
}

impl DiscoveryContext {
    /// Create an empty discovery context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the local provider source root
    pub fn with_local_sources(mut self, root: impl Into<PathBuf>) -> Self {
        self.local_sources_root = Some(root.into());
        self
    }
}

/// Derive the package name for a provider found at `dir` under `root`:
/// the fixed prefix joined with every path component of the relative
/// location by hyphens.
pub(crate) fn local_package_name(root: &Path, dir: &Path) -> String {
    let relative = dir.strip_prefix(root).unwrap_or(dir);
    let mut package_name = String::from(LOCAL_PACKAGE_PREFIX);
    for component in relative.components() {
        package_name.push('-');
        package_name.push_str(&component.as_os_str().to_string_lossy());
    }
    package_name
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_local_package_name_nested() {
        let root = Path::new("/src/providers");
        assert_eq!(
            local_package_name(root, Path::new("/src/providers/google/cloud")),
            "stratus-providers-google-cloud"
        );
    }

    #[test]
    fn test_local_package_name_root_itself() {
        let root = Path::new("/src/providers");
        assert_eq!(local_package_name(root, root), "stratus-providers");
    }

    #[test]
    fn test_distribution_callable() {
        let dist = Distribution::new("acme-stratus-plugin", "0.4.2", || {
            json!({"package-name": "acme-stratus-plugin", "versions": ["0.4.2"]})
        });
        assert_eq!(dist.name(), "acme-stratus-plugin");
        assert_eq!(dist.provider_info()["package-name"], "acme-stratus-plugin");
    }
}
