//! The providers manager: discovery, derived indices and the read surface
//!
//! Constructed once by the platform start-up sequence and shared from there.
//! Every index is materialized lazily: each accessor runs the minimal chain
//! of initialization procedures for its category, each procedure runs at
//! most once per process lifetime, and every procedure other than the
//! provider list itself depends on the list having been discovered first.

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::time::Instant;
use stratus_core::types::{ConnectionFormWidgetInfo, HookInfo, ProviderInfo, ProviderManifest};
use stratus_core::{Error, Result, SchemaValidator, PROVIDER_MANIFEST_SCHEMA};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::discovery::{local_package_name, DiscoveryContext, DESCRIPTOR_FILENAME};
use crate::sanity::sanity_check;

/// Initialization symbol every auth-backend module must expose
const AUTH_BACKEND_INIT_SYMBOL: &str = "init_app";

/// Initialization categories of the registry
///
/// Each category guards one initialization procedure; the dependency edges
/// between them are resolved by [`ProvidersManager::ensure_initialized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Provider discovery itself
    List,
    /// Hooks, connection-form widgets and field behaviours
    Hooks,
    /// Extra-link class names
    ExtraLinks,
    /// Logging handler class names
    Logging,
    /// Secrets backend class names
    SecretsBackends,
    /// API auth backend module names
    AuthBackends,
}

impl Category {
    /// Categories that must complete before this one may run
    fn dependencies(self) -> &'static [Category] {
        match self {
            Category::List => &[],
            _ => &[Category::List],
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::List => "list",
            Category::Hooks => "hooks",
            Category::ExtraLinks => "extra_links",
            Category::Logging => "logging",
            Category::SecretsBackends => "secrets_backends",
            Category::AuthBackends => "auth_backends",
        };
        f.write_str(name)
    }
}

/// Provider discovery and capability registry
///
/// Owns the provider table and every derived index. All tables are
/// reject-on-conflict: the first registration for a key wins and later
/// ones are dropped with a warning, never overwritten.
pub struct ProvidersManager {
    pub(crate) ctx: DiscoveryContext,
    pub(crate) schema_validator: SchemaValidator,

    /// Completion flag per initialization category
    initialized: HashMap<Category, bool>,

    /// Providers keyed by package name
    pub(crate) providers: BTreeMap<String, ProviderInfo>,

    /// Hooks keyed by connection type
    pub(crate) hooks: BTreeMap<String, HookInfo>,

    /// Connection-form widgets keyed by namespaced field name
    pub(crate) connection_form_widgets: BTreeMap<String, ConnectionFormWidgetInfo>,

    /// Field-behaviour documents keyed by connection type
    pub(crate) field_behaviours: BTreeMap<String, Value>,

    pub(crate) extra_link_class_names: BTreeSet<String>,
    pub(crate) logging_class_names: BTreeSet<String>,
    pub(crate) secrets_backend_class_names: BTreeSet<String>,
    pub(crate) auth_backend_module_names: BTreeSet<String>,
}

impl ProvidersManager {
    /// Create the registry, compiling both validation schemas
    ///
    /// No discovery happens here; indices materialize on first access.
    pub fn new(ctx: DiscoveryContext) -> Result<Self> {
        Ok(Self {
            ctx,
            schema_validator: SchemaValidator::new()?,
            initialized: HashMap::new(),
            providers: BTreeMap::new(),
            hooks: BTreeMap::new(),
            connection_form_widgets: BTreeMap::new(),
            field_behaviours: BTreeMap::new(),
            extra_link_class_names: BTreeSet::new(),
            logging_class_names: BTreeSet::new(),
            secrets_backend_class_names: BTreeSet::new(),
            auth_backend_module_names: BTreeSet::new(),
        })
    }

    /// Run the initialization chain for a category: dependencies first,
    /// in fixed order, then the category itself
    pub fn ensure_initialized(&mut self, category: Category) -> Result<()> {
        for dep in category.dependencies() {
            self.run(*dep)?;
        }
        self.run(category)
    }

    /// Run one initialization procedure unless it has already completed
    fn run(&mut self, category: Category) -> Result<()> {
        if self.initialized.get(&category).copied().unwrap_or(false) {
            return Ok(());
        }
        debug!("Initializing providers manager [{}]", category);
        let start = Instant::now();
        match category {
            Category::List => self.initialize_providers_list()?,
            Category::Hooks => self.discover_hooks(),
            Category::ExtraLinks => self.discover_extra_links(),
            Category::Logging => self.discover_logging(),
            Category::SecretsBackends => self.discover_secrets_backends(),
            Category::AuthBackends => self.discover_auth_backends(),
        }
        self.initialized.insert(category, true);
        debug!(
            "Initialization of providers manager [{}] took {:?}",
            category,
            start.elapsed()
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Discovery
    // ------------------------------------------------------------------

    /// Discover all providers from local sources and installed distributions
    ///
    /// Local sources are scanned first so that during development a source
    /// tree provider shadows an installed package of the same derived name.
    fn initialize_providers_list(&mut self) -> Result<()> {
        self.discover_local_source_providers();
        self.discover_installed_providers()
    }

    /// Scan the local source tree for provider.yaml descriptors
    ///
    /// A directory containing a descriptor is one provider; the walk does
    /// not descend into it, so nested descriptors are ignored. Any failure
    /// to read, parse or validate one descriptor skips that provider only.
    fn discover_local_source_providers(&mut self) {
        let Some(root) = self.ctx.local_sources_root.clone() else {
            info!("No local provider sources configured");
            return;
        };
        if !root.is_dir() {
            info!(
                "Local provider source root {:?} does not exist, no local providers",
                root
            );
            return;
        }

        let mut walker = WalkDir::new(&root).into_iter();
        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Error while scanning local provider sources: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }
            let descriptor = entry.path().join(DESCRIPTOR_FILENAME);
            if descriptor.is_file() {
                let package_name = local_package_name(&root, entry.path());
                if let Err(e) = self.add_provider_from_descriptor(&descriptor, &package_name) {
                    warn!("Error when loading '{}': {}", descriptor.display(), e);
                }
                // The provider's internal layout is opaque to the scanner.
                walker.skip_current_dir();
            }
        }
    }

    /// Parse, validate and register one local descriptor
    fn add_provider_from_descriptor(&mut self, path: &Path, package_name: &str) -> Result<()> {
        debug!("Loading {} from {}", package_name, path.display());
        let content = std::fs::read_to_string(path)?;
        let value: Value = serde_yaml_ng::from_str(&content)?;
        self.schema_validator
            .validate(&value, PROVIDER_MANIFEST_SCHEMA)?;
        let manifest: ProviderManifest = serde_json::from_value(value)?;
        let version = manifest
            .versions
            .first()
            .cloned()
            .ok_or_else(|| Error::missing_field("versions"))?;
        self.insert_provider(package_name, ProviderInfo { version, manifest });
        Ok(())
    }

    /// Enumerate installed distributions advertising the provider extension
    /// point and register their manifests
    ///
    /// Every malformed manifest skips that distribution only. The one hard
    /// failure is a distribution whose declared name differs from its
    /// manifest's `package-name`: that indicates a broken packaging and
    /// aborts the whole discovery call.
    fn discover_installed_providers(&mut self) -> Result<()> {
        let mut discovered = Vec::new();
        for distribution in self.ctx.entry_points.iter() {
            if self.providers.contains_key(distribution.name()) {
                warn!(
                    "The provider for package '{}' could not be registered because providers \
                     for that package name have already been registered",
                    distribution.name()
                );
                continue;
            }
            debug!(
                "Loading provider info from distribution '{}'",
                distribution.name()
            );
            discovered.push((
                distribution.name().to_string(),
                distribution.version().to_string(),
                distribution.provider_info(),
            ));
        }

        for (name, version, value) in discovered {
            if let Err(e) = self
                .schema_validator
                .validate(&value, PROVIDER_MANIFEST_SCHEMA)
            {
                warn!(
                    "The manifest of distribution '{}' failed schema validation: {}",
                    name, e
                );
                continue;
            }
            let manifest: ProviderManifest = match serde_json::from_value(value) {
                Ok(manifest) => manifest,
                Err(e) => {
                    warn!("The manifest of distribution '{}' could not be read: {}", name, e);
                    continue;
                }
            };
            if manifest.package_name != name {
                return Err(Error::package_name_mismatch(name, manifest.package_name));
            }
            self.insert_provider(&name, ProviderInfo { version, manifest });
        }
        Ok(())
    }

    /// Insert a provider record unless its package name is already taken
    fn insert_provider(&mut self, package_name: &str, info: ProviderInfo) {
        if self.providers.contains_key(package_name) {
            warn!(
                "The provider for package '{}' could not be registered because providers for \
                 that package name have already been registered",
                package_name
            );
            return;
        }
        self.providers.insert(package_name.to_string(), info);
    }

    // ------------------------------------------------------------------
    // Flat capability passes
    // ------------------------------------------------------------------

    /// Collect the sanity-checked declarations under one manifest key
    fn checked_declarations(
        &self,
        select: impl Fn(&ProviderManifest) -> &[String],
    ) -> Vec<String> {
        let mut accepted = Vec::new();
        for (package_name, provider) in &self.providers {
            for class_name in select(&provider.manifest) {
                if sanity_check(&self.ctx.symbols, package_name, class_name) {
                    accepted.push(class_name.clone());
                }
            }
        }
        accepted
    }

    /// Retrieve all extra links defined in the providers
    fn discover_extra_links(&mut self) {
        let accepted = self.checked_declarations(|m| m.extra_links.as_slice());
        self.extra_link_class_names.extend(accepted);
    }

    /// Retrieve all logging handlers defined in the providers
    fn discover_logging(&mut self) {
        let accepted = self.checked_declarations(|m| m.logging.as_slice());
        self.logging_class_names.extend(accepted);
    }

    /// Retrieve all secrets backends defined in the providers
    fn discover_secrets_backends(&mut self) {
        let accepted = self.checked_declarations(|m| m.secrets_backends.as_slice());
        self.secrets_backend_class_names.extend(accepted);
    }

    /// Retrieve all API auth backends defined in the providers
    ///
    /// An auth backend module also has to expose its conventional
    /// initialization symbol to be accepted.
    fn discover_auth_backends(&mut self) {
        let mut accepted = Vec::new();
        for (package_name, provider) in &self.providers {
            for module_name in &provider.manifest.auth_backends {
                let init_symbol = format!("{}.{}", module_name, AUTH_BACKEND_INIT_SYMBOL);
                if sanity_check(&self.ctx.symbols, package_name, &init_symbol) {
                    accepted.push(module_name.clone());
                }
            }
        }
        self.auth_backend_module_names.extend(accepted);
    }

    // ------------------------------------------------------------------
    // Read surface
    // ------------------------------------------------------------------

    /// Providers keyed by package name
    pub fn providers(&mut self) -> Result<&BTreeMap<String, ProviderInfo>> {
        self.ensure_initialized(Category::List)?;
        Ok(&self.providers)
    }

    /// Look up one provider by package name
    pub fn provider(&mut self, package_name: &str) -> Result<Option<&ProviderInfo>> {
        self.ensure_initialized(Category::List)?;
        Ok(self.providers.get(package_name))
    }

    /// Hooks keyed by connection type
    pub fn hooks(&mut self) -> Result<&BTreeMap<String, HookInfo>> {
        self.ensure_initialized(Category::Hooks)?;
        Ok(&self.hooks)
    }

    /// Look up one hook by connection type
    pub fn hook(&mut self, connection_type: &str) -> Result<Option<&HookInfo>> {
        self.ensure_initialized(Category::Hooks)?;
        Ok(self.hooks.get(connection_type))
    }

    /// Connection-form widgets keyed by namespaced field name
    pub fn connection_form_widgets(
        &mut self,
    ) -> Result<&BTreeMap<String, ConnectionFormWidgetInfo>> {
        self.ensure_initialized(Category::Hooks)?;
        Ok(&self.connection_form_widgets)
    }

    /// Field-behaviour documents keyed by connection type
    pub fn field_behaviours(&mut self) -> Result<&BTreeMap<String, Value>> {
        self.ensure_initialized(Category::Hooks)?;
        Ok(&self.field_behaviours)
    }

    /// Sorted extra-link class names
    pub fn extra_links_class_names(&mut self) -> Result<&BTreeSet<String>> {
        self.ensure_initialized(Category::ExtraLinks)?;
        Ok(&self.extra_link_class_names)
    }

    /// Sorted logging handler class names
    pub fn logging_class_names(&mut self) -> Result<&BTreeSet<String>> {
        self.ensure_initialized(Category::Logging)?;
        Ok(&self.logging_class_names)
    }

    /// Sorted secrets backend class names
    pub fn secrets_backend_class_names(&mut self) -> Result<&BTreeSet<String>> {
        self.ensure_initialized(Category::SecretsBackends)?;
        Ok(&self.secrets_backend_class_names)
    }

    /// Sorted API auth backend module names
    pub fn auth_backend_module_names(&mut self) -> Result<&BTreeSet<String>> {
        self.ensure_initialized(Category::AuthBackends)?;
        Ok(&self.auth_backend_module_names)
    }
}
