//! Sanity checking of capability declarations
//!
//! A declared dotted path is accepted only if it passes a naming-convention
//! check (for privileged packages) and resolves to a symbol registration.
//! Failures are reported by return value and log output, never by error.

use crate::symbols::SymbolTable;
use tracing::{debug, warn};

/// Package-name prefix marking first-party providers, which must keep their
/// class paths under the package-derived module prefix
const PRIVILEGED_PACKAGE_PREFIX: &str = "stratus";

/// Perform a sanity check on one declared class path.
///
/// For `stratus-*` packages the class path must start with the module prefix
/// derived from the package name (`stratus-providers-http` ->
/// `stratus.providers.http`). For all packages the path must be present in
/// the symbol table. Returns true only if both checks pass.
pub fn sanity_check(symbols: &SymbolTable, provider_package: &str, class_name: &str) -> bool {
    if provider_package.starts_with(PRIVILEGED_PACKAGE_PREFIX) {
        let provider_path = provider_package.replace('-', ".");
        if !class_name.starts_with(&provider_path) {
            warn!(
                "Sanity check failed for '{}' from '{}' package. It should start with '{}'",
                class_name, provider_package, provider_path
            );
            return false;
        }
    }
    if !symbols.contains(class_name) {
        // Expected when a provider's optional crate is not linked into this
        // build, so keep it quiet.
        debug!(
            "The symbol '{}' from '{}' package is not registered. The provider's \
             crate may not be linked into this build",
            class_name, provider_package
        );
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::HookDescriptor;

    fn table_with(path: &str) -> SymbolTable {
        let mut table = SymbolTable::new();
        table.register_class(path);
        table
    }

    #[test]
    fn test_privileged_package_requires_matching_prefix() {
        let table = table_with("elsewhere.hooks.HttpHook");
        assert!(!sanity_check(
            &table,
            "stratus-providers-http",
            "elsewhere.hooks.HttpHook"
        ));
    }

    #[test]
    fn test_privileged_package_with_matching_prefix() {
        let table = table_with("stratus.providers.http.hooks.HttpHook");
        assert!(sanity_check(
            &table,
            "stratus-providers-http",
            "stratus.providers.http.hooks.HttpHook"
        ));
    }

    #[test]
    fn test_third_party_package_skips_prefix_rule() {
        let table = table_with("acme.hooks.AcmeHook");
        assert!(sanity_check(&table, "acme-stratus-plugin", "acme.hooks.AcmeHook"));
    }

    #[test]
    fn test_unregistered_symbol_fails() {
        let table = SymbolTable::new();
        assert!(!sanity_check(
            &table,
            "acme-stratus-plugin",
            "acme.hooks.AcmeHook"
        ));
    }

    #[test]
    fn test_hook_registration_passes() {
        let mut table = SymbolTable::new();
        table.register_hook(
            "stratus.providers.http.hooks.HttpHook",
            HookDescriptor::new(),
        );
        assert!(sanity_check(
            &table,
            "stratus-providers-http",
            "stratus.providers.http.hooks.HttpHook"
        ));
    }
}
