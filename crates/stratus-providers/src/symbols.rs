//! Typed symbol registrations for provider capability classes
//!
//! Manifests refer to capability classes by dotted path strings. Instead of
//! resolving those strings by dynamic loading, provider crates register their
//! concrete symbols here at start-up; the registry then treats "loadable" as
//! "a registration exists for this path". A hook registration carries only
//! the capabilities declared by that exact class: a shared base hook makes
//! its own registration, so its form fields are contributed once rather than
//! once per subclass.

use serde_json::Value;
use std::collections::HashMap;
use stratus_core::types::FormField;
use tracing::warn;

/// Capabilities declared directly by one hook class
#[derive(Debug, Clone, Default)]
pub struct HookDescriptor {
    /// Connection type the hook serves
    pub connection_type: Option<String>,

    /// Name of the attribute holding the connection id on the hook
    pub connection_id_attribute_name: Option<String>,

    /// Human-readable hook name
    pub hook_name: Option<String>,

    /// Connection-form widgets declared by this class itself, in
    /// declaration order, keyed by namespaced field name
    pub form_widgets: Vec<(String, FormField)>,

    /// UI field-behaviour document declared by this class itself
    pub field_behaviours: Option<Value>,
}

impl HookDescriptor {
    /// Create an empty descriptor
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the three hook-level attributes required for registration
    pub fn with_connection(
        mut self,
        connection_type: impl Into<String>,
        connection_id_attribute_name: impl Into<String>,
        hook_name: impl Into<String>,
    ) -> Self {
        self.connection_type = Some(connection_type.into());
        self.connection_id_attribute_name = Some(connection_id_attribute_name.into());
        self.hook_name = Some(hook_name.into());
        self
    }

    /// Declare one connection-form widget
    pub fn with_widget(mut self, field_name: impl Into<String>, field: FormField) -> Self {
        self.form_widgets.push((field_name.into(), field));
        self
    }

    /// Declare a field-behaviour customization document
    pub fn with_field_behaviours(mut self, behaviours: Value) -> Self {
        self.field_behaviours = Some(behaviours);
        self
    }
}

/// One registered symbol
#[derive(Debug, Clone)]
pub enum Symbol {
    /// A hook class with its directly-declared capabilities
    Hook(HookDescriptor),

    /// Any other class or module-level symbol
    Class,
}

/// Registry of symbols keyed by dotted path
///
/// Populated by provider crates at start-up, read-only during discovery.
/// First registration for a path wins; duplicates are dropped with a warning.
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: HashMap<String, Symbol>,
}

impl SymbolTable {
    /// Create an empty symbol table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook class under its dotted path
    pub fn register_hook(&mut self, path: impl Into<String>, descriptor: HookDescriptor) {
        self.register(path.into(), Symbol::Hook(descriptor));
    }

    /// Register a plain class or module symbol under its dotted path
    pub fn register_class(&mut self, path: impl Into<String>) {
        self.register(path.into(), Symbol::Class);
    }

    fn register(&mut self, path: String, symbol: Symbol) {
        if self.entries.contains_key(&path) {
            warn!(
                "The symbol '{}' has already been registered. Ignoring the new registration",
                path
            );
            return;
        }
        self.entries.insert(path, symbol);
    }

    /// Look up a registration by dotted path
    pub fn get(&self, path: &str) -> Option<&Symbol> {
        self.entries.get(path)
    }

    /// Check whether a dotted path is registered
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Number of registered symbols
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no registrations
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_registration_wins() {
        let mut table = SymbolTable::new();
        table.register_hook(
            "stratus.providers.http.hooks.HttpHook",
            HookDescriptor::new().with_connection("http", "http_conn_id", "HTTP"),
        );
        table.register_class("stratus.providers.http.hooks.HttpHook");

        match table.get("stratus.providers.http.hooks.HttpHook") {
            Some(Symbol::Hook(desc)) => {
                assert_eq!(desc.connection_type.as_deref(), Some("http"));
            }
            other => panic!("Expected hook registration, got: {:?}", other),
        }
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_descriptor_builder() {
        let descriptor = HookDescriptor::new()
            .with_connection("postgres", "postgres_conn_id", "PostgreSQL")
            .with_widget("extra__postgres__sslmode", FormField::string());

        assert_eq!(descriptor.hook_name.as_deref(), Some("PostgreSQL"));
        assert_eq!(descriptor.form_widgets.len(), 1);
        assert!(descriptor.field_behaviours.is_none());
    }
}
