//! Hook extraction: connection types, form widgets and field behaviours
//!
//! All three indices are populated in one pass over the provider table
//! because widgets and field behaviours are declared by the hook classes
//! themselves. Per-hook failures are logged and skip that hook only.

use stratus_core::types::{ConnectionFormWidgetInfo, FormField, HookInfo, ALLOWED_FIELD_KINDS};
use stratus_core::FIELD_BEHAVIOURS_SCHEMA;
use tracing::warn;

use crate::manager::ProvidersManager;
use crate::sanity::sanity_check;
use crate::symbols::{HookDescriptor, Symbol};

/// Namespace prefix every connection-form field name must carry
pub const WIDGET_FIELD_PREFIX: &str = "extra__";

impl ProvidersManager {
    /// Retrieve all hooks defined in the providers
    pub(crate) fn discover_hooks(&mut self) {
        let declared: Vec<(String, Vec<String>)> = self
            .providers
            .iter()
            .map(|(name, provider)| (name.clone(), provider.manifest.hook_class_names.clone()))
            .collect();
        for (package_name, hook_class_names) in declared {
            for hook_class_name in hook_class_names {
                self.add_hook(&hook_class_name, &package_name);
            }
        }
    }

    /// Register one declared hook class together with the widgets and field
    /// behaviours it declares directly
    fn add_hook(&mut self, hook_class_name: &str, provider_package: &str) {
        if !sanity_check(&self.ctx.symbols, provider_package, hook_class_name) {
            return;
        }
        let descriptor = match self.ctx.symbols.get(hook_class_name) {
            Some(Symbol::Hook(descriptor)) => descriptor.clone(),
            Some(Symbol::Class) => {
                warn!(
                    "The symbol '{}' from '{}' package is registered but is not a hook class \
                     and cannot be registered as one",
                    hook_class_name, provider_package
                );
                return;
            }
            // Unreachable after a passing sanity check.
            None => return,
        };

        if !descriptor.form_widgets.is_empty() {
            // The whole widget set is rejected if any single field kind is
            // unsupported; no partial registration.
            if let Some((field_name, field)) = descriptor
                .form_widgets
                .iter()
                .find(|(_, field)| !field.is_allowed())
            {
                warn!(
                    "The hook class '{}' declares field '{}' of unsupported kind '{}'. Only \
                     {:?} field kinds are supported",
                    hook_class_name, field_name, field.kind, ALLOWED_FIELD_KINDS
                );
                return;
            }
            self.add_widgets(provider_package, hook_class_name, &descriptor.form_widgets);
        }

        if let Some(behaviours) = &descriptor.field_behaviours {
            self.add_customized_fields(
                provider_package,
                hook_class_name,
                &descriptor,
                behaviours.clone(),
            );
        }

        let Some(connection_type) = require_attr(hook_class_name, "connection type", &descriptor.connection_type)
        else {
            return;
        };
        let Some(connection_id_attribute_name) = require_attr(
            hook_class_name,
            "connection id attribute name",
            &descriptor.connection_id_attribute_name,
        ) else {
            return;
        };
        let Some(hook_name) = require_attr(hook_class_name, "hook name", &descriptor.hook_name)
        else {
            return;
        };

        if self.hooks.contains_key(&connection_type) {
            warn!(
                "A hook for connection type '{}' has already been registered. Ignoring '{}'",
                connection_type, hook_class_name
            );
            return;
        }
        self.hooks.insert(
            connection_type,
            HookInfo {
                hook_class_name: hook_class_name.to_string(),
                connection_id_attribute_name,
                package_name: provider_package.to_string(),
                hook_name,
            },
        );
    }

    /// Register the widgets of one hook class, field by field
    ///
    /// Fields lacking the namespace prefix or already claimed by another
    /// provider are skipped individually; their siblings are unaffected.
    fn add_widgets(
        &mut self,
        package_name: &str,
        hook_class_name: &str,
        widgets: &[(String, FormField)],
    ) {
        for (field_name, field) in widgets {
            if !field_name.starts_with(WIDGET_FIELD_PREFIX) {
                warn!(
                    "The field '{}' from class '{}' does not start with '{}'. Ignoring it",
                    field_name, hook_class_name, WIDGET_FIELD_PREFIX
                );
                continue;
            }
            if self.connection_form_widgets.contains_key(field_name) {
                warn!(
                    "The field '{}' from class '{}' has already been added by another \
                     provider. Ignoring it",
                    field_name, hook_class_name
                );
                continue;
            }
            self.connection_form_widgets.insert(
                field_name.clone(),
                ConnectionFormWidgetInfo {
                    hook_class_name: hook_class_name.to_string(),
                    package_name: package_name.to_string(),
                    field: field.clone(),
                },
            );
        }
    }

    /// Register the field-behaviour document of one hook class under its
    /// connection type
    fn add_customized_fields(
        &mut self,
        package_name: &str,
        hook_class_name: &str,
        descriptor: &HookDescriptor,
        behaviours: serde_json::Value,
    ) {
        let Some(connection_type) = descriptor.connection_type.as_deref() else {
            warn!(
                "Error when loading customized fields from package '{}' hook class '{}': the \
                 hook declares no connection type",
                package_name, hook_class_name
            );
            return;
        };
        if let Err(e) = self
            .schema_validator
            .validate(&behaviours, FIELD_BEHAVIOURS_SCHEMA)
        {
            warn!(
                "Error when loading customized fields from package '{}' hook class '{}': {}",
                package_name, hook_class_name, e
            );
            return;
        }
        if self.field_behaviours.contains_key(connection_type) {
            warn!(
                "The connection type '{}' from package '{}' and class '{}' has already been \
                 customized by another provider. Ignoring it",
                connection_type, package_name, hook_class_name
            );
            return;
        }
        self.field_behaviours
            .insert(connection_type.to_string(), behaviours);
    }
}

/// Read a required hook attribute, or warn that the hook cannot be registered
fn require_attr(hook_class_name: &str, attr: &str, value: &Option<String>) -> Option<String> {
    match value {
        Some(value) => Some(value.clone()),
        None => {
            warn!(
                "The hook class '{}' is missing its {} and cannot be registered",
                hook_class_name, attr
            );
            None
        }
    }
}
