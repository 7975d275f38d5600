//! Shared type definitions for the Stratus registry

mod form_types;
mod provider_types;

pub use form_types::{ConnectionFormWidgetInfo, FormField, ALLOWED_FIELD_KINDS};
pub use provider_types::{HookInfo, ProviderInfo, ProviderManifest};
