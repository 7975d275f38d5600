//! Provider discovery and capability registry for Stratus
//!
//! This crate handles:
//! - Provider discovery from local sources and installed distributions
//! - Schema-gated manifest ingestion
//! - Sanity checking of declared capability classes
//! - Extraction of hooks, connection-form widgets, field behaviours and
//!   the auxiliary class-name indices
//! - Lazy, dependency-ordered index initialization and the read surface

pub mod discovery;
mod hooks;
pub mod manager;
pub mod sanity;
pub mod symbols;

pub use discovery::{
    DiscoveryContext, Distribution, EntryPoints, DESCRIPTOR_FILENAME, LOCAL_PACKAGE_PREFIX,
    PROVIDER_EXTENSION_POINT,
};
pub use hooks::WIDGET_FIELD_PREFIX;
pub use manager::{Category, ProvidersManager};
pub use sanity::sanity_check;
pub use symbols::{HookDescriptor, Symbol, SymbolTable};
