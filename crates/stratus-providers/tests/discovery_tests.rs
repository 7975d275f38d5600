//! Integration tests for local source-tree discovery

mod common;

use common::write_descriptor;
use stratus_providers::{DiscoveryContext, ProvidersManager};
use tempfile::TempDir;

fn manager_with_sources(sources: &TempDir) -> ProvidersManager {
    let ctx = DiscoveryContext::new().with_local_sources(sources.path());
    ProvidersManager::new(ctx).unwrap()
}

#[test]
fn test_scan_finds_nested_providers() {
    let sources = TempDir::new().unwrap();
    write_descriptor(
        &sources.path().join("http"),
        "package-name: stratus-providers-http\nversions: [\"1.0.0\"]\n",
    );
    write_descriptor(
        &sources.path().join("google").join("cloud"),
        "package-name: stratus-providers-google-cloud\nversions: [\"3.1.0\"]\n",
    );

    let mut manager = manager_with_sources(&sources);
    let providers = manager.providers().unwrap();
    assert_eq!(providers.len(), 2);
    assert!(providers.contains_key("stratus-providers-http"));
    assert!(providers.contains_key("stratus-providers-google-cloud"));
    assert_eq!(providers["stratus-providers-google-cloud"].version, "3.1.0");
}

#[test]
fn test_scan_does_not_descend_into_providers() {
    let sources = TempDir::new().unwrap();
    write_descriptor(
        &sources.path().join("a"),
        "package-name: stratus-providers-a\nversions: [\"1.0.0\"]\n",
    );
    // A descriptor nested inside a provider directory is part of that
    // provider's opaque layout, not a provider of its own.
    write_descriptor(
        &sources.path().join("a").join("sub"),
        "package-name: stratus-providers-a-sub\nversions: [\"1.0.0\"]\n",
    );

    let mut manager = manager_with_sources(&sources);
    let providers = manager.providers().unwrap();
    assert_eq!(providers.len(), 1);
    assert!(providers.contains_key("stratus-providers-a"));
}

#[test]
fn test_broken_descriptor_skips_that_provider_only() {
    let sources = TempDir::new().unwrap();
    write_descriptor(&sources.path().join("broken"), ":::\n  not: [[[yaml");
    write_descriptor(
        &sources.path().join("invalid"),
        // Parses but fails the manifest schema.
        "package-name: stratus-providers-invalid\n",
    );
    write_descriptor(
        &sources.path().join("good"),
        "package-name: stratus-providers-good\nversions: [\"1.0.0\"]\n",
    );

    let mut manager = manager_with_sources(&sources);
    let providers = manager.providers().unwrap();
    assert_eq!(providers.len(), 1);
    assert!(providers.contains_key("stratus-providers-good"));
}

#[test]
fn test_missing_sources_root_degrades_to_empty() {
    let sources = TempDir::new().unwrap();
    let gone = sources.path().join("does-not-exist");
    let ctx = DiscoveryContext::new().with_local_sources(gone);

    let mut manager = ProvidersManager::new(ctx).unwrap();
    assert!(manager.providers().unwrap().is_empty());
}

#[test]
fn test_no_sources_configured_degrades_to_empty() {
    let mut manager = ProvidersManager::new(DiscoveryContext::new()).unwrap();
    assert!(manager.providers().unwrap().is_empty());
}

#[test]
fn test_package_name_derived_from_directory_not_manifest() {
    let sources = TempDir::new().unwrap();
    // Manifest declares a different name; the derived directory name keys
    // the table for local sources.
    write_descriptor(
        &sources.path().join("http"),
        "package-name: something-else-entirely\nversions: [\"1.0.0\"]\n",
    );

    let mut manager = manager_with_sources(&sources);
    let providers = manager.providers().unwrap();
    assert!(providers.contains_key("stratus-providers-http"));
    assert_eq!(
        providers["stratus-providers-http"].manifest.package_name,
        "something-else-entirely"
    );
}
