//! Provider registry inspection commands
//!
//! Every subcommand builds a registry over the given local source tree and
//! renders one derived index. When invoked from the standalone CLI no
//! provider crates are linked in, so the symbol-gated indices reflect only
//! what the current binary registered.

use anyhow::Result;
use camino::Utf8Path;
use tabled::{Table, Tabled};

use stratus_providers::{DiscoveryContext, ProvidersManager};

use crate::cli::{ProvidersCommands, ProvidersListArgs};
use crate::output;

#[derive(Tabled)]
struct ProviderRow {
    #[tabled(rename = "Package")]
    package: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Description")]
    description: String,
}

#[derive(Tabled)]
struct HookRow {
    #[tabled(rename = "Connection Type")]
    connection_type: String,
    #[tabled(rename = "Hook")]
    hook_name: String,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Package")]
    package: String,
}

#[derive(Tabled)]
struct WidgetRow {
    #[tabled(rename = "Field")]
    field_name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Hook Class")]
    hook_class: String,
    #[tabled(rename = "Package")]
    package: String,
}

/// Main entry point for providers subcommands
pub fn run(cmd: ProvidersCommands, sources: Option<&Utf8Path>) -> Result<()> {
    let mut ctx = DiscoveryContext::new();
    if let Some(sources) = sources {
        ctx = ctx.with_local_sources(sources.as_std_path());
    }
    let mut manager = ProvidersManager::new(ctx)?;

    match cmd {
        ProvidersCommands::List(args) => list(&mut manager, args),
        ProvidersCommands::Hooks => hooks(&mut manager),
        ProvidersCommands::Widgets => widgets(&mut manager),
        ProvidersCommands::Behaviours => behaviours(&mut manager),
        ProvidersCommands::Links => {
            names(&mut manager, "Extra links", ProvidersManager::extra_links_class_names)
        }
        ProvidersCommands::Logging => {
            names(&mut manager, "Logging handlers", ProvidersManager::logging_class_names)
        }
        ProvidersCommands::Secrets => names(
            &mut manager,
            "Secrets backends",
            ProvidersManager::secrets_backend_class_names,
        ),
        ProvidersCommands::Auth => names(
            &mut manager,
            "Auth backend modules",
            ProvidersManager::auth_backend_module_names,
        ),
    }
}

/// List discovered providers
fn list(manager: &mut ProvidersManager, args: ProvidersListArgs) -> Result<()> {
    let providers = manager.providers()?;

    if args.json {
        let manifests: std::collections::BTreeMap<&String, &stratus_core::types::ProviderManifest> =
            providers
                .iter()
                .map(|(name, info)| (name, &info.manifest))
                .collect();
        println!("{}", serde_json::to_string_pretty(&manifests)?);
        return Ok(());
    }

    if providers.is_empty() {
        output::info("No providers discovered");
        return Ok(());
    }

    let rows: Vec<ProviderRow> = providers
        .iter()
        .map(|(name, info)| ProviderRow {
            package: name.clone(),
            version: info.version.clone(),
            description: info.manifest.description.clone().unwrap_or_default(),
        })
        .collect();

    output::header("Providers");
    println!("{}", Table::new(rows));
    Ok(())
}

/// List hooks by connection type
fn hooks(manager: &mut ProvidersManager) -> Result<()> {
    let hooks = manager.hooks()?;

    if hooks.is_empty() {
        output::info("No hooks registered");
        return Ok(());
    }

    let rows: Vec<HookRow> = hooks
        .iter()
        .map(|(connection_type, info)| HookRow {
            connection_type: connection_type.clone(),
            hook_name: info.hook_name.clone(),
            class: info.hook_class_name.clone(),
            package: info.package_name.clone(),
        })
        .collect();

    output::header("Hooks");
    println!("{}", Table::new(rows));
    Ok(())
}

/// List connection-form widgets by field name
fn widgets(manager: &mut ProvidersManager) -> Result<()> {
    let widgets = manager.connection_form_widgets()?;

    if widgets.is_empty() {
        output::info("No connection-form widgets registered");
        return Ok(());
    }

    let rows: Vec<WidgetRow> = widgets
        .iter()
        .map(|(field_name, info)| WidgetRow {
            field_name: field_name.clone(),
            kind: info.field.kind.clone(),
            hook_class: info.hook_class_name.clone(),
            package: info.package_name.clone(),
        })
        .collect();

    output::header("Connection form widgets");
    println!("{}", Table::new(rows));
    Ok(())
}

/// Show field-behaviour documents by connection type
fn behaviours(manager: &mut ProvidersManager) -> Result<()> {
    let behaviours = manager.field_behaviours()?;

    if behaviours.is_empty() {
        output::info("No field behaviours registered");
        return Ok(());
    }

    output::header("Field behaviours");
    for (connection_type, doc) in behaviours {
        output::kv(connection_type, &serde_json::to_string(doc)?);
    }
    Ok(())
}

/// Render one sorted class-name index
fn names<F>(manager: &mut ProvidersManager, title: &str, index: F) -> Result<()>
where
    F: Fn(
        &mut ProvidersManager,
    ) -> stratus_core::Result<&std::collections::BTreeSet<String>>,
{
    let names = index(manager)?;

    if names.is_empty() {
        output::info(&format!("{}: none registered", title));
        return Ok(());
    }

    output::header(title);
    for name in names {
        println!("  {}", name);
    }
    Ok(())
}
