//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Stratus - workflow platform provider registry
#[derive(Parser, Debug)]
#[command(name = "stratus")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Root of a local provider source tree to scan
    #[arg(short, long, global = true)]
    pub sources: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect discovered providers and their capabilities
    #[command(subcommand)]
    Providers(ProvidersCommands),
}

#[derive(Subcommand, Debug)]
pub enum ProvidersCommands {
    /// List discovered providers
    List(ProvidersListArgs),

    /// List hooks by connection type
    Hooks,

    /// List connection-form widgets by field name
    Widgets,

    /// Show field-behaviour customizations by connection type
    Behaviours,

    /// List extra-link class names
    Links,

    /// List logging handler class names
    Logging,

    /// List secrets backend class names
    Secrets,

    /// List API auth backend module names
    Auth,
}

#[derive(Args, Debug)]
pub struct ProvidersListArgs {
    /// Output full manifests as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }
}
