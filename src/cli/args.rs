use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// Read-only views over a Terraform state file.
#[derive(Parser, Debug)]
#[command(author, version, about, arg_required_else_help = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print out all modules
    ShowModules(ShowModulesArgs),
    /// Print out all resources
    ShowResources(ShowResourcesArgs),
    /// Print the state reduced to resources matching every FILTER
    Filter(FilterArgs),
}

#[derive(clap::Args, Debug)]
pub struct StateArgs {
    /// Path to the root module (searched recursively for *.tfstate)
    #[arg(short, long, env = "TERRASTATE_ROOT")]
    pub root: Option<PathBuf>,

    /// Explicit state file, skips discovery
    #[arg(short, long, env = "TERRASTATE_FILE")]
    pub state: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ShowModulesArgs {
    #[command(flatten)]
    pub source: StateArgs,

    #[arg(short, long, value_enum, default_value_t = ModulesFormat::Text)]
    pub format: ModulesFormat,
}

#[derive(clap::Args, Debug)]
pub struct ShowResourcesArgs {
    #[command(flatten)]
    pub source: StateArgs,

    #[arg(short, long, value_enum, default_value_t = ResourcesFormat::Text)]
    pub format: ResourcesFormat,
}

#[derive(clap::Args, Debug)]
pub struct FilterArgs {
    /// key=value selectors (module, type, name, id or any resource attribute)
    #[arg(value_name = "FILTER", required = true)]
    pub filters: Vec<String>,

    #[command(flatten)]
    pub source: StateArgs,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModulesFormat {
    Text,
    Json,
    Tree,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourcesFormat {
    Text,
    Json,
    Table,
}
