mod cli;

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, ModulesFormat, ResourcesFormat, StateArgs};
use terrastate::output::{format_json, format_list, format_module_tree, format_resource_table};
use terrastate::{Filter, ReaderConfig, State, StateError, config, read_state};

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.kind() == ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            Cli::command().print_help()?;
            println!();
            return Ok(ExitCode::SUCCESS);
        }
        Err(err) => err.exit(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(config::verbosity_level(cli.verbose).into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(report) => match report.downcast_ref::<StateError>() {
            Some(err) => {
                eprintln!("error: {err}");
                Ok(ExitCode::FAILURE)
            }
            None => Err(report),
        },
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::ShowModules(args) => {
            let state = load(args.source)?;
            let modules = state.list_modules();
            tracing::info!(count = modules.len(), "modules listed");
            let out = match args.format {
                ModulesFormat::Text => format_list("Modules:", &modules),
                ModulesFormat::Json => format_json(&modules)?,
                ModulesFormat::Tree => format_module_tree(&state),
            };
            println!("{out}");
        }
        Command::ShowResources(args) => {
            let state = load(args.source)?;
            let out = match args.format {
                ResourcesFormat::Text => format_list("Resources:", state.list_resources()),
                ResourcesFormat::Json => format_json(&state.list_resources())?,
                ResourcesFormat::Table => format_resource_table(&state.resource_entries()),
            };
            println!("{out}");
        }
        Command::Filter(args) => {
            let filter = Filter::parse(&args.filters)?;
            let state = load(args.source)?;
            println!("{}", format_json(&filter.apply(&state))?);
        }
    }

    Ok(())
}

fn load(source: StateArgs) -> Result<State, StateError> {
    let config = ReaderConfig::resolve(source.root, source.state)?;
    read_state(&config)
}
