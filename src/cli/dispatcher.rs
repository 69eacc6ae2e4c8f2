// src/cli/dispatcher.rs

use anyhow::{Result, anyhow};
use clap::CommandFactory;

use crate::{
    cli::{Cli, handlers},
    models::AppConfig,
};

/// A command, its aliases, and the handler that parses and runs it.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &AppConfig) -> Result<()>,
}

static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "submit",
        aliases: &["s"],
        handler: handlers::submit::handle,
    },
    CommandDefinition {
        name: "init",
        aliases: &[],
        handler: handlers::init::handle,
    },
    CommandDefinition {
        name: "config",
        aliases: &[],
        handler: handlers::config::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Routes `<command> [args...]` to its handler. With no command, prints the help.
pub fn dispatch(all_args: Vec<String>, config: &AppConfig) -> Result<()> {
    log::debug!("Dispatching args: {:?}", all_args);

    let mut args = all_args.into_iter();
    let Some(name) = args.next() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let command =
        find_command(&name).ok_or_else(|| anyhow!(format!(t!("cli.error.unknown_command"), name = name)))?;
    log::debug!("Resolved command '{}' for '{}'.", command.name, name);
    (command.handler)(args.collect(), config)
}
