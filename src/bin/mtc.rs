// src/bin/mtc.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use mtc::{
    api::ApiError,
    cli::{Cli, dispatcher},
    constants::{EXIT_CONFIG, EXIT_FAILURE},
    core::{config_resolver::ConfigError, config_resolver::ConfigResolver, submission::SubmitError},
};

/// Sets up logging, resolves the configuration once, dispatches the command,
/// and maps any failure to a message and an exit code.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        let code = exit_code_for(&e);
        if code != mtc::constants::EXIT_INTERRUPTED {
            eprintln!("\n{}: {:#}", mtc::t!("common.error").red().bold(), e);
        }
        std::process::exit(code);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let resolver = ConfigResolver::from_environment(cli.config.as_deref(), cli.api_base_url)?;
    let config = resolver.resolve()?;
    log::debug!("Resolved configuration: {:?}", config);

    dispatcher::dispatch(cli.args, &config)
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(e) = err.downcast_ref::<SubmitError>() {
        return e.exit_code();
    }
    if let Some(e) = err.downcast_ref::<ApiError>() {
        return e.exit_code();
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return EXIT_CONFIG;
    }
    // Lab failures arrive wrapped in context; look through the chain.
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ApiError>())
        .map_or(EXIT_FAILURE, ApiError::exit_code)
}
