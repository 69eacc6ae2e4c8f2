// src/cli/handlers/commons.rs

// Helpers shared by the command handlers.

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;
use dialoguer::{Confirm, Select, theme::ColorfulTheme};

use crate::{
    api,
    constants::PLATFORMS,
    core::config_resolver,
    core::submission::ConfirmPrompt,
    models::{AppConfig, ConfigFile},
};

/// Parses a handler's own arguments. `--help` and usage errors exit through clap.
pub fn parse_args<T: Parser>(args: &[String]) -> T {
    T::try_parse_from(args).unwrap_or_else(|e| e.exit())
}

/// Rejects tokens that cannot be lesson identifiers before any request is made.
pub fn ensure_valid_token(token: &str) -> Result<()> {
    if api::is_valid_token(token) {
        Ok(())
    } else {
        Err(anyhow!(format!(t!("cli.error.invalid_token"), token = token)))
    }
}

/// Interactive yes/no confirmation, defaulting to yes.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl ConfirmPrompt for TerminalPrompt {
    fn confirm(&self, prompt: &str) -> Result<bool, dialoguer::Error> {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(true)
            .interact()
    }
}

/// Accepts every confirmation without asking.
#[derive(Debug, Default)]
pub struct AutoConfirm;

impl ConfirmPrompt for AutoConfirm {
    fn confirm(&self, prompt: &str) -> Result<bool, dialoguer::Error> {
        log::debug!("Auto-confirming '{}'.", prompt);
        Ok(true)
    }
}

/// Asks which platform the project belongs to and returns its API base URL.
pub fn select_platform() -> Result<&'static str> {
    let labels: Vec<&str> = PLATFORMS.iter().map(|(label, _)| *label).collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("submit.select_platform"))
        .items(&labels)
        .default(0)
        .interact()?;

    PLATFORMS
        .get(selection)
        .map(|(_, url)| *url)
        .ok_or_else(|| anyhow!("Invalid platform selection: {}", selection))
}

/// Makes sure the project has a configuration file, asking for the platform on the
/// first submission. Returns the configuration with the new project layer applied.
pub fn ensure_project_config(config: &AppConfig, interactive: bool) -> Result<AppConfig> {
    if config.project_config_present {
        return Ok(config.clone());
    }
    if !interactive {
        log::info!(
            "No project configuration at '{}'; using {}.",
            config.project_config_path.display(),
            config.api_base_url_source
        );
        return Ok(config.clone());
    }

    println!("{}", t!("submit.first_time").cyan().bold());
    let api_base_url = select_platform()?;
    write_project_config(config, api_base_url)
}

/// Writes the project file and layers it over the current configuration.
pub fn write_project_config(config: &AppConfig, api_base_url: &str) -> Result<AppConfig> {
    let file = ConfigFile {
        api_base_url: Some(config_resolver::validate_base_url(api_base_url)?),
    };
    config_resolver::write_config_file(&config.project_config_path, &file)?;
    println!(
        "{}",
        format!(
            t!("submit.config_saved"),
            path = config.project_config_path.display()
        )
        .dimmed()
    );
    Ok(config.with_project_layer(api_base_url, config.project_config_path.clone()))
}
