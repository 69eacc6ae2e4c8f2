// src/cli/handlers/config.rs

use anyhow::Result;
use colored::*;

use crate::{
    cli::{args::ConfigArgs, handlers::commons},
    models::AppConfig,
};

/// Prints the effective configuration and where each value comes from.
pub fn handle(args: Vec<String>, config: &AppConfig) -> Result<()> {
    let _: ConfigArgs = commons::parse_args(&args);

    println!("{:<16} {}", t!("config.api_base_url").bold(), config.api_base_url);
    println!("{:<16} {}", t!("config.source").bold(), config.api_base_url_source);
    let project = if config.project_config_present {
        config.project_config_path.display().to_string()
    } else {
        format!(
            "{} {}",
            config.project_config_path.display(),
            t!("config.project_missing").dimmed()
        )
    };
    println!("{:<16} {}", t!("config.project_file").bold(), project);
    Ok(())
}
