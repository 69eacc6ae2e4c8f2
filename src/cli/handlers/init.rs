// src/cli/handlers/init.rs

use anyhow::{Context, Result, bail};
use colored::*;
use std::path::PathBuf;

use crate::{
    api::{ApiClient, lab::LabApi},
    cli::{args::InitArgs, handlers::commons},
    core::{lab, paths},
    models::AppConfig,
};

pub fn handle(args: Vec<String>, config: &AppConfig) -> Result<()> {
    let init_args: InitArgs = commons::parse_args(&args);
    commons::ensure_valid_token(&init_args.token)?;

    let api = ApiClient::new(&config.api_base_url)?;

    println!("{}", t!("init.fetching_info").dimmed());
    let info = api
        .get_lab_info(&init_args.token)
        .context(t!("init.error.info"))?;
    println!(
        "{}",
        format!(t!("init.initializing"), title = info.title).cyan().bold()
    );

    let lab_dir = match init_args.dir.as_deref() {
        Some(dir) => paths::expand_user_path(dir)?,
        None => PathBuf::from(lab::sanitize_directory_name(&info.title)),
    };

    println!("{}", t!("init.fetching_files").dimmed());
    let files = api
        .list_lab_files(&init_args.token, init_args.public_only)
        .context(t!("init.error.files"))?;
    println!(t!("init.downloading"), count = files.len());

    let report = lab::download_lab_files(&api, &init_args.token, &lab_dir, &files)?;
    if !report.is_complete() {
        bail!(format!(
            t!("init.error.partial"),
            failed = report.failed.len(),
            total = files.len(),
            dir = report.directory.display()
        ));
    }

    println!(
        "\n{} {}",
        "✔".green(),
        format!(t!("init.success"), dir = report.directory.display()).green()
    );
    println!("{}", t!("init.next_steps"));
    Ok(())
}
