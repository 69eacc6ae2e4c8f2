// src/core/lab.rs

use crate::api::ApiError;
use crate::api::lab::LabApi;
use crate::models::LabFile;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

const PUBLIC_PREFIX: &str = "public/";
const FALLBACK_DIR_NAME: &str = "lab";

#[derive(Error, Debug)]
pub enum LabError {
    #[error("Could not create directory '{path}': {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not write '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Refusing to write '{0}' outside of the lab directory.")]
    UnsafePath(String),
    #[error("Download of '{path}' failed: {source}")]
    Download {
        path: String,
        #[source]
        source: ApiError,
    },
}

/// Summary of a lab download. Failed files were reported and skipped.
#[derive(Debug, Default)]
pub struct LabReport {
    pub directory: PathBuf,
    pub downloaded: Vec<PathBuf>,
    pub failed: Vec<(String, LabError)>,
}

impl LabReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Turns a lab title into a directory name: quotes trimmed, path and shell
/// metacharacters and spaces replaced with `_`, lowercased. Titles that would name
/// the current or parent directory fall back to `lab`.
pub fn sanitize_directory_name(title: &str) -> String {
    let trimmed = title.trim_matches(|c| matches!(c, '"' | '\'' | '`'));
    let sanitized: String = trimmed
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | ' ' => '_',
            other => other,
        })
        .collect::<String>()
        .to_lowercase();

    if matches!(sanitized.as_str(), "" | "." | "..") {
        FALLBACK_DIR_NAME.to_string()
    } else {
        sanitized
    }
}

/// Where a listed file lands inside the lab directory. Public files are flattened
/// to the lab root; anything escaping the directory is rejected.
pub fn target_path(lab_dir: &Path, file_path: &str) -> Result<PathBuf, LabError> {
    let relative = file_path.strip_prefix(PUBLIC_PREFIX).unwrap_or(file_path);
    let candidate = Path::new(relative);

    let is_safe = !relative.is_empty()
        && candidate
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
    if !is_safe {
        return Err(LabError::UnsafePath(file_path.to_string()));
    }

    Ok(lab_dir.join(candidate))
}

/// Downloads every file of a lab into `lab_dir`, continuing past individual failures.
pub fn download_lab_files(
    api: &dyn LabApi,
    token: &str,
    lab_dir: &Path,
    files: &[LabFile],
) -> Result<LabReport, LabError> {
    fs::create_dir_all(lab_dir).map_err(|e| LabError::CreateDir {
        path: lab_dir.display().to_string(),
        source: e,
    })?;

    let bar = ProgressBar::new(files.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("  [{pos}/{len}] {bar:30.cyan/blue} {wide_msg}") {
        bar.set_style(style);
    }

    let mut report = LabReport {
        directory: lab_dir.to_path_buf(),
        ..Default::default()
    };

    for file in files {
        bar.set_message(file.path.clone());
        match download_one(api, token, lab_dir, file) {
            Ok(path) => {
                log::debug!("Downloaded '{}' to '{}'.", file.path, path.display());
                report.downloaded.push(path);
            }
            Err(e) => {
                bar.suspend(|| eprintln!("  {} {}", "✗".red(), e));
                report.failed.push((file.path.clone(), e));
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    Ok(report)
}

fn download_one(
    api: &dyn LabApi,
    token: &str,
    lab_dir: &Path,
    file: &LabFile,
) -> Result<PathBuf, LabError> {
    let destination = target_path(lab_dir, &file.path)?;
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| LabError::CreateDir {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    // Listings occasionally omit the URL; ask for a fresh one in that case.
    let url = if file.url.is_empty() {
        api.get_lab_file_url(token, &file.path)
            .map_err(|e| LabError::Download {
                path: file.path.clone(),
                source: e,
            })?
            .url
    } else {
        file.url.clone()
    };

    let mut out = fs::File::create(&destination).map_err(|e| LabError::Write {
        path: destination.display().to_string(),
        source: e,
    })?;
    if let Err(e) = api.download_to(&url, &mut out) {
        drop(out);
        if let Err(remove_err) = fs::remove_file(&destination) {
            log::warn!(
                "Could not remove partial download '{}': {}",
                destination.display(),
                remove_err
            );
        }
        return Err(LabError::Download {
            path: file.path.clone(),
            source: e,
        });
    }

    Ok(destination)
}
