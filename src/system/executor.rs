// EN: src/system/executor.rs

use crate::constants::{COMMAND_LOCALE, DEFAULT_SHELL, LAUNCH_FAILURE_EXIT_CODE};
use crate::models::CommandResult;
use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, ExitStatus, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("No shell interpreter configured for the command runner.")]
    EmptyShell,
}

/// Anything able to turn an ordered list of commands into an ordered list of results.
pub trait CommandExecutor {
    /// Runs every command in order. Never fails as a whole: a command that cannot be
    /// run still yields a `CommandResult`.
    fn run_all(&self, commands: &[String]) -> Vec<CommandResult>;
}

/// Runs lesson commands one at a time through a shell, capturing their output.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: PathBuf,
    locale: String,
    cwd: Option<PathBuf>,
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self {
            shell: PathBuf::from(DEFAULT_SHELL),
            locale: COMMAND_LOCALE.to_string(),
            cwd: None,
        }
    }
}

impl ShellRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a different interpreter. It is invoked as `<shell> -c <command>`.
    pub fn with_shell(mut self, shell: impl Into<PathBuf>) -> Result<Self, ExecutionError> {
        let shell = shell.into();
        if shell.as_os_str().is_empty() {
            return Err(ExecutionError::EmptyShell);
        }
        self.shell = shell;
        Ok(self)
    }

    /// Runs commands in `cwd` instead of the current working directory.
    pub fn with_cwd(mut self, cwd: &Path) -> Self {
        self.cwd = Some(dunce::simplified(cwd).to_path_buf());
        self
    }

    /// Executes a single command and classifies its outcome.
    pub fn run_one(&self, command_line: &str) -> CommandResult {
        let mut command = StdCommand::new(&self.shell);
        command
            .arg("-c")
            .arg(command_line)
            .env("LANG", &self.locale)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }

        log::debug!("Running lesson command: {}", command_line);

        // `output()` waits for the process with no timeout.
        match command.output() {
            Ok(output) => classify(command_line, output.status, &output.stdout, &output.stderr),
            Err(e) => {
                log::warn!(
                    "Could not launch '{}' via '{}': {}",
                    command_line,
                    self.shell.display(),
                    e
                );
                launch_failure(command_line)
            }
        }
    }
}

impl CommandExecutor for ShellRunner {
    fn run_all(&self, commands: &[String]) -> Vec<CommandResult> {
        commands.iter().map(|command| self.run_one(command)).collect()
    }
}

/// Maps a finished process to exactly one of: clean exit, non-zero exit, launch failure.
///
/// Stdout is only kept on a clean exit and stderr only on a non-zero exit; the grader
/// expects this shape.
fn classify(command_line: &str, status: ExitStatus, stdout: &[u8], stderr: &[u8]) -> CommandResult {
    match status.code() {
        Some(0) => CommandResult {
            exit_code: 0,
            command: command_line.to_string(),
            stdout: trim_captured(&String::from_utf8_lossy(stdout)).to_string(),
            stderr: String::new(),
        },
        Some(code) => CommandResult {
            exit_code: code,
            command: command_line.to_string(),
            stdout: String::new(),
            stderr: trim_captured(&String::from_utf8_lossy(stderr)).to_string(),
        },
        // Killed by a signal: there is no exit code to report.
        None => launch_failure(command_line),
    }
}

fn launch_failure(command_line: &str) -> CommandResult {
    CommandResult {
        exit_code: LAUNCH_FAILURE_EXIT_CODE,
        command: command_line.to_string(),
        stdout: String::new(),
        stderr: String::new(),
    }
}

/// Removes trailing newlines, carriage returns and tabs. Nothing else is touched.
pub fn trim_captured(text: &str) -> &str {
    text.trim_end_matches(['\n', '\r', '\t'])
}
