// src/core/submission.rs

use crate::api::{ApiError, LessonApi};
use crate::constants::{EXIT_FAILURE, EXIT_INTERRUPTED};
use crate::models::{Lesson, SubmissionBatch, Task};
use crate::system::executor::CommandExecutor;
use crate::system::progress::{ProgressIndicator, ProgressOutcome};
use colored::*;
use std::fmt::Write;
use thiserror::Error;

const RULE: &str = "------------------------------------------------------------------";

/// The stages a submission moves through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Resetting,
    AwaitingConfirmation,
    Executing,
    Submitting,
    Complete,
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Error getting lesson: {0}")]
    Fetch(#[source] ApiError),
    #[error("Error resetting lesson: {0}")]
    Reset(#[source] ApiError),
    #[error("Error getting confirmation: {0}")]
    Prompt(#[source] dialoguer::Error),
    #[error("Error submitting lesson: {0}")]
    Submit(#[source] ApiError),
}

impl SubmitError {
    /// The stage that failed. Every failure is terminal.
    pub fn stage(&self) -> Stage {
        match self {
            SubmitError::Fetch(_) => Stage::Fetching,
            SubmitError::Reset(_) => Stage::Resetting,
            SubmitError::Prompt(_) => Stage::AwaitingConfirmation,
            SubmitError::Submit(_) => Stage::Submitting,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            SubmitError::Fetch(e) | SubmitError::Reset(e) | SubmitError::Submit(e) => e.exit_code(),
            SubmitError::Prompt(dialoguer::Error::IO(e))
                if e.kind() == std::io::ErrorKind::Interrupted =>
            {
                EXIT_INTERRUPTED
            }
            SubmitError::Prompt(_) => EXIT_FAILURE,
        }
    }
}

/// How a submission run ended when nothing failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// `--reset` was requested; no command ran.
    Reset(Lesson),
    /// The user declined; no command ran and nothing was submitted.
    Aborted,
    /// Results were submitted; holds the lesson with the graded task statuses.
    Graded(Lesson),
}

/// Yes/no confirmation before any lesson command runs.
pub trait ConfirmPrompt {
    fn confirm(&self, prompt: &str) -> Result<bool, dialoguer::Error>;
}

/// Drives fetch → confirm → execute → submit → render for a single lesson token.
pub struct SubmissionWorkflow<'a> {
    api: &'a dyn LessonApi,
    executor: &'a dyn CommandExecutor,
    prompt: &'a dyn ConfirmPrompt,
    progress: &'a dyn ProgressIndicator,
}

impl std::fmt::Debug for SubmissionWorkflow<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionWorkflow").finish_non_exhaustive()
    }
}

impl<'a> SubmissionWorkflow<'a> {
    pub fn new(
        api: &'a dyn LessonApi,
        executor: &'a dyn CommandExecutor,
        prompt: &'a dyn ConfirmPrompt,
        progress: &'a dyn ProgressIndicator,
    ) -> Self {
        Self {
            api,
            executor,
            prompt,
            progress,
        }
    }

    pub fn run(&self, token: &str, reset: bool) -> Result<SubmissionOutcome, SubmitError> {
        enter(Stage::Fetching);
        let lesson = self.api.get_lesson(token).map_err(SubmitError::Fetch)?;
        log::debug!(
            "Lesson '{}' has {} command(s) and {} task(s).",
            lesson.id,
            lesson.cli_commands.len(),
            lesson.tasks.len()
        );

        if reset {
            enter(Stage::Resetting);
            let lesson = self.api.reset_lesson(token).map_err(SubmitError::Reset)?;
            println!("\n{}", t!("submit.reset_done").green().bold());
            print!("{}", render_task_table(&lesson.tasks));
            return Ok(SubmissionOutcome::Reset(lesson));
        }

        enter(Stage::AwaitingConfirmation);
        print!("{}", render_task_table(&lesson.tasks));
        print!("{}", render_command_list(&lesson.cli_commands));
        let ready = self
            .prompt
            .confirm(t!("submit.confirm"))
            .map_err(SubmitError::Prompt)?;
        if !ready {
            println!("{}", t!("submit.aborted").yellow());
            return Ok(SubmissionOutcome::Aborted);
        }

        // The animation is cosmetic; a broken terminal must not stop the submission.
        match self.progress.run() {
            Ok(ProgressOutcome::Cancelled) => log::debug!("Progress animation skipped by user."),
            Ok(ProgressOutcome::Completed) => {}
            Err(e) => log::warn!("Progress animation failed: {}", e),
        }

        enter(Stage::Executing);
        let results = self.executor.run_all(&lesson.cli_commands);
        let batch = SubmissionBatch::command_results(results);

        enter(Stage::Submitting);
        let graded = self
            .api
            .submit_lesson(token, &batch)
            .map_err(SubmitError::Submit)?;

        enter(Stage::Complete);
        println!("\n{}", t!("submit.graded").green().bold());
        print!("{}", render_task_table(&graded.tasks));
        println!();
        Ok(SubmissionOutcome::Graded(graded))
    }
}

fn enter(stage: Stage) {
    log::debug!("Submission stage: {:?}", stage);
}

/// Renders the task status table shown before and after grading.
pub fn render_task_table(tasks: &[Task]) -> String {
    let mut out = String::with_capacity(32 + tasks.len() * 48);
    let header = t!("submit.tasks.header");
    let _ = writeln!(out, "\n{}", header.bold());
    let _ = writeln!(out, "{}", "-".repeat(header.chars().count()));
    for task in tasks {
        let _ = writeln!(out, "{} {}", task.status.glyph(), task.title);
    }
    out
}

/// Renders the list of commands that will run, framed by rules.
pub fn render_command_list(commands: &[String]) -> String {
    let mut out = String::with_capacity(RULE.len() * 2 + commands.len() * 40);
    let _ = writeln!(out, "\n{}", t!("submit.commands.intro"));
    let _ = writeln!(out, "{}", RULE.dimmed());
    for command in commands {
        let _ = writeln!(out, "{}", command.cyan());
    }
    let _ = writeln!(out, "{}", RULE.dimmed());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiResult;
    use crate::constants::{EXIT_PROTOCOL, EXIT_UNAVAILABLE};
    use crate::models::{CommandResult, TaskStatus};
    use crate::system::executor::ShellRunner;
    use crate::system::progress::NoProgress;
    use std::cell::{Cell, RefCell};

    fn lesson(commands: &[&str], status: TaskStatus) -> Lesson {
        Lesson {
            id: "lesson-1".to_string(),
            cli_commands: commands.iter().map(|c| c.to_string()).collect(),
            tasks: vec![Task {
                id: "task-1".to_string(),
                title: "Container is running".to_string(),
                status,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[derive(Default)]
    struct FakeApi {
        lesson: Lesson,
        fail_fetch: bool,
        fail_reset: bool,
        fail_submit: bool,
        resets: Cell<usize>,
        submitted: RefCell<Vec<SubmissionBatch>>,
    }

    impl LessonApi for FakeApi {
        fn get_lesson(&self, _token: &str) -> ApiResult<Lesson> {
            if self.fail_fetch {
                return Err(ApiError::Api {
                    status: 404,
                    body: "lesson not found".to_string(),
                });
            }
            Ok(self.lesson.clone())
        }

        fn reset_lesson(&self, _token: &str) -> ApiResult<Lesson> {
            self.resets.set(self.resets.get() + 1);
            if self.fail_reset {
                return Err(ApiError::Api {
                    status: 409,
                    body: "lesson already reset".to_string(),
                });
            }
            let mut fresh = self.lesson.clone();
            for task in &mut fresh.tasks {
                task.status = TaskStatus::Pending;
            }
            Ok(fresh)
        }

        fn submit_lesson(&self, _token: &str, batch: &SubmissionBatch) -> ApiResult<Lesson> {
            self.submitted.borrow_mut().push(batch.clone());
            if self.fail_submit {
                return Err(ApiError::Api {
                    status: 500,
                    body: "grader down".to_string(),
                });
            }
            let mut graded = self.lesson.clone();
            for task in &mut graded.tasks {
                task.status = TaskStatus::Completed;
            }
            Ok(graded)
        }
    }

    #[derive(Default)]
    struct CountingExecutor {
        calls: Cell<usize>,
    }

    impl CommandExecutor for CountingExecutor {
        fn run_all(&self, commands: &[String]) -> Vec<CommandResult> {
            self.calls.set(self.calls.get() + 1);
            commands
                .iter()
                .map(|c| CommandResult {
                    exit_code: 0,
                    command: c.clone(),
                    stdout: String::new(),
                    stderr: String::new(),
                })
                .collect()
        }
    }

    struct Answer(bool);

    impl ConfirmPrompt for Answer {
        fn confirm(&self, _prompt: &str) -> Result<bool, dialoguer::Error> {
            Ok(self.0)
        }
    }

    /// A prompt whose terminal went away, optionally by Ctrl+C.
    struct BrokenPrompt(std::io::ErrorKind);

    impl ConfirmPrompt for BrokenPrompt {
        fn confirm(&self, _prompt: &str) -> Result<bool, dialoguer::Error> {
            Err(dialoguer::Error::IO(std::io::Error::new(self.0, "prompt closed")))
        }
    }

    #[test]
    fn test_declining_runs_and_submits_nothing() {
        let api = FakeApi {
            lesson: lesson(&["echo hi"], TaskStatus::Pending),
            ..Default::default()
        };
        let executor = CountingExecutor::default();

        let outcome = SubmissionWorkflow::new(&api, &executor, &Answer(false), &NoProgress)
            .run("c1234567", false)
            .unwrap();

        assert_eq!(outcome, SubmissionOutcome::Aborted);
        assert_eq!(executor.calls.get(), 0);
        assert!(api.submitted.borrow().is_empty());
    }

    #[test]
    fn test_reset_short_circuits_before_execution() {
        let api = FakeApi {
            lesson: lesson(&["echo hi"], TaskStatus::Completed),
            ..Default::default()
        };
        let executor = CountingExecutor::default();

        let outcome = SubmissionWorkflow::new(&api, &executor, &Answer(true), &NoProgress)
            .run("c1234567", true)
            .unwrap();

        assert!(matches!(
            &outcome,
            SubmissionOutcome::Reset(fresh) if fresh.tasks[0].status == TaskStatus::Pending
        ));
        assert_eq!(api.resets.get(), 1);
        assert_eq!(executor.calls.get(), 0);
        assert!(api.submitted.borrow().is_empty());
    }

    #[test]
    fn test_fetch_failure_is_terminal() {
        let api = FakeApi {
            fail_fetch: true,
            ..Default::default()
        };
        let executor = CountingExecutor::default();

        let err = SubmissionWorkflow::new(&api, &executor, &Answer(true), &NoProgress)
            .run("c1234567", false)
            .unwrap_err();

        assert_eq!(err.stage(), Stage::Fetching);
        assert_eq!(err.to_string(), "Error getting lesson: lesson not found");
        assert_eq!(err.exit_code(), EXIT_PROTOCOL);
        assert_eq!(executor.calls.get(), 0);
    }

    #[test]
    fn test_reset_failure_is_terminal() {
        let api = FakeApi {
            lesson: lesson(&["echo hi"], TaskStatus::Completed),
            fail_reset: true,
            ..Default::default()
        };
        let executor = CountingExecutor::default();

        let err = SubmissionWorkflow::new(&api, &executor, &Answer(true), &NoProgress)
            .run("c1234567", true)
            .unwrap_err();

        assert_eq!(err.stage(), Stage::Resetting);
        assert_eq!(err.to_string(), "Error resetting lesson: lesson already reset");
        assert_eq!(err.exit_code(), EXIT_PROTOCOL);
        assert_eq!(api.resets.get(), 1);
        assert_eq!(executor.calls.get(), 0);
        assert!(api.submitted.borrow().is_empty());
    }

    #[test]
    fn test_prompt_failure_runs_and_submits_nothing() {
        let api = FakeApi {
            lesson: lesson(&["echo hi"], TaskStatus::Pending),
            ..Default::default()
        };
        let executor = CountingExecutor::default();
        let prompt = BrokenPrompt(std::io::ErrorKind::BrokenPipe);

        let err = SubmissionWorkflow::new(&api, &executor, &prompt, &NoProgress)
            .run("c1234567", false)
            .unwrap_err();

        assert_eq!(err.stage(), Stage::AwaitingConfirmation);
        assert_eq!(err.exit_code(), EXIT_FAILURE);
        assert_eq!(executor.calls.get(), 0);
        assert!(api.submitted.borrow().is_empty());
    }

    #[test]
    fn test_interrupted_prompt_exit_code() {
        let api = FakeApi {
            lesson: lesson(&["echo hi"], TaskStatus::Pending),
            ..Default::default()
        };
        let executor = CountingExecutor::default();
        let prompt = BrokenPrompt(std::io::ErrorKind::Interrupted);

        let err = SubmissionWorkflow::new(&api, &executor, &prompt, &NoProgress)
            .run("c1234567", false)
            .unwrap_err();

        assert_eq!(err.stage(), Stage::AwaitingConfirmation);
        assert_eq!(err.exit_code(), EXIT_INTERRUPTED);
        assert_eq!(executor.calls.get(), 0);
    }

    #[test]
    fn test_submit_failure_discards_results() {
        let api = FakeApi {
            lesson: lesson(&["echo hi"], TaskStatus::Pending),
            fail_submit: true,
            ..Default::default()
        };
        let executor = CountingExecutor::default();

        let err = SubmissionWorkflow::new(&api, &executor, &Answer(true), &NoProgress)
            .run("c1234567", false)
            .unwrap_err();

        assert_eq!(err.stage(), Stage::Submitting);
        assert_eq!(executor.calls.get(), 1);
        assert_eq!(api.submitted.borrow().len(), 1);
    }

    #[test]
    fn test_transport_failure_exit_code() {
        let err = SubmitError::Submit(
            crate::api::ApiClient::new("http://127.0.0.1:9")
                .unwrap()
                .get_lesson("c1234567")
                .unwrap_err(),
        );
        assert_eq!(err.exit_code(), EXIT_UNAVAILABLE);
    }

    #[cfg(unix)]
    #[test]
    fn test_end_to_end_batch_keeps_command_order() {
        let api = FakeApi {
            lesson: lesson(&["echo hi", "exit 3", "/nonexistent/bin"], TaskStatus::Pending),
            ..Default::default()
        };
        let runner = ShellRunner::new();

        let outcome = SubmissionWorkflow::new(&api, &runner, &Answer(true), &NoProgress)
            .run("c1234567", false)
            .unwrap();

        assert!(matches!(
            &outcome,
            SubmissionOutcome::Graded(graded) if graded.tasks[0].status == TaskStatus::Completed
        ));

        let submitted = api.submitted.borrow();
        assert_eq!(submitted.len(), 1);
        let results = submitted[0].results();
        assert_eq!(results.len(), 3);

        assert_eq!(results[0].command, "echo hi");
        assert_eq!(results[0].exit_code, 0);
        assert_eq!(results[0].stdout, "hi");
        assert_eq!(results[0].stderr, "");

        assert_eq!(results[1].command, "exit 3");
        assert_eq!(results[1].exit_code, 3);
        assert_eq!(results[1].stdout, "");

        assert_eq!(results[2].command, "/nonexistent/bin");
        assert_eq!(results[2].exit_code, 127);
        assert_eq!(results[2].stdout, "");
        assert!(results[2].stderr.contains("/nonexistent/bin"));
    }

    #[test]
    fn test_render_task_table_uses_status_glyphs() {
        colored::control::set_override(false);
        let tasks = vec![
            Task {
                title: "First".to_string(),
                status: TaskStatus::Completed,
                ..Default::default()
            },
            Task {
                title: "Second".to_string(),
                status: TaskStatus::Failed,
                ..Default::default()
            },
            Task {
                title: "Third".to_string(),
                ..Default::default()
            },
        ];
        let table = render_task_table(&tasks);
        assert!(table.contains("✅ First"));
        assert!(table.contains("❌ Second"));
        assert!(table.contains("⚪ Third"));
    }

    #[test]
    fn test_render_command_list_keeps_order() {
        colored::control::set_override(false);
        let rendered = render_command_list(&["first".to_string(), "second".to_string()]);
        let first = rendered.find("first").unwrap();
        let second = rendered.find("second").unwrap();
        assert!(first < second);
    }
}
