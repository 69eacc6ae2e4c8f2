// src/cli/handlers/submit.rs

use anyhow::Result;
use std::io::IsTerminal;

use crate::{
    api::ApiClient,
    cli::{args::SubmitArgs, handlers::commons},
    core::submission::{ConfirmPrompt, SubmissionOutcome, SubmissionWorkflow},
    models::AppConfig,
    system::{
        executor::ShellRunner,
        progress::{NoProgress, ProgressIndicator, TerminalProgress},
    },
};

pub fn handle(args: Vec<String>, config: &AppConfig) -> Result<()> {
    let submit_args: SubmitArgs = commons::parse_args(&args);
    commons::ensure_valid_token(&submit_args.token)?;

    let interactive = !submit_args.yes && std::io::stdin().is_terminal();
    let config = commons::ensure_project_config(config, interactive)?;
    log::debug!(
        "Submitting against {} ({}).",
        config.api_base_url,
        config.api_base_url_source
    );

    let api = ApiClient::new(&config.api_base_url)?;
    let runner = ShellRunner::new();
    let (prompt, progress): (Box<dyn ConfirmPrompt>, Box<dyn ProgressIndicator>) =
        if submit_args.yes {
            (Box::new(commons::AutoConfirm), Box::new(NoProgress))
        } else {
            (
                Box::new(commons::TerminalPrompt),
                Box::new(TerminalProgress::new()),
            )
        };

    let workflow = SubmissionWorkflow::new(&api, &runner, prompt.as_ref(), progress.as_ref());
    match workflow.run(&submit_args.token, submit_args.reset)? {
        SubmissionOutcome::Reset(lesson) => log::info!("Lesson {} reset.", lesson.id),
        SubmissionOutcome::Aborted => log::info!("Submission aborted by the user."),
        SubmissionOutcome::Graded(lesson) => log::info!(
            "Lesson {} graded with {} task(s).",
            lesson.id,
            lesson.tasks.len()
        ),
    }
    Ok(())
}
