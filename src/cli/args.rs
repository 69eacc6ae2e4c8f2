// src/cli/args.rs

use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "mtc submit", no_binary_name = true)]
pub struct SubmitArgs {
    /// The lesson token shown on the lesson page.
    pub token: String,

    /// Reset the lesson's tasks instead of submitting.
    #[arg(short, long)]
    pub reset: bool,

    /// Skip the confirmation prompt and the progress bar.
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Parser, Debug, Default)]
#[command(name = "mtc init", no_binary_name = true)]
pub struct InitArgs {
    /// The lesson token of the lab to download.
    pub token: String,

    /// Download only the public files of the lab.
    #[arg(short, long)]
    pub public_only: bool,

    /// Directory to download into. Defaults to a name derived from the lab title.
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<String>,
}

#[derive(Parser, Debug, Default)]
#[command(name = "mtc config", no_binary_name = true)]
pub struct ConfigArgs {}
