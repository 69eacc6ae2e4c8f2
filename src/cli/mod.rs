// src/cli/mod.rs

use clap::Parser;

pub mod args;
pub mod dispatcher;
pub mod handlers;

/// Renders the semantic tags of the help template into ANSI styles.
fn build_help_string() -> &'static str {
    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();
    let style = |code: &'static str| if use_colors { code } else { "" };

    let title = style("\x1b[1;33m");
    let hl = style("\x1b[1;36m");
    let hi = style("\x1b[1m");
    let cmd = style("\x1b[36m");
    let group = style("\x1b[1;32m");
    let err = style("\x1b[91m");
    let dim = style("\x1b[2m");
    let reset = style("\x1b[0m");

    let formatted = t!("cli.help.template")
        .replace("<title>", title)
        .replace("</title>", reset)
        .replace("<hl>", hl)
        .replace("</hl>", reset)
        .replace("<hi>", hi)
        .replace("</hi>", reset)
        .replace("<cmd>", cmd)
        .replace("</cmd>", reset)
        .replace("<group>", group)
        .replace("</group>", reset)
        .replace("<err>", err)
        .replace("</err>", reset)
        .replace("<dim>", dim)
        .replace("</dim>", reset);

    // clap keeps the template for the whole process.
    Box::leak(formatted.into_boxed_str())
}

/// mtc: validate lesson tasks on your machine and submit them for grading.
#[derive(Parser, Debug)]
#[command(
    name = "mtc",
    author,
    version,
    about,
    help_template = { build_help_string() },
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Global configuration file to use instead of the per-user one.
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<String>,

    /// API base URL for this run, overriding every configuration file.
    #[arg(short = 'l', long = "api-base-url", value_name = "URL")]
    pub api_base_url: Option<String>,

    /// The command and its arguments, parsed by the command's own handler.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
