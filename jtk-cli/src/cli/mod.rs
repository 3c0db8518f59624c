//! # Command Line Interface
//!
//! Defines the CLI structure and command handlers for jtk: issues, comments
//! and transitions against a Jira site, offline rich-text conversion, and
//! local configuration.

mod comments;
mod completion;
mod config;
mod convert;
mod issues;
mod transitions;

use anyhow::Result;
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Parser, Subcommand};
use jtk_core::{ColorMode, OutputFormat};

/// Top-level CLI command for jtk
#[derive(Parser)]
#[command(name = "jtk")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "A command-line client for Jira Cloud")]
#[command(
  long_about = "jtk reads, creates and updates Jira issues from the terminal.\n\n\
        Rich text (descriptions and comments) can be written in Markdown or in\n\
        Jira wiki markup; it is converted to the Atlassian Document Format\n\
        before being sent."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Controls when colored output is used
  #[arg(
    long,
    value_enum,
    ignore_case = true,
    global = true,
    default_value_t = ColorMode::Auto,
  )]
  pub colors: ColorMode,

  /// Output format for command results
  #[arg(short = 'o', long = "output", value_enum, global = true, default_value_t = OutputFormat::Table)]
  pub output: OutputFormat,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Subcommands for jtk
#[derive(Subcommand)]
pub enum Commands {
  /// View, create and update issues
  #[command(long_about = "View, create and update Jira issues.\n\n\
            Descriptions may be written in Markdown or Jira wiki markup; the format\n\
            is detected automatically.")]
  #[command(alias = "issue")]
  Issues(issues::IssuesArgs),

  /// List, add and delete issue comments
  #[command(long_about = "List, add and delete comments on a Jira issue.\n\n\
            Comment bodies may be written in Markdown or Jira wiki markup.")]
  #[command(alias = "comment")]
  Comments(comments::CommentsArgs),

  /// List and perform workflow transitions
  #[command(long_about = "Move a Jira issue through its workflow.\n\n\
            Transitions can be referenced by ID or by name (case-insensitive).")]
  #[command(alias = "tr")]
  Transitions(transitions::TransitionsArgs),

  /// Convert rich text without contacting Jira
  #[command(long_about = "Convert rich text locally, exactly as jtk does before sending it.\n\n\
            Reads INPUT, or standard input when INPUT is omitted or '-'.")]
  Convert(convert::ConvertArgs),

  /// Manage the Jira connection settings
  #[command(long_about = "Manage the Jira URL, email and API token used by jtk.\n\n\
            Settings are stored in config.toml under the jtk configuration directory.\n\
            JIRA_URL, JIRA_EMAIL and JIRA_API_TOKEN override the stored values.")]
  #[command(arg_required_else_help = true)]
  Config(config::ConfigArgs),

  /// Generate shell completions
  #[command(long_about = "Generates shell completion scripts for jtk commands.\n\n\
            Supported shells include bash, zsh, fish and PowerShell.")]
  Completion(completion::CompletionArgs),
}

pub fn handle_cli(cli: Cli) -> Result<()> {
  cli.colors.apply();

  let output = cli.output;
  match cli.command {
    Commands::Issues(issues) => issues::handle_issues_command(issues, output),
    Commands::Comments(comments) => comments::handle_comments_command(comments, output),
    Commands::Transitions(transitions) => transitions::handle_transitions_command(transitions, output),
    Commands::Convert(convert) => convert::handle_convert_command(convert, output),
    Commands::Config(config) => config::handle_config_command(config, output),
    Commands::Completion(completion) => completion::handle_completion_command(completion),
  }
}
