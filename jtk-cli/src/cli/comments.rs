//! # Comments Command
//!
//! List, add and delete comments on a Jira issue.

use anyhow::Result;
use clap::{Args, Subcommand};
use jtk_core::OutputFormat;
use jtk_core::output::{format_issue_key, print_info, print_success};
use serde_json::json;

use crate::clients;
use crate::render::{CommentRow, comments_plain, print_json, table};

/// Command for working with comments
#[derive(Args)]
pub struct CommentsArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: CommentsSubcommands,
}

/// Subcommands for the comments command
#[derive(Subcommand)]
pub enum CommentsSubcommands {
  /// List comments on an issue
  #[command(alias = "ls")]
  List {
    /// The Jira issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,

    /// Maximum number of comments to fetch (0 uses the server default)
    #[arg(long, short = 'm', default_value_t = 0)]
    max: u32,
  },

  /// Add a comment to an issue
  #[command(long_about = "Add a comment to a Jira issue.\n\n\
                   The body may be Markdown or Jira wiki markup.")]
  Add {
    /// The Jira issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,

    /// Comment body (Markdown or Jira wiki markup)
    #[arg(long, short = 'b')]
    body: String,
  },

  /// Delete a comment
  #[command(alias = "rm")]
  Delete {
    /// The Jira issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,

    /// ID of the comment to delete
    #[arg(required = true, index = 2)]
    comment_id: String,
  },
}

pub(crate) fn handle_comments_command(comments: CommentsArgs, output: OutputFormat) -> Result<()> {
  match comments.subcommand {
    CommentsSubcommands::List { issue_key, max } => handle_list_comments_command(&issue_key, max, output),
    CommentsSubcommands::Add { issue_key, body } => handle_add_comment_command(&issue_key, &body, output),
    CommentsSubcommands::Delete { issue_key, comment_id } => {
      handle_delete_comment_command(&issue_key, &comment_id, output)
    }
  }
}

fn handle_list_comments_command(issue_key: &str, max: u32, output: OutputFormat) -> Result<()> {
  let (rt, jira_client) = clients::create_jira_runtime_and_client()?;
  let page = rt.block_on(jira_client.get_comments(issue_key, max))?;

  match output {
    OutputFormat::Json => print_json(&page.comments)?,
    OutputFormat::Plain => print!("{}", comments_plain(&page.comments)),
    OutputFormat::Table => {
      if page.comments.is_empty() {
        print_info(&format!("No comments on {}", format_issue_key(issue_key)));
      } else {
        println!("{}", table(page.comments.iter().map(CommentRow::from)));
        if page.total as usize > page.comments.len() {
          print_info(&format!(
            "Showing {} of {} comments",
            page.comments.len(),
            page.total
          ));
        }
      }
    }
  }

  Ok(())
}

fn handle_add_comment_command(issue_key: &str, body: &str, output: OutputFormat) -> Result<()> {
  let (rt, jira_client) = clients::create_jira_runtime_and_client()?;
  let comment = rt.block_on(jira_client.add_comment(issue_key, body))?;

  match output {
    OutputFormat::Json => print_json(&comment)?,
    OutputFormat::Plain => println!("{}", comment.id),
    OutputFormat::Table => print_success(&format!(
      "Added comment {} to {}",
      comment.id,
      format_issue_key(issue_key)
    )),
  }

  Ok(())
}

fn handle_delete_comment_command(issue_key: &str, comment_id: &str, output: OutputFormat) -> Result<()> {
  let (rt, jira_client) = clients::create_jira_runtime_and_client()?;
  rt.block_on(jira_client.delete_comment(issue_key, comment_id))?;

  match output {
    OutputFormat::Json => print_json(&json!({ "key": issue_key, "deleted": comment_id }))?,
    OutputFormat::Plain => println!("{comment_id}"),
    OutputFormat::Table => print_success(&format!(
      "Deleted comment {comment_id} from {}",
      format_issue_key(issue_key)
    )),
  }

  Ok(())
}
