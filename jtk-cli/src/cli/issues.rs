//! # Issues Command
//!
//! Fetch, search, create, update, assign and delete Jira issues, and list the
//! fields that `--field` can set.

use std::io::{self, IsTerminal};

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use jtk_core::OutputFormat;
use jtk_core::output::{format_issue_key, format_status, print_header, print_info, print_success, print_warning};
use jtk_core::prompts::prompt_confirm;
use jtk_jira::{CreateIssue, CreatedIssue, JiraClient, JiraIssue, UpdateIssue};
use owo_colors::OwoColorize;
use serde_json::json;

use crate::clients;
use crate::render::{
  FieldDefinitionRow, IssueRow, fields_plain, issue_fields, issue_plain, issues_plain, print_json, table,
};

/// Issue type used when `--type` is not given
const DEFAULT_ISSUE_TYPE: &str = "Task";

/// Results returned by `list` and `search` when `--max` is not given
const DEFAULT_MAX_RESULTS: usize = 50;

/// Command for working with issues
#[derive(Args)]
pub struct IssuesArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: IssuesSubcommands,
}

/// Subcommands for the issues command
#[derive(Subcommand)]
pub enum IssuesSubcommands {
  /// Show an issue
  #[command(long_about = "Show the fields and description of a Jira issue.\n\n\
                   The description is rendered as plain text.")]
  #[command(alias = "view")]
  Get {
    /// The Jira issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,
  },

  /// List recently updated issues
  #[command(long_about = "List issues, most recently updated first.\n\n\
                   Filter by project and/or sprint; use 'current' for the open sprints.")]
  #[command(alias = "ls")]
  List {
    /// Key of the project to list
    #[arg(long, short = 'p')]
    project: Option<String>,

    /// Sprint name, or 'current' for the open sprints
    #[arg(long, short = 's')]
    sprint: Option<String>,

    /// Maximum number of issues to show
    #[arg(long, short = 'm', default_value_t = DEFAULT_MAX_RESULTS)]
    max: usize,
  },

  /// Search issues with JQL
  Search {
    /// JQL query (e.g., "assignee = currentUser() AND resolution = Unresolved")
    #[arg(long)]
    jql: String,

    /// Maximum number of issues to show
    #[arg(long, short = 'm', default_value_t = DEFAULT_MAX_RESULTS)]
    max: usize,
  },

  /// Create an issue
  #[command(long_about = "Create a Jira issue.\n\n\
                   The description may be Markdown or Jira wiki markup. Other fields are\n\
                   set with --field NAME=VALUE, where NAME is a field name or ID; rich\n\
                   text custom fields are converted like the description.")]
  Create {
    /// Key of the project to create the issue in
    #[arg(long, short = 'p')]
    project: String,

    /// Issue summary
    #[arg(long, short = 's')]
    summary: String,

    /// Issue type name
    #[arg(long = "type", short = 't', default_value = DEFAULT_ISSUE_TYPE)]
    issue_type: String,

    /// Issue description (Markdown or Jira wiki markup)
    #[arg(long, short = 'd')]
    description: Option<String>,

    /// Additional field as NAME=VALUE (repeatable)
    #[arg(long = "field", short = 'f', value_name = "NAME=VALUE", value_parser = parse_field_arg)]
    fields: Vec<(String, String)>,
  },

  /// Update an issue's summary, description or other fields
  #[command(long_about = "Update fields of a Jira issue.\n\n\
                   At least one of --summary, --description and --field is required.")]
  #[command(alias = "edit")]
  Update {
    /// The Jira issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,

    /// New summary
    #[arg(long, short = 's')]
    summary: Option<String>,

    /// New description (Markdown or Jira wiki markup)
    #[arg(long, short = 'd')]
    description: Option<String>,

    /// Field to change as NAME=VALUE (repeatable)
    #[arg(long = "field", short = 'f', value_name = "NAME=VALUE", value_parser = parse_field_arg)]
    fields: Vec<(String, String)>,
  },

  /// Assign an issue to a user, or unassign it
  Assign {
    /// The Jira issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,

    /// Account ID of the new assignee
    #[arg(index = 2, required_unless_present = "unassign")]
    account_id: Option<String>,

    /// Remove the current assignee
    #[arg(long, conflicts_with = "account_id")]
    unassign: bool,
  },

  /// Permanently delete an issue
  #[command(alias = "rm")]
  Delete {
    /// The Jira issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,

    /// Skip the confirmation prompt
    #[arg(long)]
    force: bool,
  },

  /// List the fields that --field accepts
  Fields {
    /// Only show custom fields
    #[arg(long)]
    custom: bool,
  },
}

pub(crate) fn handle_issues_command(issues: IssuesArgs, output: OutputFormat) -> Result<()> {
  match issues.subcommand {
    IssuesSubcommands::Get { issue_key } => handle_get_issue_command(&issue_key, output),
    IssuesSubcommands::List { project, sprint, max } => {
      let jql = list_jql(project.as_deref(), sprint.as_deref());
      handle_search_command(&jql, max, output)
    }
    IssuesSubcommands::Search { jql, max } => handle_search_command(&jql, max, output),
    IssuesSubcommands::Create {
      project,
      summary,
      issue_type,
      description,
      fields,
    } => {
      let issue = CreateIssue {
        project,
        summary,
        issue_type,
        description,
        ..CreateIssue::default()
      };
      handle_create_issue_command(issue, &fields, output)
    }
    IssuesSubcommands::Update {
      issue_key,
      summary,
      description,
      fields,
    } => {
      let update = UpdateIssue {
        summary,
        description,
        ..UpdateIssue::default()
      };
      handle_update_issue_command(&issue_key, update, &fields, output)
    }
    IssuesSubcommands::Assign {
      issue_key,
      account_id,
      unassign,
    } => {
      let account_id = if unassign { None } else { account_id };
      handle_assign_command(&issue_key, account_id.as_deref(), output)
    }
    IssuesSubcommands::Delete { issue_key, force } => handle_delete_command(&issue_key, force, output),
    IssuesSubcommands::Fields { custom } => handle_fields_command(custom, output),
  }
}

/// Split `NAME=VALUE` at the first `=`
fn parse_field_arg(arg: &str) -> Result<(String, String), String> {
  match arg.split_once('=') {
    Some((name, value)) if !name.trim().is_empty() => Ok((name.trim().to_string(), value.to_string())),
    _ => Err(format!("Invalid field '{arg}' (expected NAME=VALUE)")),
  }
}

/// JQL behind `issues list`
fn list_jql(project: Option<&str>, sprint: Option<&str>) -> String {
  let sprint_clause = sprint.map(|sprint| {
    if sprint.eq_ignore_ascii_case("current") {
      "sprint in openSprints()".to_string()
    } else {
      format!("sprint = \"{}\"", sprint.replace('"', "\\\""))
    }
  });

  let filter = project
    .map(|project| format!("project = {project}"))
    .into_iter()
    .chain(sprint_clause)
    .collect::<Vec<_>>()
    .join(" AND ");

  if filter.is_empty() {
    "ORDER BY updated DESC".to_string()
  } else {
    format!("{filter} ORDER BY updated DESC")
  }
}

fn handle_get_issue_command(issue_key: &str, output: OutputFormat) -> Result<()> {
  let (rt, jira_client) = clients::create_jira_runtime_and_client()?;
  let issue = rt.block_on(jira_client.get_issue(issue_key))?;

  match output {
    OutputFormat::Json => print_json(&issue)?,
    OutputFormat::Plain => print!("{}", issue_plain(&issue)),
    OutputFormat::Table => display_issue(&issue, &jira_client.browse_url(&issue.key)),
  }

  Ok(())
}

fn display_issue(issue: &JiraIssue, browse_url: &str) {
  let status = issue
    .fields
    .status
    .as_ref()
    .map(|status| format_status(&status.name))
    .unwrap_or_default();
  print_header(&format!("{} {}", issue.key, status));
  println!("{}", table(issue_fields(issue)));
  println!("  {}", browse_url.dimmed());

  let description = issue
    .fields
    .description
    .as_ref()
    .map_or("", |description| description.to_plain_text());
  if description.trim().is_empty() {
    print_info("No description");
  } else {
    print_header("Description");
    println!("{}", description.trim_end());
  }
}

fn handle_search_command(jql: &str, max: usize, output: OutputFormat) -> Result<()> {
  let (rt, jira_client) = clients::create_jira_runtime_and_client()?;
  let issues = rt.block_on(jira_client.search_issues(jql, max))?;

  match output {
    OutputFormat::Json => print_json(&issues)?,
    OutputFormat::Plain => print!("{}", issues_plain(&issues)),
    OutputFormat::Table => {
      if issues.is_empty() {
        print_info("No issues found");
      } else {
        println!("{}", table(issues.iter().map(IssueRow::from)));
      }
    }
  }

  Ok(())
}

async fn create_issue(jira_client: &JiraClient, mut issue: CreateIssue, fields: &[(String, String)]) -> Result<CreatedIssue> {
  issue.fields = jira_client.resolve_fields(fields).await?;
  jira_client.create_issue(&issue).await
}

async fn update_issue(
  jira_client: &JiraClient,
  issue_key: &str,
  mut update: UpdateIssue,
  fields: &[(String, String)],
) -> Result<()> {
  update.fields = jira_client.resolve_fields(fields).await?;
  jira_client.update_issue(issue_key, &update).await
}

fn handle_create_issue_command(issue: CreateIssue, fields: &[(String, String)], output: OutputFormat) -> Result<()> {
  let (rt, jira_client) = clients::create_jira_runtime_and_client()?;
  let created = rt.block_on(create_issue(&jira_client, issue, fields))?;

  match output {
    OutputFormat::Json => print_json(&created)?,
    OutputFormat::Plain => println!("{}", created.key),
    OutputFormat::Table => {
      print_success(&format!("Created issue {}", format_issue_key(&created.key)));
      println!("  {}", jira_client.browse_url(&created.key).dimmed());
    }
  }

  Ok(())
}

fn handle_update_issue_command(
  issue_key: &str,
  update: UpdateIssue,
  fields: &[(String, String)],
  output: OutputFormat,
) -> Result<()> {
  let (rt, jira_client) = clients::create_jira_runtime_and_client()?;
  rt.block_on(update_issue(&jira_client, issue_key, update, fields))?;

  match output {
    OutputFormat::Json => print_json(&json!({ "key": issue_key, "updated": true }))?,
    OutputFormat::Plain => println!("{issue_key}"),
    OutputFormat::Table => print_success(&format!("Updated issue {}", format_issue_key(issue_key))),
  }

  Ok(())
}

fn handle_assign_command(issue_key: &str, account_id: Option<&str>, output: OutputFormat) -> Result<()> {
  let (rt, jira_client) = clients::create_jira_runtime_and_client()?;
  rt.block_on(jira_client.assign_issue(issue_key, account_id))?;

  match output {
    OutputFormat::Json => print_json(&json!({ "key": issue_key, "assignee": account_id }))?,
    OutputFormat::Plain => println!("{issue_key}\t{}", account_id.unwrap_or("-")),
    OutputFormat::Table => match account_id {
      Some(account_id) => print_success(&format!("Assigned {} to {account_id}", format_issue_key(issue_key))),
      None => print_success(&format!("Unassigned {}", format_issue_key(issue_key))),
    },
  }

  Ok(())
}

fn handle_delete_command(issue_key: &str, force: bool, output: OutputFormat) -> Result<()> {
  if !force {
    print_warning(&format!(
      "This will permanently delete {}. This cannot be undone.",
      format_issue_key(issue_key)
    ));
    print_info("Use --force to skip this confirmation.");

    if !io::stdin().is_terminal() {
      bail!("Deletion cancelled (use --force to confirm)");
    }
    if !prompt_confirm(&format!("Delete {issue_key}?"))? {
      print_info("Deletion cancelled.");
      return Ok(());
    }
  }

  let (rt, jira_client) = clients::create_jira_runtime_and_client()?;
  rt.block_on(jira_client.delete_issue(issue_key))?;

  match output {
    OutputFormat::Json => print_json(&json!({ "key": issue_key, "deleted": true }))?,
    OutputFormat::Plain => println!("{issue_key}"),
    OutputFormat::Table => print_success(&format!("Deleted issue {}", format_issue_key(issue_key))),
  }

  Ok(())
}

fn handle_fields_command(custom_only: bool, output: OutputFormat) -> Result<()> {
  let (rt, jira_client) = clients::create_jira_runtime_and_client()?;
  let fields = if custom_only {
    rt.block_on(jira_client.get_custom_fields())?
  } else {
    rt.block_on(jira_client.get_fields())?
  };

  match output {
    OutputFormat::Json => print_json(&fields)?,
    OutputFormat::Plain => print!("{}", fields_plain(&fields)),
    OutputFormat::Table => println!("{}", table(fields.iter().map(FieldDefinitionRow::from))),
  }

  Ok(())
}
