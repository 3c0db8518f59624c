//! # Transitions Command
//!
//! List the workflow transitions available on an issue and perform one.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use jtk_core::OutputFormat;
use jtk_core::output::{format_issue_key, format_status, print_info, print_success};
use jtk_jira::{JiraClient, JiraTransition, find_transition};
use serde_json::json;
use tracing::info;

use crate::clients;
use crate::render::{TransitionRow, print_json, table, transitions_plain};

/// Command for working with transitions
#[derive(Args)]
pub struct TransitionsArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: TransitionsSubcommands,
}

/// Subcommands for the transitions command
#[derive(Subcommand)]
pub enum TransitionsSubcommands {
  /// List available transitions
  #[command(alias = "ls")]
  List {
    /// The Jira issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,
  },

  /// Perform a transition
  #[command(long_about = "Move an issue through a workflow transition.\n\n\
                   The transition is matched by ID first, then by name ignoring case.")]
  #[command(alias = "move")]
  Do {
    /// The Jira issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,

    /// Transition name or ID
    #[arg(required = true, index = 2)]
    transition: String,
  },
}

pub(crate) fn handle_transitions_command(transitions: TransitionsArgs, output: OutputFormat) -> Result<()> {
  match transitions.subcommand {
    TransitionsSubcommands::List { issue_key } => handle_list_transitions_command(&issue_key, output),
    TransitionsSubcommands::Do { issue_key, transition } => {
      handle_do_transition_command(&issue_key, &transition, output)
    }
  }
}

fn handle_list_transitions_command(issue_key: &str, output: OutputFormat) -> Result<()> {
  let (rt, jira_client) = clients::create_jira_runtime_and_client()?;
  let transitions = rt.block_on(jira_client.get_transitions(issue_key))?;

  match output {
    OutputFormat::Json => print_json(&transitions)?,
    OutputFormat::Plain => print!("{}", transitions_plain(&transitions)),
    OutputFormat::Table => {
      if transitions.is_empty() {
        print_info(&format!("No transitions available for {}", format_issue_key(issue_key)));
      } else {
        println!("{}", table(transitions.iter().map(TransitionRow::from)));
      }
    }
  }

  Ok(())
}

fn handle_do_transition_command(issue_key: &str, wanted: &str, output: OutputFormat) -> Result<()> {
  let (rt, jira_client) = clients::create_jira_runtime_and_client()?;
  let transition = rt.block_on(apply_transition(&jira_client, issue_key, wanted))?;

  let target = transition
    .to
    .as_ref()
    .map_or(transition.name.as_str(), |status| status.name.as_str());
  match output {
    OutputFormat::Json => print_json(&json!({
      "key": issue_key,
      "transition": transition,
    }))?,
    OutputFormat::Plain => println!("{issue_key}\t{target}"),
    OutputFormat::Table => print_success(&format!(
      "Moved {} to {}",
      format_issue_key(issue_key),
      format_status(target)
    )),
  }

  Ok(())
}

async fn apply_transition(jira_client: &JiraClient, issue_key: &str, wanted: &str) -> Result<JiraTransition> {
  let transitions = jira_client.get_transitions(issue_key).await?;
  let transition = resolve_transition(&transitions, issue_key, wanted)?.clone();
  info!("Using transition {} ({})", transition.name, transition.id);

  jira_client.transition_issue(issue_key, &transition.id).await?;
  Ok(transition)
}

fn resolve_transition<'a>(
  transitions: &'a [JiraTransition],
  issue_key: &str,
  wanted: &str,
) -> Result<&'a JiraTransition> {
  match find_transition(transitions, wanted) {
    Some(transition) => Ok(transition),
    None if transitions.is_empty() => bail!("No transitions are available for {issue_key}"),
    None => {
      let available = transitions
        .iter()
        .map(|transition| format!("{} ({})", transition.name, transition.id))
        .collect::<Vec<_>>()
        .join(", ");
      bail!("Transition '{wanted}' is not available for {issue_key}. Available: {available}")
    }
  }
}
