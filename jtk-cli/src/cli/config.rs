//! # Config Command
//!
//! Store, inspect and remove the Jira connection settings, and check that
//! they work.

use std::io::{self, IsTerminal};
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use jtk_core::config::{mask_token, value_source};
use jtk_core::consts::{ENV_JIRA_API_TOKEN, ENV_JIRA_EMAIL, ENV_JIRA_URL};
use jtk_core::output::{format_command, print_info, print_success};
use jtk_core::prompts::{prompt_secret, prompt_text};
use jtk_core::url::normalize_base_url;
use jtk_core::{JiraConfig, OutputFormat, get_config_dirs};
use serde_json::json;
use tabled::Tabled;
use tracing::debug;

use crate::clients;
use crate::render::{print_json, table};

/// Command for managing configuration
#[derive(Args)]
pub struct ConfigArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: ConfigSubcommands,
}

/// Subcommands for the config command
#[derive(Subcommand)]
pub enum ConfigSubcommands {
  /// Store connection settings
  #[command(long_about = "Store the Jira URL, email and API token in config.toml.\n\n\
                   Only the given settings are changed. Without any flags the settings\n\
                   are prompted for interactively.")]
  Set {
    /// Jira site URL (e.g., https://company.atlassian.net)
    #[arg(long)]
    url: Option<String>,

    /// Account email used for authentication
    #[arg(long)]
    email: Option<String>,

    /// API token used for authentication
    #[arg(long)]
    token: Option<String>,
  },

  /// Show the effective settings and where they come from
  Show,

  /// Remove the stored settings
  Clear,

  /// Check that the settings can authenticate against Jira
  Test,
}

/// Setting as shown by `config show`
#[derive(Tabled)]
struct SettingRow {
  #[tabled(rename = "Setting")]
  name: &'static str,
  #[tabled(rename = "Value")]
  value: String,
  #[tabled(rename = "Source")]
  source: &'static str,
}

pub(crate) fn handle_config_command(config: ConfigArgs, output: OutputFormat) -> Result<()> {
  let path = get_config_dirs()?.config_path();
  debug!("Using config file {}", path.display());

  match config.subcommand {
    ConfigSubcommands::Set { url, email, token } => {
      let update = JiraConfig {
        url,
        email,
        api_token: token,
      };
      handle_set_command(&path, update)
    }
    ConfigSubcommands::Show => handle_show_command(&path, output),
    ConfigSubcommands::Clear => handle_clear_command(&path),
    ConfigSubcommands::Test => handle_test_command(output),
  }
}

fn handle_set_command(path: &Path, update: JiraConfig) -> Result<()> {
  let current = JiraConfig::load(path)?;

  let update = if update == JiraConfig::default() {
    if !io::stdin().is_terminal() {
      bail!("No settings given. Pass --url, --email or --token");
    }
    prompt_settings(&current)?
  } else {
    update
  };

  let mut merged = current.merge(update);
  if let Some(url) = &merged.url {
    merged.url = Some(normalize_base_url(url).with_context(|| format!("Invalid Jira URL '{url}'"))?);
  }

  merged.save(path)?;
  print_success(&format!("Saved Jira settings to {}", path.display()));
  print_info(&format!("Check them with {}", format_command("jtk config test")));
  Ok(())
}

fn prompt_settings(current: &JiraConfig) -> Result<JiraConfig> {
  let url = prompt_text("Jira URL", current.url.as_deref())?;
  let email = prompt_text("Email", current.email.as_deref())?;
  let token = prompt_secret("API token")?;

  Ok(JiraConfig {
    url: Some(url),
    email: Some(email),
    api_token: Some(token).filter(|token| !token.is_empty()),
  })
}

fn setting_rows(file: &JiraConfig) -> Vec<SettingRow> {
  let resolved = file.clone().resolve();

  vec![
    SettingRow {
      name: "url",
      value: resolved.url.unwrap_or_default(),
      source: value_source(ENV_JIRA_URL, file.url.as_deref()).as_str(),
    },
    SettingRow {
      name: "email",
      value: resolved.email.unwrap_or_default(),
      source: value_source(ENV_JIRA_EMAIL, file.email.as_deref()).as_str(),
    },
    SettingRow {
      name: "api_token",
      value: mask_token(resolved.api_token.as_deref().unwrap_or_default()),
      source: value_source(ENV_JIRA_API_TOKEN, file.api_token.as_deref()).as_str(),
    },
  ]
}

fn handle_show_command(path: &Path, output: OutputFormat) -> Result<()> {
  let rows = setting_rows(&JiraConfig::load(path)?);

  match output {
    OutputFormat::Json => {
      let mut settings = serde_json::Map::new();
      for row in &rows {
        settings.insert(
          row.name.to_string(),
          json!({ "value": row.value, "source": row.source }),
        );
      }
      settings.insert("path".to_string(), json!(path.display().to_string()));
      print_json(&settings)?;
    }
    OutputFormat::Plain => {
      for row in &rows {
        println!("{}\t{}\t{}", row.name, row.value, row.source);
      }
    }
    OutputFormat::Table => {
      print_info(&format!("Config file: {}", path.display()));
      println!("{}", table(rows));
    }
  }

  Ok(())
}

fn handle_clear_command(path: &Path) -> Result<()> {
  if JiraConfig::clear(path)? {
    print_success(&format!("Removed {}", path.display()));
  } else {
    print_info(&format!("No config file at {}", path.display()));
  }
  Ok(())
}

fn handle_test_command(output: OutputFormat) -> Result<()> {
  let (rt, jira_client) = clients::create_jira_runtime_and_client()?;
  let user = rt
    .block_on(jira_client.myself())
    .with_context(|| format!("Could not connect to {}", jira_client.base_url()))?;

  match output {
    OutputFormat::Json => print_json(&user)?,
    OutputFormat::Plain => println!("{}", user.account_id),
    OutputFormat::Table => print_success(&format!(
      "Connected to {} as {}",
      jira_client.base_url(),
      user.display_name
    )),
  }

  Ok(())
}
