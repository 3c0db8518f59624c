//! # Client Creation
//!
//! Builds an authenticated Jira client from the resolved configuration
//! (config file overlaid with `JIRA_*` environment variables).

use anyhow::{Context, Result};
use jtk_core::JiraConfig;
use jtk_jira::{JiraClient, create_jira_client};
use tokio::runtime::Runtime;
use tracing::debug;

/// Creates an authenticated Jira client from the resolved configuration
pub fn create_jira_client_from_config() -> Result<JiraClient> {
  let config = JiraConfig::load_default()?.resolve();
  let credentials = config.credentials()?;
  debug!(url = %credentials.url, email = %credentials.email, "Using Jira credentials");

  Ok(create_jira_client(
    &credentials.url,
    &credentials.email,
    &credentials.api_token,
  ))
}

/// Creates a tokio runtime and an authenticated Jira client
///
/// Configuration is checked before the runtime is started so a missing
/// setting fails fast.
pub fn create_jira_runtime_and_client() -> Result<(Runtime, JiraClient)> {
  let client = create_jira_client_from_config()?;
  let rt = Runtime::new().context("Failed to create async runtime")?;
  Ok((rt, client))
}
