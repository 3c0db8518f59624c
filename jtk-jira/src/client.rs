use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder, Response};
use tracing::{debug, trace};

use crate::consts::{API_PATH, USER_AGENT as USER_AGENT_VALUE};
use crate::error::JiraApiError;
use crate::models::{JiraAuth, JiraUser};

/// Represents a Jira API client
pub struct JiraClient {
  pub(crate) client: Client,
  pub(crate) base_url: String,
  pub(crate) auth: JiraAuth,
}

impl JiraClient {
  /// Create a new Jira client; trailing slashes on `base_url` are dropped
  pub fn new(base_url: &str, auth: JiraAuth) -> Self {
    let client = Client::new();
    Self {
      client,
      base_url: base_url.trim_end_matches('/').to_string(),
      auth,
    }
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Web URL of an issue, as shown in the Jira UI
  pub fn browse_url(&self, issue_key: &str) -> String {
    format!("{}/browse/{}", self.base_url, issue_key)
  }

  /// Authenticated request against the REST v3 API
  pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
    let url = format!("{}{}{}", self.base_url, API_PATH, path);
    debug!("{} {}", method, url);

    self
      .client
      .request(method, &url)
      .basic_auth(&self.auth.username, Some(&self.auth.api_token))
      .header(ACCEPT, "application/json")
      .header(USER_AGENT, USER_AGENT_VALUE)
  }

  /// Send a request, turning transport failures into `Failed to <action>`
  pub(crate) async fn send(&self, request: RequestBuilder, action: &str) -> Result<Response> {
    let response = request
      .send()
      .await
      .with_context(|| format!("Failed to {action}"))?;
    trace!("Jira responded with HTTP {}", response.status());
    Ok(response)
  }

  /// Fetch the user the credentials belong to
  pub async fn myself(&self) -> Result<JiraUser> {
    let response = self
      .send(self.request(Method::GET, "/myself"), "connect to Jira")
      .await?;

    if !response.status().is_success() {
      return Err(api_error(response, "Current user").await.into());
    }

    response
      .json::<JiraUser>()
      .await
      .context("Failed to parse Jira user")
  }

  /// Test the Jira connection by fetching the current user
  pub async fn test_connection(&self) -> Result<bool> {
    let response = self
      .send(self.request(Method::GET, "/myself"), "connect to Jira")
      .await?;

    Ok(response.status().is_success())
  }
}

/// Drain a failed response into a typed error
pub(crate) async fn api_error(response: Response, resource: &str) -> JiraApiError {
  let status = response.status();
  let body = response.text().await.unwrap_or_default();
  JiraApiError::from_response(status, resource, &body)
}

/// Reject empty issue keys before any request is made
pub(crate) fn require_issue_key(issue_key: &str) -> Result<&str> {
  let key = issue_key.trim();
  if key.is_empty() {
    anyhow::bail!("Issue key is required");
  }
  Ok(key)
}

/// Create a Jira client from credentials
pub fn create_jira_client(base_url: &str, username: &str, api_token: &str) -> JiraClient {
  let auth = JiraAuth {
    username: username.to_string(),
    api_token: api_token.to_string(),
  };

  JiraClient::new(base_url, auth)
}
