//! # Jira Comment Endpoints
//!
//! Listing, adding and deleting issue comments. Comment bodies are authored
//! as Markdown or wiki markup and sent as ADF.

use anyhow::{Context, Result};
use reqwest::{Method, StatusCode};

use crate::adf::text_to_adf;
use crate::client::{JiraClient, api_error, require_issue_key};
use crate::models::{CommentRequest, JiraComment, JiraComments};

impl JiraClient {
  /// Get comments on an issue; `max_results` of 0 uses the server default
  pub async fn get_comments(&self, issue_key: &str, max_results: u32) -> Result<JiraComments> {
    let key = require_issue_key(issue_key)?;
    let mut request = self.request(Method::GET, &format!("/issue/{key}/comment"));
    if max_results > 0 {
      request = request.query(&[("maxResults", max_results)]);
    }
    let response = self.send(request, "fetch Jira comments").await?;

    match response.status() {
      StatusCode::OK => response
        .json::<JiraComments>()
        .await
        .context("Failed to parse Jira comments"),
      _ => Err(api_error(response, &format!("Issue {key}")).await.into()),
    }
  }

  /// Add a comment to an issue
  pub async fn add_comment(&self, issue_key: &str, body: &str) -> Result<JiraComment> {
    let key = require_issue_key(issue_key)?;
    let Some(document) = text_to_adf(body) else {
      anyhow::bail!("Comment body is required");
    };

    let request = self
      .request(Method::POST, &format!("/issue/{key}/comment"))
      .json(&CommentRequest { body: document });
    let response = self.send(request, "add Jira comment").await?;

    match response.status() {
      StatusCode::CREATED | StatusCode::OK => response
        .json::<JiraComment>()
        .await
        .context("Failed to parse Jira comment"),
      _ => Err(api_error(response, &format!("Issue {key}")).await.into()),
    }
  }

  /// Delete a comment from an issue
  pub async fn delete_comment(&self, issue_key: &str, comment_id: &str) -> Result<()> {
    let key = require_issue_key(issue_key)?;
    let comment_id = comment_id.trim();
    if comment_id.is_empty() {
      anyhow::bail!("Comment ID is required");
    }

    let request = self.request(Method::DELETE, &format!("/issue/{key}/comment/{comment_id}"));
    let response = self.send(request, "delete Jira comment").await?;

    match response.status() {
      StatusCode::NO_CONTENT | StatusCode::OK => Ok(()),
      _ => Err(
        api_error(response, &format!("Comment {comment_id} on {key}"))
          .await
          .into(),
      ),
    }
  }
}
