//! # Jira Issue Endpoints
//!
//! Jira API endpoint implementations for issue operations,
//! including fetching, searching, creating, updating, assigning and deleting
//! Jira issues.

use anyhow::{Context, Result};
use reqwest::{Method, StatusCode};
use tracing::debug;

use crate::client::{JiraClient, api_error, require_issue_key};
use crate::models::{
  AssignRequest, CreateIssue, CreatedIssue, IssueRequest, JiraIssue, JiraSearchPage, UpdateIssue,
};

/// Fields fetched for each search result
const SEARCH_FIELDS: &str = "summary,status,assignee,issuetype,priority,updated";

/// Largest page requested from the search endpoint
const SEARCH_PAGE_SIZE: usize = 100;

impl JiraClient {
  /// Get a Jira issue by key
  pub async fn get_issue(&self, issue_key: &str) -> Result<JiraIssue> {
    let key = require_issue_key(issue_key)?;
    let request = self.request(Method::GET, &format!("/issue/{key}"));
    let response = self.send(request, "fetch Jira issue").await?;

    match response.status() {
      StatusCode::OK => response
        .json::<JiraIssue>()
        .await
        .context("Failed to parse Jira issue"),
      _ => Err(api_error(response, &format!("Issue {key}")).await.into()),
    }
  }

  /// Create an issue; the description is converted from Markdown or wiki markup
  pub async fn create_issue(&self, issue: &CreateIssue) -> Result<CreatedIssue> {
    if issue.project.trim().is_empty() {
      anyhow::bail!("Project key is required");
    }
    if issue.summary.trim().is_empty() {
      anyhow::bail!("Summary is required");
    }

    let request = self
      .request(Method::POST, "/issue")
      .json(&IssueRequest::from(issue));
    let response = self.send(request, "create Jira issue").await?;

    match response.status() {
      StatusCode::CREATED | StatusCode::OK => response
        .json::<CreatedIssue>()
        .await
        .context("Failed to parse created issue"),
      _ => Err(api_error(response, &format!("Project {}", issue.project)).await.into()),
    }
  }

  /// Run a JQL search, following pages until `max_results` issues are collected
  pub async fn search_issues(&self, jql: &str, max_results: usize) -> Result<Vec<JiraIssue>> {
    let jql = jql.trim();
    if jql.is_empty() {
      anyhow::bail!("JQL query is required");
    }

    let mut issues = Vec::new();
    let mut page_token: Option<String> = None;

    while issues.len() < max_results {
      let page_size = (max_results - issues.len()).min(SEARCH_PAGE_SIZE).to_string();
      let mut request = self.request(Method::GET, "/search/jql").query(&[
        ("jql", jql),
        ("fields", SEARCH_FIELDS),
        ("maxResults", page_size.as_str()),
      ]);
      if let Some(token) = &page_token {
        request = request.query(&[("nextPageToken", token)]);
      }

      let response = self.send(request, "search Jira issues").await?;
      let page = match response.status() {
        StatusCode::OK => response
          .json::<JiraSearchPage>()
          .await
          .context("Failed to parse Jira search results")?,
        _ => return Err(api_error(response, "Search").await.into()),
      };

      debug!("Search page returned {} issues", page.issues.len());
      let exhausted = page.issues.is_empty() || page.is_last;
      issues.extend(page.issues);

      match page.next_page_token {
        Some(token) if !exhausted => page_token = Some(token),
        _ => break,
      }
    }

    issues.truncate(max_results);
    Ok(issues)
  }

  /// Update the summary, description or other fields of an issue
  pub async fn update_issue(&self, issue_key: &str, update: &UpdateIssue) -> Result<()> {
    let key = require_issue_key(issue_key)?;
    if update.is_empty() {
      anyhow::bail!("Nothing to update for {key}");
    }

    let request = self
      .request(Method::PUT, &format!("/issue/{key}"))
      .json(&IssueRequest::from(update));
    let response = self.send(request, "update Jira issue").await?;

    match response.status() {
      StatusCode::NO_CONTENT | StatusCode::OK => Ok(()),
      _ => Err(api_error(response, &format!("Issue {key}")).await.into()),
    }
  }

  /// Assign an issue to an account; `None` unassigns it
  pub async fn assign_issue(&self, issue_key: &str, account_id: Option<&str>) -> Result<()> {
    let key = require_issue_key(issue_key)?;
    let payload = AssignRequest {
      account_id: account_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string),
    };

    let request = self
      .request(Method::PUT, &format!("/issue/{key}/assignee"))
      .json(&payload);
    let response = self.send(request, "assign Jira issue").await?;

    match response.status() {
      StatusCode::NO_CONTENT | StatusCode::OK => Ok(()),
      _ => Err(api_error(response, &format!("Issue {key}")).await.into()),
    }
  }

  /// Permanently delete an issue
  pub async fn delete_issue(&self, issue_key: &str) -> Result<()> {
    let key = require_issue_key(issue_key)?;
    let request = self.request(Method::DELETE, &format!("/issue/{key}"));
    let response = self.send(request, "delete Jira issue").await?;

    match response.status() {
      StatusCode::NO_CONTENT | StatusCode::OK => Ok(()),
      _ => Err(api_error(response, &format!("Issue {key}")).await.into()),
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::{Map, json};
  use wiremock::matchers::{basic_auth, body_json, method, path, query_param, query_param_is_missing};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use crate::client::JiraClient;
  use crate::models::{CreateIssue, JiraAuth, UpdateIssue};

  fn test_client(base_url: &str) -> JiraClient {
    let auth = JiraAuth {
      username: "test_user".to_string(),
      api_token: "test_token".to_string(),
    };
    JiraClient::new(base_url, auth)
  }

  #[tokio::test]
  async fn test_get_issue() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("GET"))
      .and(path("/rest/api/3/issue/TEST-123"))
      .and(basic_auth("test_user", "test_token"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
          "id": "10000",
          "key": "TEST-123",
          "fields": {
              "summary": "Test issue",
              "description": {
                  "type": "doc",
                  "version": 1,
                  "content": [{"type": "paragraph", "content": [{"type": "text", "text": "This is a test issue"}]}]
              },
              "status": {
                  "id": "10001",
                  "name": "In Progress",
                  "statusCategory": {
                      "id": 4,
                      "key": "indeterminate",
                      "name": "In Progress"
                  }
              }
          }
      })))
      .mount(&mock_server)
      .await;

    let issue = client.get_issue("TEST-123").await?;
    assert_eq!(issue.key, "TEST-123");
    assert_eq!(issue.fields.summary, "Test issue");
    assert_eq!(issue.fields.status.as_ref().map(|s| s.name.as_str()), Some("In Progress"));
    assert_eq!(
      issue.fields.description.as_ref().map(|d| d.to_plain_text()),
      Some("This is a test issue\n")
    );

    Ok(())
  }

  #[tokio::test]
  async fn test_get_issue_not_found() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("GET"))
      .and(path("/rest/api/3/issue/NONEXISTENT-123"))
      .and(basic_auth("test_user", "test_token"))
      .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
          "errorMessages": ["Issue does not exist or you do not have permission to see it."],
          "errors": {}
      })))
      .mount(&mock_server)
      .await;

    let result = client.get_issue("NONEXISTENT-123").await;
    assert!(result.is_err());
    let message = result.unwrap_err().to_string();
    assert!(message.contains("Issue NONEXISTENT-123 not found"));
    assert!(message.contains("Issue does not exist"));

    Ok(())
  }

  #[tokio::test]
  async fn test_get_issue_unauthorized() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("GET"))
      .and(path("/rest/api/3/issue/TEST-123"))
      .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
          "errorMessages": ["Authentication failed"],
          "errors": {}
      })))
      .mount(&mock_server)
      .await;

    let result = client.get_issue("TEST-123").await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Authentication failed"));

    Ok(())
  }

  #[tokio::test]
  async fn test_get_issue_requires_key() {
    let client = test_client("http://127.0.0.1:9");
    let result = client.get_issue("").await;
    assert!(result.unwrap_err().to_string().contains("Issue key is required"));
  }

  #[tokio::test]
  async fn test_create_issue_converts_description() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("POST"))
      .and(path("/rest/api/3/issue"))
      .and(basic_auth("test_user", "test_token"))
      .and(body_json(serde_json::json!({
          "fields": {
              "project": {"key": "PROJ"},
              "summary": "Broken build",
              "issuetype": {"name": "Bug"},
              "description": {
                  "type": "doc",
                  "version": 1,
                  "content": [{
                      "type": "paragraph",
                      "content": [
                          {"type": "text", "text": "Fails on "},
                          {"type": "text", "text": "main", "marks": [{"type": "code"}]}
                      ]
                  }]
              }
          }
      })))
      .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
          "id": "10001",
          "key": "PROJ-42",
          "self": "https://test.atlassian.net/rest/api/3/issue/10001"
      })))
      .mount(&mock_server)
      .await;

    let created = client
      .create_issue(&CreateIssue {
        project: "PROJ".to_string(),
        summary: "Broken build".to_string(),
        issue_type: "Bug".to_string(),
        description: Some("Fails on `main`".to_string()),
        fields: Map::new(),
      })
      .await?;
    assert_eq!(created.key, "PROJ-42");

    Ok(())
  }

  #[tokio::test]
  async fn test_create_issue_field_errors() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("POST"))
      .and(path("/rest/api/3/issue"))
      .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
          "errorMessages": [],
          "errors": {"issuetype": "Specify a valid issue type"}
      })))
      .mount(&mock_server)
      .await;

    let result = client
      .create_issue(&CreateIssue {
        project: "PROJ".to_string(),
        summary: "Broken build".to_string(),
        issue_type: "Nope".to_string(),
        description: None,
        fields: Map::new(),
      })
      .await;
    assert_eq!(
      result.unwrap_err().to_string(),
      "Bad request. issuetype: Specify a valid issue type"
    );

    Ok(())
  }

  #[tokio::test]
  async fn test_update_issue() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("PUT"))
      .and(path("/rest/api/3/issue/TEST-123"))
      .and(basic_auth("test_user", "test_token"))
      .and(body_json(serde_json::json!({"fields": {"summary": "Renamed"}})))
      .respond_with(ResponseTemplate::new(204))
      .mount(&mock_server)
      .await;

    let update = UpdateIssue {
      summary: Some("Renamed".to_string()),
      ..UpdateIssue::default()
    };
    client.update_issue("TEST-123", &update).await?;

    Ok(())
  }

  #[tokio::test]
  async fn test_update_issue_with_nothing_to_change() {
    let client = test_client("http://127.0.0.1:9");
    let result = client.update_issue("TEST-123", &UpdateIssue::default()).await;
    assert!(result.unwrap_err().to_string().contains("Nothing to update"));
  }

  #[tokio::test]
  async fn test_update_issue_with_textarea_field() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("GET"))
      .and(path("/rest/api/3/field"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([
        {"id": "customfield_10050", "name": "Acceptance Criteria", "custom": true,
         "schema": {"type": "string", "custom": "com.atlassian.jira.plugin.system.customfieldtypes:textarea"}}
      ])))
      .mount(&mock_server)
      .await;

    Mock::given(method("PUT"))
      .and(path("/rest/api/3/issue/TEST-123"))
      .and(body_json(json!({
        "fields": {
          "customfield_10050": {
            "type": "doc",
            "version": 1,
            "content": [{"type": "heading", "attrs": {"level": 2}, "content": [{"type": "text", "text": "Criteria"}]}]
          }
        }
      })))
      .respond_with(ResponseTemplate::new(204))
      .expect(1)
      .mount(&mock_server)
      .await;

    let pairs = vec![("Acceptance Criteria".to_string(), "h2. Criteria".to_string())];
    let update = UpdateIssue {
      fields: client.resolve_fields(&pairs).await?,
      ..UpdateIssue::default()
    };
    client.update_issue("TEST-123", &update).await?;

    Ok(())
  }

  #[tokio::test]
  async fn test_search_issues_follows_pages() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("GET"))
      .and(path("/rest/api/3/search/jql"))
      .and(query_param("jql", "project = PROJ"))
      .and(query_param("maxResults", "3"))
      .and(query_param_is_missing("nextPageToken"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "issues": [
          {"id": "1", "key": "PROJ-1", "fields": {"summary": "One"}},
          {"id": "2", "key": "PROJ-2", "fields": {"summary": "Two"}}
        ],
        "nextPageToken": "page-2",
        "isLast": false
      })))
      .mount(&mock_server)
      .await;

    Mock::given(method("GET"))
      .and(path("/rest/api/3/search/jql"))
      .and(query_param("nextPageToken", "page-2"))
      .and(query_param("maxResults", "1"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "issues": [{"id": "3", "key": "PROJ-3", "fields": {"summary": "Three"}}],
        "nextPageToken": "page-3",
        "isLast": false
      })))
      .mount(&mock_server)
      .await;

    let issues = client.search_issues("project = PROJ", 3).await?;
    let keys: Vec<_> = issues.iter().map(|issue| issue.key.as_str()).collect();
    assert_eq!(keys, ["PROJ-1", "PROJ-2", "PROJ-3"]);

    Ok(())
  }

  #[tokio::test]
  async fn test_search_issues_stops_on_last_page() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("GET"))
      .and(path("/rest/api/3/search/jql"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "issues": [{"id": "1", "key": "PROJ-1", "fields": {"summary": "One"}}],
        "isLast": true
      })))
      .expect(1)
      .mount(&mock_server)
      .await;

    let issues = client.search_issues("project = PROJ", 50).await?;
    assert_eq!(issues.len(), 1);

    Ok(())
  }

  #[tokio::test]
  async fn test_search_issues_bad_jql() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("GET"))
      .and(path("/rest/api/3/search/jql"))
      .respond_with(ResponseTemplate::new(400).set_body_json(json!({
        "errorMessages": ["Error in the JQL Query: Expecting a field name"],
        "errors": {}
      })))
      .mount(&mock_server)
      .await;

    let error = client.search_issues("= nope", 10).await.unwrap_err();
    assert!(error.to_string().contains("Expecting a field name"));
    assert!(client.search_issues("  ", 10).await.is_err());

    Ok(())
  }

  #[tokio::test]
  async fn test_assign_and_unassign() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("PUT"))
      .and(path("/rest/api/3/issue/TEST-123/assignee"))
      .and(body_json(json!({"accountId": "5b10ac8d"})))
      .respond_with(ResponseTemplate::new(204))
      .expect(1)
      .mount(&mock_server)
      .await;

    Mock::given(method("PUT"))
      .and(path("/rest/api/3/issue/TEST-123/assignee"))
      .and(body_json(json!({"accountId": null})))
      .respond_with(ResponseTemplate::new(204))
      .expect(1)
      .mount(&mock_server)
      .await;

    client.assign_issue("TEST-123", Some("5b10ac8d")).await?;
    client.assign_issue("TEST-123", None).await?;

    Ok(())
  }

  #[tokio::test]
  async fn test_delete_issue() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("DELETE"))
      .and(path("/rest/api/3/issue/TEST-123"))
      .respond_with(ResponseTemplate::new(204))
      .expect(1)
      .mount(&mock_server)
      .await;

    Mock::given(method("DELETE"))
      .and(path("/rest/api/3/issue/TEST-404"))
      .respond_with(ResponseTemplate::new(404))
      .mount(&mock_server)
      .await;

    client.delete_issue("TEST-123").await?;
    let error = client.delete_issue("TEST-404").await.unwrap_err();
    assert!(error.to_string().contains("Issue TEST-404 not found"));

    Ok(())
  }
}
