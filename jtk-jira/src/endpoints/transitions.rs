//! # Jira Transition Endpoints
//!
//! Workflow transitions available on an issue, and moving an issue through one.

use anyhow::{Context, Result};
use reqwest::{Method, StatusCode};

use crate::client::{JiraClient, api_error, require_issue_key};
use crate::models::{JiraTransition, JiraTransitions, TransitionId, TransitionRequest};

impl JiraClient {
  /// Get available transitions for an issue
  pub async fn get_transitions(&self, issue_key: &str) -> Result<Vec<JiraTransition>> {
    let key = require_issue_key(issue_key)?;
    let request = self.request(Method::GET, &format!("/issue/{key}/transitions"));
    let response = self.send(request, "fetch Jira transitions").await?;

    match response.status() {
      StatusCode::OK => {
        let transitions = response
          .json::<JiraTransitions>()
          .await
          .context("Failed to parse Jira transitions")?;
        Ok(transitions.transitions)
      }
      _ => Err(api_error(response, &format!("Issue {key}")).await.into()),
    }
  }

  /// Transition an issue to a new status
  pub async fn transition_issue(&self, issue_key: &str, transition_id: &str) -> Result<()> {
    let key = require_issue_key(issue_key)?;
    let payload = TransitionRequest {
      transition: TransitionId {
        id: transition_id.to_string(),
      },
    };

    let request = self
      .request(Method::POST, &format!("/issue/{key}/transitions"))
      .json(&payload);
    let response = self.send(request, "transition Jira issue").await?;

    match response.status() {
      StatusCode::NO_CONTENT | StatusCode::OK => Ok(()),
      StatusCode::BAD_REQUEST => Err(
        anyhow::Error::new(api_error(response, &format!("Issue {key}")).await)
          .context("Invalid transition. The transition may not be available for the current status."),
      ),
      _ => Err(api_error(response, &format!("Issue {key}")).await.into()),
    }
  }
}

/// Find a transition by id, or by name ignoring case
pub fn find_transition<'a>(transitions: &'a [JiraTransition], name_or_id: &str) -> Option<&'a JiraTransition> {
  let wanted = name_or_id.trim();
  transitions
    .iter()
    .find(|transition| transition.id == wanted)
    .or_else(|| {
      transitions
        .iter()
        .find(|transition| transition.name.eq_ignore_ascii_case(wanted))
    })
}

#[cfg(test)]
mod tests {
  use wiremock::matchers::{basic_auth, body_json, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::find_transition;
  use crate::client::JiraClient;
  use crate::models::{JiraAuth, JiraTransition};

  fn test_client(base_url: &str) -> JiraClient {
    let auth = JiraAuth {
      username: "test_user".to_string(),
      api_token: "test_token".to_string(),
    };
    JiraClient::new(base_url, auth)
  }

  #[tokio::test]
  async fn test_get_transitions() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("GET"))
      .and(path("/rest/api/3/issue/TEST-123/transitions"))
      .and(basic_auth("test_user", "test_token"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
          "transitions": [
              {"id": "11", "name": "To Do"},
              {"id": "21", "name": "In Progress"},
              {"id": "31", "name": "Done"}
          ]
      })))
      .mount(&mock_server)
      .await;

    let transitions = client.get_transitions("TEST-123").await?;
    assert_eq!(transitions.len(), 3);
    assert_eq!(transitions[0].id, "11");
    assert_eq!(transitions[0].name, "To Do");
    assert_eq!(transitions[2].id, "31");
    assert_eq!(transitions[2].name, "Done");

    Ok(())
  }

  #[tokio::test]
  async fn test_transition_issue() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("POST"))
      .and(path("/rest/api/3/issue/TEST-123/transitions"))
      .and(basic_auth("test_user", "test_token"))
      .and(body_json(serde_json::json!({
          "transition": {
              "id": "21"
          }
      })))
      .respond_with(ResponseTemplate::new(204))
      .mount(&mock_server)
      .await;

    let result = client.transition_issue("TEST-123", "21").await;
    assert!(result.is_ok());

    Ok(())
  }

  #[tokio::test]
  async fn test_transition_issue_invalid_transition() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("POST"))
      .and(path("/rest/api/3/issue/TEST-123/transitions"))
      .and(basic_auth("test_user", "test_token"))
      .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
          "errorMessages": ["The requested transition is not available for the current status."],
          "errors": {}
      })))
      .mount(&mock_server)
      .await;

    let error = client.transition_issue("TEST-123", "invalid").await.unwrap_err();
    assert!(error.to_string().contains("Invalid transition"));
    assert!(format!("{error:#}").contains("not available for the current status"));

    Ok(())
  }

  #[tokio::test]
  async fn test_transitions_not_found() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("GET"))
      .and(path("/rest/api/3/issue/NONEXISTENT-123/transitions"))
      .and(basic_auth("test_user", "test_token"))
      .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
          "errorMessages": ["Issue does not exist or you do not have permission to see it."],
          "errors": {}
      })))
      .mount(&mock_server)
      .await;

    let result = client.get_transitions("NONEXISTENT-123").await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("not found"));

    Ok(())
  }

  #[tokio::test]
  async fn test_transitions_unauthorized() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("GET"))
      .and(path("/rest/api/3/issue/TEST-123/transitions"))
      .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
          "errorMessages": ["Authentication failed"],
          "errors": {}
      })))
      .mount(&mock_server)
      .await;

    let result = client.get_transitions("TEST-123").await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Authentication failed"));

    Ok(())
  }

  #[test]
  fn test_find_transition() {
    let transitions = vec![
      JiraTransition {
        id: "11".to_string(),
        name: "To Do".to_string(),
        to: None,
      },
      JiraTransition {
        id: "21".to_string(),
        name: "In Progress".to_string(),
        to: None,
      },
    ];

    assert_eq!(find_transition(&transitions, "21").map(|t| t.name.as_str()), Some("In Progress"));
    assert_eq!(find_transition(&transitions, "in progress").map(|t| t.id.as_str()), Some("21"));
    assert_eq!(find_transition(&transitions, " to do ").map(|t| t.id.as_str()), Some("11"));
    assert!(find_transition(&transitions, "Done").is_none());
  }
}
