//! # Jira API Errors
//!
//! Maps HTTP failure statuses and Jira's error body onto a typed error.

use std::collections::BTreeMap;

use jtk_core::text::truncate_string;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Longest raw response body quoted in an error message
const MAX_RAW_BODY_LEN: usize = 200;

/// Error body Jira returns alongside 4xx/5xx statuses
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
  #[serde(default)]
  pub error_messages: Vec<String>,
  #[serde(default)]
  pub errors: BTreeMap<String, String>,
}

impl ErrorResponse {
  /// All messages joined with `; `, field errors as `field: message`
  pub fn summary(&self) -> String {
    self
      .error_messages
      .iter()
      .cloned()
      .chain(self.errors.iter().map(|(field, message)| format!("{field}: {message}")))
      .collect::<Vec<_>>()
      .join("; ")
  }
}

/// A failed Jira API call
#[derive(Debug, Error)]
pub enum JiraApiError {
  #[error("Authentication failed. Please check your Jira credentials.{}", detail(.0))]
  Unauthorized(String),
  #[error("Permission denied.{}", detail(.0))]
  Forbidden(String),
  #[error("{resource} not found.{}", detail(.message))]
  NotFound { resource: String, message: String },
  #[error("Bad request.{}", detail(.0))]
  BadRequest(String),
  #[error("Rate limited by Jira. Try again later.")]
  RateLimited,
  #[error("Jira server error: HTTP {status}.{}", detail(.message))]
  Server { status: u16, message: String },
  #[error("Unexpected error: HTTP {status}.{}", detail(.message))]
  Other { status: u16, message: String },
}

fn detail(message: &str) -> String {
  if message.is_empty() {
    String::new()
  } else {
    format!(" {message}")
  }
}

impl JiraApiError {
  /// Build the error for a non-success `status`.
  ///
  /// `resource` names what was requested (e.g. `Issue PROJ-1`) and is only
  /// used for 404s.
  pub fn from_response(status: StatusCode, resource: &str, body: &str) -> Self {
    let message = match serde_json::from_str::<ErrorResponse>(body) {
      Ok(parsed) => parsed.summary(),
      Err(_) => truncate_string(body.trim(), MAX_RAW_BODY_LEN),
    };

    match status {
      StatusCode::UNAUTHORIZED => Self::Unauthorized(message),
      StatusCode::FORBIDDEN => Self::Forbidden(message),
      StatusCode::NOT_FOUND => Self::NotFound {
        resource: resource.to_string(),
        message,
      },
      StatusCode::BAD_REQUEST => Self::BadRequest(message),
      StatusCode::TOO_MANY_REQUESTS => Self::RateLimited,
      status if status.is_server_error() => Self::Server {
        status: status.as_u16(),
        message,
      },
      status => Self::Other {
        status: status.as_u16(),
        message,
      },
    }
  }

  pub const fn is_not_found(&self) -> bool {
    matches!(self, Self::NotFound { .. })
  }

  pub const fn is_auth_error(&self) -> bool {
    matches!(self, Self::Unauthorized(_) | Self::Forbidden(_))
  }
}
