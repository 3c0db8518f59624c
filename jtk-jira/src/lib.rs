//! # Jira API Client
//!
//! Jira Cloud REST v3 integration for issues, comments, fields and transitions,
//! together with the rich text conversion (Markdown and wiki markup to the
//! Atlassian Document Format) every write path goes through.

pub mod adf;
mod client;
mod consts;
mod endpoints;
pub mod error;
pub mod models;

// Re-export the client
pub use client::{JiraClient, create_jira_client};
pub use endpoints::fields::{TEXTAREA_FIELD_TYPE, find_field, format_field_value};
pub use endpoints::transitions::find_transition;
pub use error::JiraApiError;
// Re-export models
pub use models::{
  CreateIssue, CreatedIssue, Description, JiraAuth, JiraComment, JiraComments, JiraField, JiraFieldSchema, JiraIssue,
  JiraIssueFields, JiraIssueStatus, JiraTransition, JiraUser, UpdateIssue,
};
