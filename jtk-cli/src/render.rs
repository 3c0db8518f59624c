//! # Output Rendering
//!
//! Table rows, plain-text lines and JSON output for the data the Jira
//! commands print.

use anyhow::{Context, Result};
use jtk_core::text::preview;
use jtk_jira::{JiraComment, JiraField, JiraIssue, JiraTransition};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Characters of comment body shown in a table cell
pub const COMMENT_PREVIEW_LEN: usize = 50;

/// Characters of summary shown in a search result row
pub const SUMMARY_PREVIEW_LEN: usize = 60;

const NONE: &str = "-";

/// Pretty-printed JSON for `value`
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
  serde_json::to_string_pretty(value).context("Failed to serialize output as JSON")
}

/// Print `value` as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
  println!("{}", to_json(value)?);
  Ok(())
}

/// Render rows with the rounded table style used across jtk
pub fn table<T: Tabled>(rows: impl IntoIterator<Item = T>) -> String {
  let mut table = Table::new(rows);
  table.with(Style::rounded());
  table.to_string()
}

#[derive(Tabled)]
pub struct FieldRow {
  #[tabled(rename = "Field")]
  pub field: &'static str,
  #[tabled(rename = "Value")]
  pub value: String,
}

#[derive(Tabled)]
pub struct CommentRow {
  #[tabled(rename = "ID")]
  pub id: String,
  #[tabled(rename = "Author")]
  pub author: String,
  #[tabled(rename = "Created")]
  pub created: String,
  #[tabled(rename = "Body")]
  pub body: String,
}

impl From<&JiraComment> for CommentRow {
  fn from(comment: &JiraComment) -> Self {
    Self {
      id: comment.id.clone(),
      author: comment_author(comment).to_string(),
      created: comment.created.clone().unwrap_or_else(|| NONE.to_string()),
      body: preview(comment.body_text(), COMMENT_PREVIEW_LEN),
    }
  }
}

#[derive(Tabled)]
pub struct TransitionRow {
  #[tabled(rename = "ID")]
  pub id: String,
  #[tabled(rename = "Name")]
  pub name: String,
  #[tabled(rename = "To Status")]
  pub to: String,
}

impl From<&JiraTransition> for TransitionRow {
  fn from(transition: &JiraTransition) -> Self {
    Self {
      id: transition.id.clone(),
      name: transition.name.clone(),
      to: transition_target(transition).to_string(),
    }
  }
}

/// One search result
#[derive(Tabled)]
pub struct IssueRow {
  #[tabled(rename = "Key")]
  pub key: String,
  #[tabled(rename = "Summary")]
  pub summary: String,
  #[tabled(rename = "Status")]
  pub status: String,
  #[tabled(rename = "Assignee")]
  pub assignee: String,
  #[tabled(rename = "Type")]
  pub issue_type: String,
}

impl From<&JiraIssue> for IssueRow {
  fn from(issue: &JiraIssue) -> Self {
    let fields = &issue.fields;
    Self {
      key: issue.key.clone(),
      summary: preview(&fields.summary, SUMMARY_PREVIEW_LEN),
      status: issue_status(issue).to_string(),
      assignee: fields
        .assignee
        .as_ref()
        .map_or(NONE, |user| user.display_name.as_str())
        .to_string(),
      issue_type: fields
        .issue_type
        .as_ref()
        .map_or(NONE, |kind| kind.name.as_str())
        .to_string(),
    }
  }
}

/// A field definition
#[derive(Tabled)]
pub struct FieldDefinitionRow {
  #[tabled(rename = "ID")]
  pub id: String,
  #[tabled(rename = "Name")]
  pub name: String,
  #[tabled(rename = "Type")]
  pub kind: String,
  #[tabled(rename = "Custom")]
  pub custom: &'static str,
}

impl From<&JiraField> for FieldDefinitionRow {
  fn from(field: &JiraField) -> Self {
    Self {
      id: field.id.clone(),
      name: field.name.clone(),
      kind: field_type(field).to_string(),
      custom: if field.custom { "yes" } else { "no" },
    }
  }
}

fn issue_status(issue: &JiraIssue) -> &str {
  issue.fields.status.as_ref().map_or(NONE, |status| status.name.as_str())
}

fn field_type(field: &JiraField) -> &str {
  match field.schema_type() {
    "" => NONE,
    kind => kind,
  }
}

fn comment_author(comment: &JiraComment) -> &str {
  comment
    .author
    .as_ref()
    .map_or("Unknown", |author| author.display_name.as_str())
}

fn transition_target(transition: &JiraTransition) -> &str {
  transition.to.as_ref().map_or(NONE, |status| status.name.as_str())
}

/// Key/value rows describing an issue, description excluded
pub fn issue_fields(issue: &JiraIssue) -> Vec<FieldRow> {
  let fields = &issue.fields;
  let or_none = |value: Option<&str>| value.unwrap_or(NONE).to_string();

  vec![
    FieldRow {
      field: "Summary",
      value: fields.summary.clone(),
    },
    FieldRow {
      field: "Status",
      value: or_none(fields.status.as_ref().map(|status| status.name.as_str())),
    },
    FieldRow {
      field: "Type",
      value: or_none(fields.issue_type.as_ref().map(|kind| kind.name.as_str())),
    },
    FieldRow {
      field: "Priority",
      value: or_none(fields.priority.as_ref().map(|priority| priority.name.as_str())),
    },
    FieldRow {
      field: "Assignee",
      value: fields
        .assignee
        .as_ref()
        .map_or_else(|| "Unassigned".to_string(), |user| user.display_name.clone()),
    },
    FieldRow {
      field: "Reporter",
      value: or_none(fields.reporter.as_ref().map(|user| user.display_name.as_str())),
    },
    FieldRow {
      field: "Project",
      value: or_none(fields.project.as_ref().map(|project| project.key.as_str())),
    },
    FieldRow {
      field: "Labels",
      value: if fields.labels.is_empty() {
        NONE.to_string()
      } else {
        fields.labels.join(", ")
      },
    },
    FieldRow {
      field: "Created",
      value: or_none(fields.created.as_deref()),
    },
    FieldRow {
      field: "Updated",
      value: or_none(fields.updated.as_deref()),
    },
  ]
}

/// `KEY<TAB>STATUS<TAB>SUMMARY`, then the description as plain text
pub fn issue_plain(issue: &JiraIssue) -> String {
  let mut out = format!("{}\t{}\t{}\n", issue.key, issue_status(issue), issue.fields.summary);

  let description = issue.fields.description.as_ref().map_or("", |d| d.to_plain_text());
  if !description.is_empty() {
    out.push_str(description);
    if !description.ends_with('\n') {
      out.push('\n');
    }
  }
  out
}

/// One `KEY<TAB>STATUS<TAB>SUMMARY` line per issue
pub fn issues_plain(issues: &[JiraIssue]) -> String {
  issues
    .iter()
    .map(|issue| format!("{}\t{}\t{}\n", issue.key, issue_status(issue), issue.fields.summary))
    .collect()
}

/// One `ID<TAB>NAME<TAB>TYPE<TAB>CUSTOM` line per field
pub fn fields_plain(fields: &[JiraField]) -> String {
  fields
    .iter()
    .map(|field| {
      let row = FieldDefinitionRow::from(field);
      format!("{}\t{}\t{}\t{}\n", row.id, row.name, row.kind, row.custom)
    })
    .collect()
}

/// One `ID<TAB>AUTHOR<TAB>BODY` line per comment, body collapsed to one line
pub fn comments_plain(comments: &[JiraComment]) -> String {
  comments
    .iter()
    .map(|comment| {
      format!(
        "{}\t{}\t{}\n",
        comment.id,
        comment_author(comment),
        jtk_core::text::single_line(comment.body_text())
      )
    })
    .collect()
}

/// One `ID<TAB>NAME<TAB>TARGET` line per transition
pub fn transitions_plain(transitions: &[JiraTransition]) -> String {
  transitions
    .iter()
    .map(|transition| {
      format!(
        "{}\t{}\t{}\n",
        transition.id,
        transition.name,
        transition_target(transition)
      )
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use insta::assert_snapshot;
  use jtk_jira::JiraComments;

  use super::*;

  fn sample_issue() -> JiraIssue {
    serde_json::from_value(serde_json::json!({
      "id": "10001",
      "key": "PROJ-7",
      "fields": {
        "summary": "Fix login",
        "status": {"name": "In Progress"},
        "issuetype": {"id": "1", "name": "Bug"},
        "labels": ["auth", "web"],
        "description": {
          "type": "doc",
          "version": 1,
          "content": [
            {"type": "paragraph", "content": [{"type": "text", "text": "Users cannot sign in."}]},
            {"type": "paragraph", "content": [{"type": "text", "text": "Since Monday."}]}
          ]
        }
      }
    }))
    .unwrap()
  }

  fn sample_comments() -> Vec<JiraComment> {
    let page: JiraComments = serde_json::from_value(serde_json::json!({
      "comments": [
        {
          "id": "100",
          "author": {"accountId": "a1", "displayName": "Ada"},
          "created": "2024-01-02T10:00:00.000+0000",
          "body": {
            "type": "doc",
            "version": 1,
            "content": [
              {"type": "paragraph", "content": [{"type": "text", "text": "First line"}]},
              {"type": "paragraph", "content": [{"type": "text", "text": "second line"}]}
            ]
          }
        },
        {"id": "101", "body": "legacy text body"}
      ]
    }))
    .unwrap();
    page.comments
  }

  #[test]
  fn test_issue_plain() {
    assert_snapshot!(issue_plain(&sample_issue()), @r"
    PROJ-7	In Progress	Fix login
    Users cannot sign in.
    Since Monday.
    ");
  }

  #[test]
  fn test_issue_fields() {
    let rows = issue_fields(&sample_issue());
    let value = |name: &str| rows.iter().find(|row| row.field == name).unwrap().value.clone();

    assert_eq!(value("Status"), "In Progress");
    assert_eq!(value("Type"), "Bug");
    assert_eq!(value("Assignee"), "Unassigned");
    assert_eq!(value("Priority"), "-");
    assert_eq!(value("Labels"), "auth, web");
  }

  #[test]
  fn test_comments_plain() {
    assert_snapshot!(comments_plain(&sample_comments()), @r"
    100	Ada	First line second line
    101	Unknown	legacy text body
    ");
  }

  #[test]
  fn test_comment_rows_preview_body() {
    let mut comments = sample_comments();
    comments[1].body = Some(jtk_jira::Description::from_text("x".repeat(80)));

    let row = CommentRow::from(&comments[1]);
    assert_eq!(row.body, format!("{}...", "x".repeat(COMMENT_PREVIEW_LEN)));
    assert_eq!(row.created, "-");

    let rendered = table(comments.iter().map(CommentRow::from));
    assert!(rendered.contains("Author"));
    assert!(rendered.contains("First line second line"));
  }

  #[test]
  fn test_transitions_plain() {
    let transitions: Vec<JiraTransition> = serde_json::from_value(serde_json::json!([
      {"id": "11", "name": "Start", "to": {"name": "In Progress"}},
      {"id": "31", "name": "Close"}
    ]))
    .unwrap();

    assert_snapshot!(transitions_plain(&transitions), @r"
    11	Start	In Progress
    31	Close	-
    ");
  }

  #[test]
  fn test_issues_plain_and_rows() {
    let issues: Vec<JiraIssue> = serde_json::from_value(serde_json::json!([
      {"id": "1", "key": "PROJ-1", "fields": {
        "summary": "Fix login",
        "status": {"name": "To Do"},
        "assignee": {"accountId": "a1", "displayName": "Ada"},
        "issuetype": {"name": "Bug"}
      }},
      {"id": "2", "key": "PROJ-2", "fields": {"summary": "Write docs"}}
    ]))
    .unwrap();

    assert_snapshot!(issues_plain(&issues), @r"
    PROJ-1	To Do	Fix login
    PROJ-2	-	Write docs
    ");

    let row = IssueRow::from(&issues[0]);
    assert_eq!(row.assignee, "Ada");
    assert_eq!(row.issue_type, "Bug");
    assert_eq!(IssueRow::from(&issues[1]).assignee, "-");
  }

  #[test]
  fn test_fields_plain() {
    let fields: Vec<JiraField> = serde_json::from_value(serde_json::json!([
      {"id": "summary", "name": "Summary", "custom": false, "schema": {"type": "string"}},
      {"id": "customfield_10016", "name": "Story Points", "custom": true, "schema": {"type": "number"}},
      {"id": "issuekey", "name": "Key"}
    ]))
    .unwrap();

    assert_snapshot!(fields_plain(&fields), @r"
    summary	Summary	string	no
    customfield_10016	Story Points	number	yes
    issuekey	Key	-	no
    ");
  }

  #[test]
  fn test_to_json_is_pretty() {
    let json = to_json(&serde_json::json!({"key": "PROJ-1"})).unwrap();
    assert_eq!(json, "{\n  \"key\": \"PROJ-1\"\n}");
  }
}
