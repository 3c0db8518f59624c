use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::adf::{Document, text_to_adf};

/// Represents Jira authentication credentials
#[derive(Clone)]
pub struct JiraAuth {
  pub username: String,
  pub api_token: String,
}

/// A rich text field as Jira returns it.
///
/// Jira Cloud sends ADF documents, older servers and some custom fields send
/// plain strings. Both forms are accepted on input; output is always ADF.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Description {
  /// Plain text, either as received or extracted from `adf`
  pub text: String,
  /// The structured document, when one was received
  pub adf: Option<Document>,
}

impl Description {
  /// Description built from user-authored text
  pub fn from_text(text: impl Into<String>) -> Self {
    Self {
      text: text.into(),
      adf: None,
    }
  }

  pub fn from_document(doc: Document) -> Self {
    Self {
      text: doc.to_plain_text(),
      adf: Some(doc),
    }
  }

  pub fn to_plain_text(&self) -> &str {
    &self.text
  }

  /// The document sent back to Jira: the received one if any, otherwise the converted text
  pub fn to_document(&self) -> Option<Document> {
    self.adf.clone().or_else(|| text_to_adf(&self.text))
  }
}

impl<'de> Deserialize<'de> for Description {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    match Value::deserialize(deserializer)? {
      Value::String(text) => Ok(Self::from_text(text)),
      value @ Value::Object(_) => Document::deserialize(value)
        .map(Self::from_document)
        .map_err(D::Error::custom),
      other => Err(D::Error::custom(format!(
        "expected a string or an ADF document, found {other}"
      ))),
    }
  }
}

impl Serialize for Description {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    match &self.adf {
      Some(doc) => doc.serialize(serializer),
      None => text_to_adf(&self.text).serialize(serializer),
    }
  }
}

/// Represents a Jira user
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraUser {
  #[serde(default)]
  pub account_id: String,
  #[serde(default)]
  pub display_name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email_address: Option<String>,
  #[serde(default)]
  pub active: bool,
}

/// Represents a Jira issue
#[derive(Debug, Deserialize, Serialize)]
pub struct JiraIssue {
  pub id: String,
  pub key: String,
  #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
  pub self_url: Option<String>,
  pub fields: JiraIssueFields,
}

/// Represents Jira issue fields
#[derive(Debug, Deserialize, Serialize)]
pub struct JiraIssueFields {
  #[serde(default)]
  pub summary: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<Description>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<JiraIssueStatus>,
  #[serde(default, rename = "issuetype", skip_serializing_if = "Option::is_none")]
  pub issue_type: Option<JiraIssueType>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub priority: Option<NamedRef>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub assignee: Option<JiraUser>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub reporter: Option<JiraUser>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub project: Option<JiraProject>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated: Option<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub labels: Vec<String>,
}

/// Represents a Jira issue status
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JiraIssueStatus {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JiraIssueType {
  #[serde(default)]
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub subtask: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JiraProject {
  #[serde(default)]
  pub id: String,
  pub key: String,
  #[serde(default)]
  pub name: String,
}

/// Any `{ "id", "name" }` reference such as a priority
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NamedRef {
  #[serde(default)]
  pub id: String,
  pub name: String,
}

/// Fields for a new issue
#[derive(Debug, Clone, Default)]
pub struct CreateIssue {
  pub project: String,
  pub summary: String,
  pub issue_type: String,
  /// Markdown or wiki markup, converted to ADF on send
  pub description: Option<String>,
  /// Additional fields by ID, already in wire format (see `JiraClient::resolve_fields`)
  pub fields: Map<String, Value>,
}

/// Fields to change on an existing issue; `None` leaves a field as is
#[derive(Debug, Clone, Default)]
pub struct UpdateIssue {
  pub summary: Option<String>,
  pub description: Option<String>,
  /// Additional fields by ID, already in wire format
  pub fields: Map<String, Value>,
}

impl UpdateIssue {
  pub fn is_empty(&self) -> bool {
    self.summary.is_none() && self.description.is_none() && self.fields.is_empty()
  }
}

/// Wire body for issue create and edit requests
#[derive(Debug, Serialize)]
pub struct IssueRequest {
  pub fields: IssueRequestFields,
}

#[derive(Debug, Default, Serialize)]
pub struct IssueRequestFields {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub project: Option<KeyRef>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub summary: Option<String>,
  #[serde(rename = "issuetype", skip_serializing_if = "Option::is_none")]
  pub issue_type: Option<NameRef>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<Document>,
  /// Everything given through `--field`; named fields above win on conflict
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl IssueRequestFields {
  fn with_extra(mut self, extra: &Map<String, Value>) -> Self {
    let named = [
      ("project", self.project.is_some()),
      ("summary", self.summary.is_some()),
      ("issuetype", self.issue_type.is_some()),
      ("description", self.description.is_some()),
    ];
    self.extra = extra
      .iter()
      .filter(|(id, _)| !named.iter().any(|&(name, set)| set && name == id.as_str()))
      .map(|(id, value)| (id.clone(), value.clone()))
      .collect();
    self
  }
}

#[derive(Debug, Serialize)]
pub struct KeyRef {
  pub key: String,
}

#[derive(Debug, Serialize)]
pub struct NameRef {
  pub name: String,
}

impl From<&CreateIssue> for IssueRequest {
  fn from(issue: &CreateIssue) -> Self {
    let fields = IssueRequestFields {
      project: Some(KeyRef {
        key: issue.project.clone(),
      }),
      summary: Some(issue.summary.clone()),
      issue_type: Some(NameRef {
        name: issue.issue_type.clone(),
      }),
      description: issue.description.as_deref().and_then(text_to_adf),
      extra: Map::new(),
    };
    Self {
      fields: fields.with_extra(&issue.fields),
    }
  }
}

impl From<&UpdateIssue> for IssueRequest {
  fn from(update: &UpdateIssue) -> Self {
    let fields = IssueRequestFields {
      summary: update.summary.clone(),
      description: update.description.as_deref().and_then(text_to_adf),
      ..IssueRequestFields::default()
    };
    Self {
      fields: fields.with_extra(&update.fields),
    }
  }
}

/// One page of a JQL search
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraSearchPage {
  #[serde(default)]
  pub issues: Vec<JiraIssue>,
  #[serde(default)]
  pub next_page_token: Option<String>,
  #[serde(default)]
  pub is_last: bool,
}

/// Assignee change; `None` unassigns
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
  pub account_id: Option<String>,
}

/// A field definition as listed by `GET /field`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JiraField {
  pub id: String,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub custom: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub schema: Option<JiraFieldSchema>,
}

impl JiraField {
  /// Schema type (`string`, `option`, `array`...), empty when unknown
  pub fn schema_type(&self) -> &str {
    self.schema.as_ref().map_or("", |schema| schema.kind.as_str())
  }
}

/// Data type of a field
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JiraFieldSchema {
  #[serde(rename = "type", default)]
  pub kind: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub items: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub system: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub custom: Option<String>,
}

/// Response to a successful create
#[derive(Debug, Deserialize, Serialize)]
pub struct CreatedIssue {
  pub id: String,
  pub key: String,
  #[serde(rename = "self", default)]
  pub self_url: String,
}

/// Represents a Jira comment
#[derive(Debug, Deserialize, Serialize)]
pub struct JiraComment {
  pub id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub author: Option<JiraUser>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub body: Option<Description>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated: Option<String>,
}

impl JiraComment {
  pub fn body_text(&self) -> &str {
    self.body.as_ref().map_or("", Description::to_plain_text)
  }
}

/// A page of comments
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraComments {
  #[serde(default)]
  pub start_at: u32,
  #[serde(default)]
  pub max_results: u32,
  #[serde(default)]
  pub total: u32,
  #[serde(default)]
  pub comments: Vec<JiraComment>,
}

#[derive(Debug, Serialize)]
pub struct CommentRequest {
  pub body: Document,
}

/// Represents a Jira transition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JiraTransition {
  pub id: String,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub to: Option<JiraIssueStatus>,
}

/// Represents a list of Jira transitions
#[derive(Debug, Deserialize)]
pub struct JiraTransitions {
  pub transitions: Vec<JiraTransition>,
}

/// Represents a transition request payload
#[derive(Debug, Serialize)]
pub struct TransitionRequest {
  pub transition: TransitionId,
}

/// Represents a transition ID for the request
#[derive(Debug, Serialize)]
pub struct TransitionId {
  pub id: String,
}
