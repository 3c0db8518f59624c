//! # Jira Field Endpoints
//!
//! Field definitions, and turning `name=value` pairs typed on the command line
//! into the value shapes Jira expects for each field type.

use anyhow::{Context, Result};
use reqwest::{Method, StatusCode};
use serde_json::{Map, Number, Value, json};
use tracing::debug;

use crate::adf::text_to_adf;
use crate::client::{JiraClient, api_error};
use crate::models::JiraField;

/// Custom field type holding rich text, sent as ADF
pub const TEXTAREA_FIELD_TYPE: &str = "com.atlassian.jira.plugin.system.customfieldtypes:textarea";

impl JiraClient {
  /// List every field definition visible to the user
  pub async fn get_fields(&self) -> Result<Vec<JiraField>> {
    let response = self
      .send(self.request(Method::GET, "/field"), "fetch Jira fields")
      .await?;

    match response.status() {
      StatusCode::OK => response
        .json::<Vec<JiraField>>()
        .await
        .context("Failed to parse Jira fields"),
      _ => Err(api_error(response, "Field list").await.into()),
    }
  }

  /// Only the custom field definitions
  pub async fn get_custom_fields(&self) -> Result<Vec<JiraField>> {
    let fields = self.get_fields().await?;
    Ok(fields.into_iter().filter(|field| field.custom).collect())
  }

  /// Resolve `(name or ID, value)` pairs into wire values keyed by field ID.
  ///
  /// Field definitions are fetched only when there is something to resolve.
  /// A name matching no field is sent as given, with a string value.
  pub async fn resolve_fields(&self, pairs: &[(String, String)]) -> Result<Map<String, Value>> {
    if pairs.is_empty() {
      return Ok(Map::new());
    }

    let fields = self.get_fields().await.context("Failed to get field metadata")?;
    let resolved = pairs
      .iter()
      .map(|(name, value)| {
        let field = find_field(&fields, name);
        if field.is_none() {
          debug!("No field named '{}', sending it as given", name);
        }
        let id = field.map_or_else(|| name.trim().to_string(), |field| field.id.clone());
        (id, format_field_value(field, value))
      })
      .collect();

    Ok(resolved)
  }
}

/// Find a field by ID, or by name ignoring case
pub fn find_field<'a>(fields: &'a [JiraField], name_or_id: &str) -> Option<&'a JiraField> {
  let wanted = name_or_id.trim();
  let wanted_lower = wanted.to_lowercase();
  fields
    .iter()
    .find(|field| field.id == wanted)
    .or_else(|| fields.iter().find(|field| field.name.to_lowercase() == wanted_lower))
}

/// Shape a raw string for the field's type.
///
/// Textarea custom fields get the same Markdown or wiki markup conversion as
/// descriptions. Select lists, multi-selects, labels, user pickers and numbers
/// get their wrapped forms; anything else stays a string.
pub fn format_field_value(field: Option<&JiraField>, value: &str) -> Value {
  let Some(schema) = field.and_then(|field| field.schema.as_ref()) else {
    return Value::String(value.to_string());
  };

  if schema.custom.as_deref() == Some(TEXTAREA_FIELD_TYPE) {
    return text_to_adf(value)
      .and_then(|doc| serde_json::to_value(doc).ok())
      .unwrap_or(Value::Null);
  }

  match schema.kind.as_str() {
    "option" => json!({ "value": value }),
    "array" if schema.items.as_deref() == Some("option") => json!([{ "value": value }]),
    "array" => json!([value]),
    "user" => json!({ "accountId": value }),
    "number" => value
      .trim()
      .parse::<f64>()
      .ok()
      .and_then(Number::from_f64)
      .map_or_else(|| Value::String(value.to_string()), Value::Number),
    _ => Value::String(value.to_string()),
  }
}
