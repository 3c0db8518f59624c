//! # Atlassian Document Format
//!
//! The tree representation Jira Cloud uses for rich text fields (issue
//! descriptions, comment bodies, textarea custom fields). A document is a
//! `doc` root holding typed nodes; inline formatting is expressed as marks on
//! `text` leaves.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Version of the document format this crate reads and writes.
pub const ADF_VERSION: u32 = 1;

/// Root discriminator, only ever serialized as `"doc"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
enum DocType {
  #[default]
  #[serde(rename = "doc")]
  Doc,
}

const fn default_version() -> u32 {
  ADF_VERSION
}

/// A complete rich text document.
///
/// An empty document is never constructed by the converters: "no content" is
/// expressed as `None` at the call site so it stays distinct from a document
/// holding an empty paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
  #[serde(rename = "type")]
  doc_type: DocType,
  #[serde(default = "default_version")]
  pub version: u32,
  #[serde(default)]
  pub content: Vec<Node>,
}

impl Document {
  /// Create a version 1 document from top-level nodes
  pub fn new(content: Vec<Node>) -> Self {
    Self {
      doc_type: DocType::Doc,
      version: ADF_VERSION,
      content,
    }
  }

  /// Wrap raw text in a single paragraph without interpreting any markup
  pub fn from_plain_text(text: &str) -> Self {
    Self::new(vec![Node::paragraph(vec![Node::text(text)])])
  }

  /// Flatten the document to plain text.
  ///
  /// Text payloads are emitted in document order with marks ignored. Every
  /// `paragraph` and `hardBreak` is followed by a newline; other containers
  /// rely on their child paragraphs for line breaks.
  pub fn to_plain_text(&self) -> String {
    let mut out = String::new();
    write_plain_text(&self.content, &mut out);
    out
  }
}

/// Plain text of an optional document; an absent document yields `""`.
pub fn to_plain_text(doc: Option<&Document>) -> String {
  doc.map(Document::to_plain_text).unwrap_or_default()
}

fn write_plain_text(nodes: &[Node], out: &mut String) {
  for node in nodes {
    if let Some(text) = &node.text {
      out.push_str(text);
    }
    write_plain_text(&node.content, out);
    if matches!(node.kind, NodeKind::Paragraph | NodeKind::HardBreak) {
      out.push('\n');
    }
  }
}

/// Node type tag.
///
/// Kinds produced by the converters are listed explicitly. Anything else a
/// server sends back (mentions, emoji, media, panels...) is kept verbatim in
/// [`NodeKind::Other`] so documents survive a read/write round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
  Paragraph,
  Heading,
  CodeBlock,
  BulletList,
  OrderedList,
  ListItem,
  Blockquote,
  Rule,
  Table,
  TableRow,
  TableHeader,
  TableCell,
  Text,
  HardBreak,
  Other(String),
}

impl NodeKind {
  pub fn as_str(&self) -> &str {
    match self {
      Self::Paragraph => "paragraph",
      Self::Heading => "heading",
      Self::CodeBlock => "codeBlock",
      Self::BulletList => "bulletList",
      Self::OrderedList => "orderedList",
      Self::ListItem => "listItem",
      Self::Blockquote => "blockquote",
      Self::Rule => "rule",
      Self::Table => "table",
      Self::TableRow => "tableRow",
      Self::TableHeader => "tableHeader",
      Self::TableCell => "tableCell",
      Self::Text => "text",
      Self::HardBreak => "hardBreak",
      Self::Other(name) => name,
    }
  }
}

impl From<String> for NodeKind {
  fn from(name: String) -> Self {
    match name.as_str() {
      "paragraph" => Self::Paragraph,
      "heading" => Self::Heading,
      "codeBlock" => Self::CodeBlock,
      "bulletList" => Self::BulletList,
      "orderedList" => Self::OrderedList,
      "listItem" => Self::ListItem,
      "blockquote" => Self::Blockquote,
      "rule" => Self::Rule,
      "table" => Self::Table,
      "tableRow" => Self::TableRow,
      "tableHeader" => Self::TableHeader,
      "tableCell" => Self::TableCell,
      "text" => Self::Text,
      "hardBreak" => Self::HardBreak,
      _ => Self::Other(name),
    }
  }
}

impl From<NodeKind> for String {
  fn from(kind: NodeKind) -> Self {
    match kind {
      NodeKind::Other(name) => name,
      known => known.as_str().to_string(),
    }
  }
}

impl fmt::Display for NodeKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// One element of the document tree.
///
/// Only `text` nodes carry a payload or marks; containers carry children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
  #[serde(rename = "type")]
  pub kind: NodeKind,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub text: Option<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub content: Vec<Node>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub attrs: Option<Map<String, Value>>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub marks: Vec<Mark>,
}

impl Node {
  /// A container or leaf with no payload
  pub const fn new(kind: NodeKind, content: Vec<Node>) -> Self {
    Self {
      kind,
      text: None,
      content,
      attrs: None,
      marks: Vec::new(),
    }
  }

  /// An unmarked inline text run
  pub fn text(text: impl Into<String>) -> Self {
    Self {
      text: Some(text.into()),
      ..Self::new(NodeKind::Text, Vec::new())
    }
  }

  pub const fn paragraph(content: Vec<Node>) -> Self {
    Self::new(NodeKind::Paragraph, content)
  }

  pub fn heading(level: u8, content: Vec<Node>) -> Self {
    Self::new(NodeKind::Heading, content).with_attr("level", level)
  }

  /// A code block; the language attribute is set only when one was given
  pub fn code_block(language: Option<&str>, body: &str) -> Self {
    let content = if body.is_empty() { Vec::new() } else { vec![Self::text(body)] };
    let node = Self::new(NodeKind::CodeBlock, content);
    match language {
      Some(lang) if !lang.is_empty() => node.with_attr("language", lang),
      _ => node,
    }
  }

  pub const fn rule() -> Self {
    Self::new(NodeKind::Rule, Vec::new())
  }

  pub const fn hard_break() -> Self {
    Self::new(NodeKind::HardBreak, Vec::new())
  }

  /// Set a single attribute, creating the attribute map on first use
  pub fn with_attr(mut self, key: &str, value: impl Into<Value>) -> Self {
    self
      .attrs
      .get_or_insert_with(Map::new)
      .insert(key.to_string(), value.into());
    self
  }

  /// Add a mark unless an identical one is already present
  pub fn add_mark(&mut self, mark: Mark) {
    if !self.marks.contains(&mark) {
      self.marks.push(mark);
    }
  }

  pub fn with_mark(mut self, mark: Mark) -> Self {
    self.add_mark(mark);
    self
  }

  pub fn has_mark(&self, kind: &MarkKind) -> bool {
    self.marks.iter().any(|mark| &mark.kind == kind)
  }

  fn attr(&self, key: &str) -> Option<&Value> {
    self.attrs.as_ref().and_then(|attrs| attrs.get(key))
  }

  /// Heading level, if this node carries one
  pub fn level(&self) -> Option<u8> {
    self
      .attr("level")
      .and_then(Value::as_u64)
      .and_then(|level| u8::try_from(level).ok())
  }

  /// Code block language, if this node carries one
  pub fn language(&self) -> Option<&str> {
    self.attr("language").and_then(Value::as_str)
  }
}

/// Inline formatting tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MarkKind {
  Strong,
  Em,
  Code,
  Strike,
  Link,
  Other(String),
}

impl MarkKind {
  pub fn as_str(&self) -> &str {
    match self {
      Self::Strong => "strong",
      Self::Em => "em",
      Self::Code => "code",
      Self::Strike => "strike",
      Self::Link => "link",
      Self::Other(name) => name,
    }
  }
}

impl From<String> for MarkKind {
  fn from(name: String) -> Self {
    match name.as_str() {
      "strong" => Self::Strong,
      "em" => Self::Em,
      "code" => Self::Code,
      "strike" => Self::Strike,
      "link" => Self::Link,
      _ => Self::Other(name),
    }
  }
}

impl From<MarkKind> for String {
  fn from(kind: MarkKind) -> Self {
    match kind {
      MarkKind::Other(name) => name,
      known => known.as_str().to_string(),
    }
  }
}

/// Inline formatting attached to a text node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
  #[serde(rename = "type")]
  pub kind: MarkKind,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub attrs: Option<Map<String, Value>>,
}

impl Mark {
  pub const fn new(kind: MarkKind) -> Self {
    Self { kind, attrs: None }
  }

  /// A link mark pointing at `href`
  pub fn link(href: &str) -> Self {
    let mut attrs = Map::new();
    attrs.insert("href".to_string(), Value::from(href));
    Self {
      kind: MarkKind::Link,
      attrs: Some(attrs),
    }
  }

  /// Link target for `link` marks
  pub fn href(&self) -> Option<&str> {
    self
      .attrs
      .as_ref()
      .and_then(|attrs| attrs.get("href"))
      .and_then(Value::as_str)
  }
}
