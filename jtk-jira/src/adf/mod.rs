//! # Rich Text Conversion
//!
//! Turns user-authored text (Markdown or Jira wiki markup) into Atlassian
//! Document Format, and ADF back into plain text for display.

pub mod document;
pub mod markdown;
pub mod wiki;

pub use document::{ADF_VERSION, Document, Mark, MarkKind, Node, NodeKind, to_plain_text};
pub use markdown::markdown_to_adf;
pub use wiki::{is_wiki_markup, wiki_to_markdown};

/// Markup syntax of user-supplied text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextFormat {
  /// Sniff for wiki markup, otherwise treat as Markdown
  #[default]
  Auto,
  Markdown,
  Wiki,
}

/// Convert user text to ADF, transcoding wiki markup first when detected.
///
/// This is what every write path (descriptions, comments, textarea fields)
/// goes through. Returns `None` for empty input.
pub fn text_to_adf(text: &str) -> Option<Document> {
  convert_text(text, TextFormat::Auto)
}

/// Convert user text to ADF using an explicit source format
pub fn convert_text(text: &str, format: TextFormat) -> Option<Document> {
  let wiki = match format {
    TextFormat::Auto => is_wiki_markup(text),
    TextFormat::Markdown => false,
    TextFormat::Wiki => true,
  };

  if wiki {
    tracing::trace!("Treating input as Jira wiki markup");
    markdown_to_adf(&wiki_to_markdown(text))
  } else {
    markdown_to_adf(text)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_wiki_input_is_transcoded() {
    let doc = text_to_adf("h2. Status\n\nSee [docs|https://e.com]").unwrap();
    assert_eq!(doc.content[0].kind, NodeKind::Heading);
    assert_eq!(doc.content[0].level(), Some(2));

    let link = &doc.content[1].content[1];
    assert_eq!(link.text.as_deref(), Some("docs"));
    assert_eq!(link.marks[0].href(), Some("https://e.com"));
  }

  #[test]
  fn test_wiki_code_block_language_survives() {
    let doc = text_to_adf("{code:java}\nint x = 1;\n{code}").unwrap();
    let block = &doc.content[0];
    assert_eq!(block.kind, NodeKind::CodeBlock);
    assert_eq!(block.language(), Some("java"));
    assert_eq!(block.content[0].text.as_deref(), Some("int x = 1;"));
  }

  #[test]
  fn test_wiki_quote_holds_code_block() {
    let doc = text_to_adf("{quote}\nintro\n{code}\nx = 1\ny = 2\n{code}\n{quote}").unwrap();
    assert_eq!(doc.content.len(), 1);

    let quote = &doc.content[0];
    assert_eq!(quote.kind, NodeKind::Blockquote);
    assert_eq!(quote.content[0].kind, NodeKind::Paragraph);
    assert_eq!(quote.content[1].kind, NodeKind::CodeBlock);
    assert_eq!(quote.content[1].content[0].text.as_deref(), Some("x = 1\ny = 2"));
  }

  #[test]
  fn test_wiki_nested_bullets() {
    let doc = text_to_adf("{{x}}\n\n* one\n** two").unwrap();
    let list = &doc.content[1];
    assert_eq!(list.kind, NodeKind::BulletList);
    assert_eq!(list.content[0].content[1].kind, NodeKind::BulletList);
  }

  #[test]
  fn test_markdown_input_is_untouched() {
    let doc = text_to_adf("Some **bold** text").unwrap();
    assert!(doc.content[0].content[1].has_mark(&MarkKind::Strong));
  }

  #[test]
  fn test_explicit_format_skips_detection() {
    let doc = convert_text("h1. Not a heading", TextFormat::Markdown).unwrap();
    assert_eq!(doc.content[0].kind, NodeKind::Paragraph);

    let doc = convert_text("-gone-", TextFormat::Wiki).unwrap();
    assert!(doc.content[0].content[0].has_mark(&MarkKind::Strike));
  }

  #[test]
  fn test_empty_input() {
    assert!(text_to_adf("").is_none());
  }

  #[test]
  fn test_plain_text_round_trip() {
    let doc = text_to_adf("First paragraph\n\n- item\n- *other* item").unwrap();
    assert_eq!(doc.to_plain_text(), "First paragraph\nitem\nother item\n");
  }
}
