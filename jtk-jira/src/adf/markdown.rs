//! # Markdown to ADF
//!
//! Parses CommonMark (plus GFM tables and strikethrough) with comrak and
//! walks the resulting AST into an ADF [`Document`]. Constructs ADF cannot
//! express, such as raw HTML, are skipped; nothing here panics on odd input.

use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{Arena, Options, parse_document};
use tracing::trace;

use super::document::{Document, Mark, MarkKind, Node, NodeKind};

/// Convert Markdown to an ADF document.
///
/// Returns `None` for empty input. When the parser yields no representable
/// block at all, the raw input is kept verbatim in a single paragraph so the
/// author's text is never lost.
pub fn markdown_to_adf(markdown: &str) -> Option<Document> {
  if markdown.is_empty() {
    return None;
  }

  let arena = Arena::new();
  let root = parse_document(&arena, markdown, &parser_options());

  let content: Vec<Node> = root.children().filter_map(convert_block).collect();
  if content.is_empty() {
    trace!("Markdown produced no blocks, falling back to a raw paragraph");
    return Some(Document::from_plain_text(markdown));
  }

  trace!("Converted markdown into {} top-level nodes", content.len());
  Some(Document::new(content))
}

fn parser_options() -> Options<'static> {
  let mut options = Options::default();
  options.extension.table = true;
  options.extension.strikethrough = true;
  options
}

/// Convert one block-level AST node, or `None` when it has no ADF counterpart
fn convert_block<'a>(node: &'a AstNode<'a>) -> Option<Node> {
  match &node.data.borrow().value {
    NodeValue::Heading(heading) => Some(Node::heading(heading.level, convert_inlines(node))),
    NodeValue::Paragraph => {
      let content = convert_inlines(node);
      if content.is_empty() {
        None
      } else {
        Some(Node::paragraph(content))
      }
    }
    NodeValue::CodeBlock(code) => {
      let language = code.info.split_whitespace().next();
      let body = code.literal.strip_suffix('\n').unwrap_or(&code.literal);
      Some(Node::code_block(language, body))
    }
    NodeValue::List(list) => {
      let kind = match list.list_type {
        ListType::Ordered => NodeKind::OrderedList,
        ListType::Bullet => NodeKind::BulletList,
      };
      let items = node.children().filter_map(convert_list_item).collect();
      Some(Node::new(kind, items))
    }
    NodeValue::BlockQuote => Some(Node::new(NodeKind::Blockquote, convert_nested_blocks(node))),
    NodeValue::ThematicBreak => Some(Node::rule()),
    NodeValue::Table(_) => Some(Node::new(
      NodeKind::Table,
      node.children().filter_map(convert_table_row).collect(),
    )),
    _ => None,
  }
}

fn convert_list_item<'a>(node: &'a AstNode<'a>) -> Option<Node> {
  if !matches!(node.data.borrow().value, NodeValue::Item(_)) {
    return None;
  }
  Some(Node::new(NodeKind::ListItem, convert_nested_blocks(node)))
}

/// Children of list items and block quotes.
///
/// Only paragraphs, lists and code blocks are kept since those are the block
/// kinds ADF accepts inside these containers.
fn convert_nested_blocks<'a>(node: &'a AstNode<'a>) -> Vec<Node> {
  node
    .children()
    .filter_map(convert_block)
    .filter(|child| {
      matches!(
        child.kind,
        NodeKind::Paragraph | NodeKind::BulletList | NodeKind::OrderedList | NodeKind::CodeBlock
      )
    })
    .collect()
}

fn convert_table_row<'a>(node: &'a AstNode<'a>) -> Option<Node> {
  let header = match node.data.borrow().value {
    NodeValue::TableRow(header) => header,
    _ => return None,
  };
  let cell_kind = if header { NodeKind::TableHeader } else { NodeKind::TableCell };

  let cells = node
    .children()
    .filter(|cell| matches!(cell.data.borrow().value, NodeValue::TableCell))
    .map(|cell| {
      let inlines = convert_inlines(cell);
      let content = if inlines.is_empty() {
        Vec::new()
      } else {
        vec![Node::paragraph(inlines)]
      };
      Node::new(cell_kind.clone(), content)
    })
    .collect();

  Some(Node::new(NodeKind::TableRow, cells))
}

/// Flatten the inline children of `node` into text runs and hard breaks
fn convert_inlines<'a>(node: &'a AstNode<'a>) -> Vec<Node> {
  let mut out = Vec::new();
  for child in node.children() {
    convert_inline(child, &mut out);
  }
  out
}

fn convert_inline<'a>(node: &'a AstNode<'a>, out: &mut Vec<Node>) {
  match &node.data.borrow().value {
    NodeValue::Text(text) => {
      if !text.is_empty() {
        out.push(Node::text(text.as_str()));
      }
    }
    NodeValue::SoftBreak => out.push(Node::text(" ")),
    NodeValue::LineBreak => out.push(Node::hard_break()),
    NodeValue::Code(code) => out.push(Node::text(code.literal.as_str()).with_mark(Mark::new(MarkKind::Code))),
    NodeValue::Emph => out.extend(marked(convert_inlines(node), &Mark::new(MarkKind::Em))),
    NodeValue::Strong => out.extend(marked(convert_inlines(node), &Mark::new(MarkKind::Strong))),
    NodeValue::Strikethrough => out.extend(marked(convert_inlines(node), &Mark::new(MarkKind::Strike))),
    NodeValue::Link(link) => out.extend(marked(convert_inlines(node), &Mark::link(&link.url))),
    NodeValue::Image(image) => {
      let label = if image.title.is_empty() {
        collect_text(node)
      } else {
        image.title.clone()
      };
      if !label.is_empty() {
        out.push(Node::text(label).with_mark(Mark::link(&image.url)));
      }
    }
    NodeValue::HtmlInline(_) => {}
    _ => {
      for child in node.children() {
        convert_inline(child, out);
      }
    }
  }
}

/// Apply `mark` to every text run; nested formatting therefore accumulates
fn marked(mut nodes: Vec<Node>, mark: &Mark) -> Vec<Node> {
  for node in nodes.iter_mut().filter(|node| node.kind == NodeKind::Text) {
    node.add_mark(mark.clone());
  }
  nodes
}

/// Concatenated literal text below `node`, used for image alt text
fn collect_text<'a>(node: &'a AstNode<'a>) -> String {
  let mut text = String::new();
  for descendant in node.descendants() {
    match &descendant.data.borrow().value {
      NodeValue::Text(literal) => text.push_str(literal),
      NodeValue::Code(code) => text.push_str(&code.literal),
      NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
      _ => {}
    }
  }
  text
}
