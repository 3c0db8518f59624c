//! # Jira Wiki Markup
//!
//! Detection and Markdown transcoding of the legacy Jira wiki syntax
//! (`h1.`, `{code}`, `[label|url]`, `{{mono}}`...). Transcoded output is fed
//! to the Markdown converter, so only constructs with a Markdown spelling are
//! rewritten; everything else passes through untouched.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::trace;

/// How a matching signature affects the wiki verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SignatureKind {
  /// Never appears in ordinary Markdown
  Conclusive,
  /// `* item` is valid in both syntaxes
  Ambiguous,
  /// `# item` is a Markdown heading unless the text reads like a wiki numbered list
  HashPrefixed,
}

struct Signature {
  pattern: Regex,
  kind: SignatureKind,
}

fn signature(pattern: &str, kind: SignatureKind) -> Signature {
  Signature {
    pattern: Regex::new(pattern).expect("Failed to compile wiki signature regex"),
    kind,
  }
}

static SIGNATURES: LazyLock<Vec<Signature>> = LazyLock::new(|| {
  use SignatureKind::{Ambiguous, Conclusive, HashPrefixed};
  vec![
    signature(r"(?m)^h[1-6]\.\s", Conclusive),
    signature(r"\{\{[^}]+\}\}", Conclusive),
    signature(r"\{code[^}]*\}[\s\S]*?\{code\}", Conclusive),
    signature(r"\{noformat\}[\s\S]*?\{noformat\}", Conclusive),
    signature(r"\{quote\}[\s\S]*?\{quote\}", Conclusive),
    signature(r"\[([^\]|]+)\|([^\]]+)\]", Conclusive),
    signature(r"![^\s!]+!", Conclusive),
    signature(r"(?m)^bq\.\s", Conclusive),
    signature(r"(?m)^\*+\s", Ambiguous),
    signature(r"(?m)^#+\s+[^#]", HashPrefixed),
  ]
});

/// Longest item text still considered a wiki numbered list entry
const MAX_NUMBERED_ITEM_LEN: usize = 80;

/// Report whether `text` looks like Jira wiki markup rather than Markdown.
///
/// Signatures are checked in order and the first decisive one wins. Bullet
/// lines never decide on their own, and `#` lines only count when the text
/// reads like a numbered list.
pub fn is_wiki_markup(text: &str) -> bool {
  for signature in SIGNATURES.iter() {
    if !signature.pattern.is_match(text) {
      continue;
    }
    match signature.kind {
      SignatureKind::Conclusive => {
        trace!("Wiki signature matched: {}", signature.pattern.as_str());
        return true;
      }
      SignatureKind::Ambiguous => {}
      SignatureKind::HashPrefixed => {
        if looks_like_numbered_list(text) {
          trace!("Text reads like a wiki numbered list");
          return true;
        }
      }
    }
  }
  false
}

/// A short `# ` or `## ` item without further `#`, in text with at least two `#` lines
fn looks_like_numbered_list(text: &str) -> bool {
  let hash_lines = text.lines().filter(|line| line.trim().starts_with('#')).count();
  if hash_lines < 2 {
    return false;
  }

  text
    .lines()
    .map(str::trim)
    .filter(|line| line.starts_with("# ") || line.starts_with("## "))
    .any(|line| {
      let item = line.trim_start_matches(['#', ' ']);
      item.len() < MAX_NUMBERED_ITEM_LEN && !item.contains('#')
    })
}

fn compile(pattern: &str) -> Regex {
  Regex::new(pattern).expect("Failed to compile wiki transcoding regex")
}

static HEADING: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^h([1-6])\.\s*(.*)$"));
static CODE_BLOCK: LazyLock<Regex> =
  LazyLock::new(|| compile(r"(?s)(^|[^{])\{code(?::([a-zA-Z0-9]+))?\}(.*?)\{code\}"));
static NOFORMAT: LazyLock<Regex> = LazyLock::new(|| compile(r"(?s)\{noformat\}(.*?)\{noformat\}"));
static QUOTE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?s)\{quote\}(.*?)\{quote\}"));
static MONOSPACE: LazyLock<Regex> = LazyLock::new(|| compile(r"\{\{([^}]+)\}\}"));
static LINK: LazyLock<Regex> = LazyLock::new(|| compile(r"\[([^\]|]+)\|([^\]]+)\]"));
static IMAGE: LazyLock<Regex> = LazyLock::new(|| compile(r"!([^\s!|]+)(?:\|([^!]+))?!"));
static STRIKE: LazyLock<Regex> = LazyLock::new(|| compile(r"-([^\s-][^-]*[^\s-]|[^\s-])-"));
static UNDERLINE: LazyLock<Regex> = LazyLock::new(|| compile(r"\+([^\s+][^+]*[^\s+]|[^\s+])\+"));
static SUBSCRIPT: LazyLock<Regex> = LazyLock::new(|| compile(r"~([^\s~][^~]*[^\s~]|[^\s~])~"));
static SUPERSCRIPT: LazyLock<Regex> = LazyLock::new(|| compile(r"\^([^\s\^][^\^]*[^\s\^]|[^\s\^])\^"));
static CITATION: LazyLock<Regex> = LazyLock::new(|| compile(r"\?\?([^?]+)\?\?"));
static BLOCKQUOTE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^bq\.\s*(.*)$"));
static RULE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^----+$"));
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| compile("\u{1A}(\\d+)\\.(\\d+)\u{1A}"));

/// Verbatim spans pulled out of the text while inline rules run.
///
/// Code and monospace bodies are replaced by numbered placeholders so that
/// `-x-`, `+y+` and friends inside them are left alone, then put back once
/// every other rule has been applied. Placeholders carry a nonce that does not
/// occur in the input, so sentinel-like text written by the author is kept.
struct Stash {
  nonce: usize,
  spans: Vec<String>,
}

impl Stash {
  fn for_text(text: &str) -> Self {
    let nonce = (0..)
      .find(|nonce| !text.contains(&format!("\u{1A}{nonce}.")))
      .unwrap_or_default();
    Self {
      nonce,
      spans: Vec::new(),
    }
  }

  fn hold(&mut self, span: String) -> String {
    self.spans.push(span);
    format!("\u{1A}{}.{}\u{1A}", self.nonce, self.spans.len() - 1)
  }

  fn index(&self, caps: &Captures) -> Option<usize> {
    if caps[1].parse::<usize>().ok()? != self.nonce {
      return None;
    }
    caps[2].parse::<usize>().ok()
  }

  /// Carry the `> ` prefix through every line of the spans referenced in `text`
  fn quote_spans(&mut self, text: &str) {
    for caps in PLACEHOLDER.captures_iter(text) {
      if let Some(span) = self.index(&caps).and_then(|index| self.spans.get_mut(index)) {
        *span = span.replace('\n', "\n> ");
      }
    }
  }

  fn restore(&self, text: &str) -> String {
    PLACEHOLDER
      .replace_all(text, |caps: &Captures| {
        self
          .index(caps)
          .and_then(|index| self.spans.get(index))
          .cloned()
          .unwrap_or_else(|| caps[0].to_string())
      })
      .into_owned()
  }
}

/// Rewrite every `pattern` match whose neighbouring characters pass `boundary`.
///
/// Neighbours are inspected rather than matched, so a decoration may directly
/// follow another one. After a rejected match the search resumes one byte past
/// its opening delimiter.
fn replace_delimited(
  text: &str,
  pattern: &Regex,
  boundary: impl Fn(Option<char>, Option<char>) -> bool,
  render: impl Fn(&str) -> String,
) -> String {
  let mut out = String::with_capacity(text.len());
  let mut copied = 0;
  let mut from = 0;

  while let Some(caps) = pattern.captures_at(text, from) {
    let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
      break;
    };
    let before = text[..whole.start()].chars().next_back();
    let after = text[whole.end()..].chars().next();

    if boundary(before, after) {
      out.push_str(&text[copied..whole.start()]);
      out.push_str(&render(inner.as_str()));
      copied = whole.end();
      from = whole.end();
    } else {
      // Delimiters are ASCII
      from = whole.start() + 1;
    }
  }

  out.push_str(&text[copied..]);
  out
}

fn is_word(c: char) -> bool {
  c.is_alphanumeric() || c == '_'
}

/// Dashes inside words ("well-known", "run-time") are not strikethrough
fn strike_boundary(before: Option<char>, after: Option<char>) -> bool {
  let outside = |c: Option<char>| c.is_none_or(|c| !is_word(c) && c != '-');
  outside(before) && outside(after)
}

/// Tildes next to another tilde belong to a Markdown `~~strike~~`
fn subscript_boundary(before: Option<char>, after: Option<char>) -> bool {
  before != Some('~') && after != Some('~')
}

/// Rewrite Jira wiki markup as Markdown.
///
/// Rules run in a fixed order: headings, code, noformat, quote, monospace,
/// links, images, strikethrough, underline, subscript, superscript,
/// citation, `bq.`, list bullets and horizontal rules. Markdown input mostly
/// passes through unchanged, though callers should only transcode text that
/// [`is_wiki_markup`] accepted.
pub fn wiki_to_markdown(wiki: &str) -> String {
  let mut stash = Stash::for_text(wiki);

  let text = HEADING.replace_all(wiki, |caps: &Captures| {
    let level = caps[1].parse::<usize>().unwrap_or(1);
    format!("{} {}", "#".repeat(level), &caps[2])
  });

  let text = CODE_BLOCK.replace_all(&text, |caps: &Captures| {
    let language = caps.get(2).map_or("", |lang| lang.as_str());
    let fence = format!("```{}\n{}\n```", language, trim_fence_body(&caps[3]));
    format!("{}{}", &caps[1], stash.hold(fence))
  });

  let text = NOFORMAT.replace_all(&text, |caps: &Captures| {
    stash.hold(format!("```\n{}\n```", trim_fence_body(&caps[1])))
  });

  let text = QUOTE.replace_all(&text, |caps: &Captures| {
    let body = caps[1].trim();
    stash.quote_spans(body);
    body
      .lines()
      .map(|line| format!("> {line}"))
      .collect::<Vec<_>>()
      .join("\n")
  });

  let text = MONOSPACE.replace_all(&text, |caps: &Captures| stash.hold(format!("`{}`", &caps[1])));

  let text = LINK.replace_all(&text, "[${1}](${2})");

  let text = IMAGE.replace_all(&text, |caps: &Captures| {
    let alt = caps
      .get(2)
      .and_then(|options| options.as_str().strip_prefix("alt="))
      .unwrap_or("");
    format!("![{}]({})", alt, &caps[1])
  });

  let text = replace_delimited(&text, &STRIKE, strike_boundary, |inner| format!("~~{inner}~~"));
  let text = UNDERLINE.replace_all(&text, "<u>${1}</u>");
  let text = replace_delimited(&text, &SUBSCRIPT, subscript_boundary, |inner| {
    format!("<sub>{inner}</sub>")
  });
  let text = SUPERSCRIPT.replace_all(&text, "<sup>${1}</sup>");
  let text = CITATION.replace_all(&text, "<cite>${1}</cite>");
  let text = BLOCKQUOTE.replace_all(&text, "> ${1}");

  let text = text.split('\n').map(convert_bullet).collect::<Vec<_>>().join("\n");
  let text = RULE.replace_all(&text, "---");

  let markdown = stash.restore(&text);
  trace!("Transcoded {} bytes of wiki markup into {} bytes of markdown", wiki.len(), markdown.len());
  markdown
}

/// Drop the newline that usually follows the opening tag and precedes the closing one
fn trim_fence_body(body: &str) -> &str {
  let body = body.strip_prefix('\n').unwrap_or(body);
  body.strip_suffix('\n').unwrap_or(body)
}

/// Rewrite `*`, `**` and `***` bullets as indented Markdown dashes.
///
/// `#` numbered items are left as they are.
fn convert_bullet(line: &str) -> String {
  let item = line.trim_start_matches([' ', '\t']);
  let indent = &line[..line.len() - item.len()];

  if let Some(rest) = item.strip_prefix("*** ") {
    format!("{indent}    - {rest}")
  } else if let Some(rest) = item.strip_prefix("** ") {
    format!("{indent}  - {rest}")
  } else if let Some(rest) = item.strip_prefix("* ") {
    format!("{indent}- {rest}")
  } else {
    line.to_string()
  }
}
