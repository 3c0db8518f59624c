//! Text helpers for fitting free-form Jira text into table cells.

/// Truncate a string to a maximum number of characters, appending "..." if
/// truncated.
///
/// Counts characters rather than bytes, so multibyte text is never split.
///
/// # Examples
/// ```
/// use jtk_core::text::truncate_string;
///
/// assert_eq!(truncate_string("hello", 10), "hello");
/// assert_eq!(truncate_string("hello world", 5), "hello...");
/// ```
pub fn truncate_string(s: &str, max_chars: usize) -> String {
  match s.char_indices().nth(max_chars) {
    Some((cut, _)) => format!("{}...", &s[..cut]),
    None => s.to_string(),
  }
}

/// Collapse all runs of whitespace (newlines included) into single spaces
pub fn single_line(s: &str) -> String {
  s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One-line preview of multi-line text, at most `max_chars` characters plus "..."
pub fn preview(s: &str, max_chars: usize) -> String {
  truncate_string(&single_line(s), max_chars)
}
