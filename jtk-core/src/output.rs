//! # Output Formatting
//!
//! Provides formatted output functions with colors, emojis, and consistent
//! styling for user-facing messages and terminal output.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use owo_colors::OwoColorize;

/// Enum representing different color modes for output
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
  /// Always emit colors
  #[value(alias = "yes")]
  Always,
  /// Automatically detect if colors should be used based on terminal
  /// capabilities
  Auto,
  /// Disable colored output
  #[value(alias = "no")]
  Never,
}

impl ColorMode {
  /// Install this mode as the global owo-colors override
  pub fn apply(self) {
    match self {
      Self::Always => owo_colors::set_override(true),
      Self::Never => owo_colors::set_override(false),
      Self::Auto => {}
    }
  }
}

/// How command results are rendered
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
  /// Human readable tables
  #[default]
  Table,
  /// Pretty-printed JSON as returned by the API
  Json,
  /// Bare values, one per line, for scripting
  Plain,
}

/// Helper function to safely get an emoji or fallback to a default character
pub fn get_emoji_or_default(name: &str, default: &str) -> String {
  match emojis::get_by_shortcode(name) {
    Some(emoji) => emoji.to_string(),
    None => default.to_string(),
  }
}

/// Print a success message
pub fn print_success(message: &str) {
  let check = get_emoji_or_default("white_check_mark", "✓");
  println!("{} {}", check.green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
  let cross = get_emoji_or_default("x", "✗");
  eprintln!("{} {}", cross.red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
  let warning = get_emoji_or_default("warning", "⚠");
  eprintln!("{} {}", warning.yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
  let info = get_emoji_or_default("information_source", "ℹ");
  println!("{} {}", info.blue().bold(), message);
}

/// Print a section header
pub fn print_header(header: &str) {
  println!("\n{}", header.blue().bold());
}

/// Format an issue key
pub fn format_issue_key(key: &str) -> String {
  key.bright_cyan().bold().to_string()
}

/// Format a workflow status, colored by the usual category names
pub fn format_status(status: &str) -> String {
  match status.to_ascii_lowercase().as_str() {
    "done" | "closed" | "resolved" => status.green().to_string(),
    "in progress" | "in review" => status.yellow().to_string(),
    _ => status.blue().to_string(),
  }
}

/// Format a timestamp
pub fn format_timestamp(timestamp: &str) -> String {
  timestamp.yellow().to_string()
}

/// Format a command or command example
pub fn format_command(cmd: &str) -> String {
  cmd.purple().to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_get_emoji_or_default() {
    let result = get_emoji_or_default("warning", "⚠");
    assert!(!result.is_empty());

    let result = get_emoji_or_default("nonexistent_emoji", "fallback");
    assert_eq!(result, "fallback");
  }

  #[test]
  fn test_format_functions_keep_text() {
    owo_colors::set_override(false);
    assert_eq!(format_issue_key("PROJ-1"), "PROJ-1");
    assert_eq!(format_status("Done"), "Done");
    assert_eq!(format_status("In Progress"), "In Progress");
    assert_eq!(format_timestamp("2024-01-01"), "2024-01-01");
    assert_eq!(format_command("jtk config set"), "jtk config set");
    owo_colors::unset_override();
  }

  #[test]
  fn test_color_mode_aliases() {
    use clap::ValueEnum;

    assert_eq!(ColorMode::from_str("yes", true).unwrap(), ColorMode::Always);
    assert_eq!(ColorMode::from_str("NEVER", true).unwrap(), ColorMode::Never);
    assert_eq!(OutputFormat::from_str("json", false).unwrap(), OutputFormat::Json);
  }
}
