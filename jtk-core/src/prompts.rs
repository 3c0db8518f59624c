//! # Prompts Module
//!
//! Provides a custom dialoguer theme, the input prompts used when
//! `jtk config set` runs without flags, and confirmation before destructive
//! commands.

use anyhow::{Context, Result};
use console::Style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Password};

/// Returns a custom dialoguer theme matching jtk's color palette.
pub fn jtk_theme() -> ColorfulTheme {
  ColorfulTheme {
    prompt_style: Style::new().cyan().bold(),
    active_item_prefix: Style::new().green().apply_to("❯ ".to_string()),
    active_item_style: Style::new().green(),
    ..ColorfulTheme::default()
  }
}

/// Ask for a line of text, offering `current` as the default
pub fn prompt_text(prompt: &str, current: Option<&str>) -> Result<String> {
  let theme = jtk_theme();
  let mut input = Input::<String>::with_theme(&theme).with_prompt(prompt);
  if let Some(current) = current.filter(|value| !value.is_empty()) {
    input = input.default(current.to_string());
  }
  input.interact_text().with_context(|| format!("Failed to read {prompt}"))
}

/// Ask for a secret without echoing it
pub fn prompt_secret(prompt: &str) -> Result<String> {
  Password::with_theme(&jtk_theme())
    .with_prompt(prompt)
    .interact()
    .with_context(|| format!("Failed to read {prompt}"))
}

/// Ask a yes/no question; the default answer is no
pub fn prompt_confirm(prompt: &str) -> Result<bool> {
  Confirm::with_theme(&jtk_theme())
    .with_prompt(prompt)
    .default(false)
    .interact()
    .context("Failed to read confirmation")
}
