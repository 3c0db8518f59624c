//! # Shell Completion
//!
//! Generates shell completion scripts for the jtk command tree.

use std::io::Write;

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::Cli;

/// Write the completion script for `shell` to `out`
pub fn generate_completions(shell: Shell, out: &mut dyn Write) -> Result<()> {
  let mut cmd = Cli::command();
  let app_name = cmd.get_name().to_string();

  generate(shell, &mut cmd, app_name, out);

  Ok(())
}

#[cfg(test)]
mod tests {
  use clap_complete::Shell;

  use super::generate_completions;

  #[test]
  fn test_generate_completions_succeeds() {
    let shells = [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell];

    for shell in shells {
      let mut out = Vec::new();
      let result = generate_completions(shell, &mut out);
      assert!(result.is_ok(), "Failed to generate completions for {shell:?}");
      assert!(!out.is_empty());
    }
  }

  #[test]
  fn test_bash_completion_mentions_subcommands() {
    let mut out = Vec::new();
    generate_completions(Shell::Bash, &mut out).unwrap();
    let script = String::from_utf8(out).unwrap();
    assert!(script.contains("jtk"));
    assert!(script.contains("transitions"));
    assert!(script.contains("convert"));
  }
}
