//! # Convert Command
//!
//! Offline access to the rich-text pipeline: the same conversions jtk applies
//! to descriptions and comments, without contacting Jira.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand, ValueEnum};
use jtk_core::OutputFormat;
use jtk_jira::adf::{Document, TextFormat, convert_text, is_wiki_markup, wiki_to_markdown};
use serde_json::json;

use crate::render::print_json;

/// Command for offline conversions
#[derive(Args)]
pub struct ConvertArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: ConvertSubcommands,
}

/// Source markup accepted by `convert markdown`
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceFormat {
  /// Detect Jira wiki markup, otherwise Markdown
  #[default]
  Auto,
  Markdown,
  Wiki,
}

impl From<SourceFormat> for TextFormat {
  fn from(format: SourceFormat) -> Self {
    match format {
      SourceFormat::Auto => TextFormat::Auto,
      SourceFormat::Markdown => TextFormat::Markdown,
      SourceFormat::Wiki => TextFormat::Wiki,
    }
  }
}

/// Subcommands for the convert command
#[derive(Subcommand)]
pub enum ConvertSubcommands {
  /// Convert Markdown (or detected wiki markup) to an ADF document
  #[command(alias = "adf")]
  Markdown {
    /// File to read, or '-' for standard input
    input: Option<PathBuf>,

    /// Markup of the input
    #[arg(long, value_enum, ignore_case = true, default_value_t = SourceFormat::Auto)]
    from: SourceFormat,
  },

  /// Transcode Jira wiki markup to Markdown
  Wiki {
    /// File to read, or '-' for standard input
    input: Option<PathBuf>,
  },

  /// Report whether the input looks like Jira wiki markup
  Detect {
    /// File to read, or '-' for standard input
    input: Option<PathBuf>,
  },

  /// Extract plain text from an ADF document
  Text {
    /// File to read, or '-' for standard input
    input: Option<PathBuf>,
  },
}

pub(crate) fn handle_convert_command(convert: ConvertArgs, output: OutputFormat) -> Result<()> {
  match convert.subcommand {
    ConvertSubcommands::Markdown { input, from } => {
      let text = read_input(input.as_deref())?;
      let Some(doc) = convert_text(&text, from.into()) else {
        bail!("Nothing to convert: input is empty");
      };

      match output {
        OutputFormat::Plain => println!("{}", serde_json::to_string(&doc).context("Failed to serialize document")?),
        OutputFormat::Json | OutputFormat::Table => print_json(&doc)?,
      }
    }
    ConvertSubcommands::Wiki { input } => {
      let markdown = wiki_to_markdown(&read_input(input.as_deref())?);
      match output {
        OutputFormat::Json => print_json(&json!({ "markdown": markdown }))?,
        OutputFormat::Plain | OutputFormat::Table => print_text(&markdown),
      }
    }
    ConvertSubcommands::Detect { input } => {
      let format = detected_format(&read_input(input.as_deref())?);
      match output {
        OutputFormat::Json => print_json(&json!({ "format": format }))?,
        OutputFormat::Plain | OutputFormat::Table => println!("{format}"),
      }
    }
    ConvertSubcommands::Text { input } => {
      let text = document_text(&read_input(input.as_deref())?)?;
      match output {
        OutputFormat::Json => print_json(&json!({ "text": text }))?,
        OutputFormat::Plain | OutputFormat::Table => print_text(&text),
      }
    }
  }

  Ok(())
}

/// Read a file, or standard input when `input` is absent or `-`
fn read_input(input: Option<&Path>) -> Result<String> {
  match input {
    Some(path) if path != Path::new("-") => {
      fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    }
    _ => {
      let mut buffer = String::new();
      io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read standard input")?;
      Ok(buffer)
    }
  }
}

fn detected_format(text: &str) -> &'static str {
  if is_wiki_markup(text) { "wiki" } else { "markdown" }
}

/// Plain text of a serialized ADF document
fn document_text(json: &str) -> Result<String> {
  let doc: Document = serde_json::from_str(json).context("Input is not a valid ADF document")?;
  Ok(doc.to_plain_text())
}

fn print_text(text: &str) {
  if text.ends_with('\n') {
    print!("{text}");
  } else {
    println!("{text}");
  }
}
