//! URL helpers shared across crates.
//!
//! Users type Jira locations in many shapes (`acme.atlassian.net`,
//! `https://acme.atlassian.net/`, `http:/jira.local`); everything is reduced
//! to `scheme://host[:port][/path]` without a trailing slash.

use anyhow::{Result, bail};
use url::{Position, Url};

/// Parse a user supplied Jira location, assuming `https://` when no scheme is given.
///
/// A mangled `http:/host` or `https:host` prefix is treated as missing.
pub fn ensure_url_scheme(input: &str) -> Result<Url> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    bail!("Host cannot be empty");
  }

  if let Ok(url) = Url::parse(trimmed)
    && url.host().is_some()
    && trimmed.contains("://")
  {
    return Ok(url);
  }

  let without_scheme = strip_partial_scheme(trimmed);
  match Url::parse(&format!("https://{without_scheme}")) {
    Ok(url) if url.host().is_some() => Ok(url),
    _ => bail!("Failed to parse URL: '{input}'. Ensure it has a valid scheme."),
  }
}

fn strip_partial_scheme(input: &str) -> &str {
  let Some((scheme, rest)) = input.split_once(':') else {
    return input;
  };
  if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") {
    rest.trim_start_matches('/')
  } else {
    input
  }
}

/// Normalize a Jira base URL: scheme added, trailing slashes, query and fragment dropped
pub fn normalize_base_url(input: &str) -> Result<String> {
  let url = ensure_url_scheme(input)?;
  let base = &url[..Position::AfterPath];
  Ok(base.trim_end_matches('/').to_string())
}
