//! # Configuration Management
//!
//! Locates the jtk configuration directory, reads and writes the credentials
//! file, and layers `JIRA_*` environment variables over it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{CONFIG_FILE_NAME, ENV_JIRA_API_TOKEN, ENV_JIRA_EMAIL, ENV_JIRA_URL};
use crate::url::normalize_base_url;

/// Represents the configuration directories for the jtk application
#[derive(Debug, Clone)]
pub struct ConfigDirs {
  pub config_dir: PathBuf,
}

impl ConfigDirs {
  /// Create a new ConfigDirs instance
  pub fn new() -> Result<Self> {
    let proj_dirs =
      ProjectDirs::from("com", "Open CLI Collective", "jtk").context("Failed to determine project directories")?;

    Ok(Self {
      config_dir: proj_dirs.config_dir().to_path_buf(),
    })
  }

  /// Get the config directory
  pub fn config_dir(&self) -> &PathBuf {
    &self.config_dir
  }

  /// Get the path to the credentials file
  pub fn config_path(&self) -> PathBuf {
    self.config_dir.join(CONFIG_FILE_NAME)
  }
}

/// Get the configuration directories
pub fn get_config_dirs() -> Result<ConfigDirs> {
  ConfigDirs::new()
}

/// Missing or unusable connection settings
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("Jira URL is not configured. Run 'jtk config set --url <URL>' or set {ENV_JIRA_URL}")]
  MissingUrl,
  #[error("Jira email is not configured. Run 'jtk config set --email <EMAIL>' or set {ENV_JIRA_EMAIL}")]
  MissingEmail,
  #[error("Jira API token is not configured. Run 'jtk config set --token <TOKEN>' or set {ENV_JIRA_API_TOKEN}")]
  MissingToken,
  #[error("Invalid Jira URL '{0}'")]
  InvalidUrl(String),
}

/// Connection settings as stored in `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JiraConfig {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub api_token: Option<String>,
}

/// Where a resolved setting came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
  Env,
  File,
  Unset,
}

impl ValueSource {
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Env => "env",
      Self::File => "config",
      Self::Unset => "-",
    }
  }
}

/// Validated settings ready to build a client from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JiraCredentials {
  pub url: String,
  pub email: String,
  pub api_token: String,
}

impl JiraConfig {
  /// Load the config file at `path`; a missing file yields an empty config
  pub fn load(path: &Path) -> Result<Self> {
    if !path.exists() {
      return Ok(Self::default());
    }

    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read config from {}", path.display()))?;

    toml::from_str(&content).with_context(|| format!("Failed to parse config from {}", path.display()))
  }

  /// Load from the default location
  pub fn load_default() -> Result<Self> {
    Self::load(&get_config_dirs()?.config_path())
  }

  /// Write the config to `path`, readable only by the owner on Unix
  pub fn save(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }

    let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
    fs::write(path, content).with_context(|| format!("Failed to write config to {}", path.display()))?;

    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .with_context(|| format!("Failed to restrict permissions on {}", path.display()))?;
    }

    Ok(())
  }

  /// Remove the config file at `path` if there is one
  pub fn clear(path: &Path) -> Result<bool> {
    if !path.exists() {
      return Ok(false);
    }
    fs::remove_file(path).with_context(|| format!("Failed to remove config {}", path.display()))?;
    Ok(true)
  }

  /// Overwrite fields that are set in `other`
  pub fn merge(self, other: Self) -> Self {
    Self {
      url: other.url.or(self.url),
      email: other.email.or(self.email),
      api_token: other.api_token.or(self.api_token),
    }
  }

  /// Settings from `JIRA_URL`, `JIRA_EMAIL` and `JIRA_API_TOKEN`; empty values count as unset
  pub fn from_env() -> Self {
    Self {
      url: non_empty_env(ENV_JIRA_URL),
      email: non_empty_env(ENV_JIRA_EMAIL),
      api_token: non_empty_env(ENV_JIRA_API_TOKEN),
    }
  }

  /// File settings with environment variables taking precedence
  pub fn resolve(self) -> Self {
    self.merge(Self::from_env())
  }

  /// Check that every setting is present and normalize the URL
  pub fn credentials(&self) -> Result<JiraCredentials, ConfigError> {
    let url = present(&self.url).ok_or(ConfigError::MissingUrl)?;
    let email = present(&self.email).ok_or(ConfigError::MissingEmail)?;
    let api_token = present(&self.api_token).ok_or(ConfigError::MissingToken)?;

    let url = normalize_base_url(url).map_err(|_| ConfigError::InvalidUrl(url.to_string()))?;

    Ok(JiraCredentials {
      url,
      email: email.to_string(),
      api_token: api_token.to_string(),
    })
  }
}

fn present(value: &Option<String>) -> Option<&str> {
  value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

fn non_empty_env(name: &str) -> Option<String> {
  std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Source of a setting given the file value and the environment variable name
pub fn value_source(env_name: &str, file_value: Option<&str>) -> ValueSource {
  if non_empty_env(env_name).is_some() {
    ValueSource::Env
  } else if file_value.is_some_and(|value| !value.is_empty()) {
    ValueSource::File
  } else {
    ValueSource::Unset
  }
}

/// Hide all but the edges of an API token
pub fn mask_token(token: &str) -> String {
  let chars: Vec<char> = token.chars().collect();
  if chars.is_empty() {
    String::new()
  } else if chars.len() > 8 {
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
  } else {
    "****".to_string()
  }
}

#[cfg(test)]
mod tests {
  use jtk_test_utils::{EnvTestGuard, JiraEnvGuard};
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_config_path_follows_xdg_config_home() {
    let env = EnvTestGuard::new();
    let config_dirs = ConfigDirs::new().unwrap();

    #[cfg(target_os = "linux")]
    assert!(config_dirs.config_dir().starts_with(env.config_dir()));
    assert!(config_dirs.config_path().ends_with(CONFIG_FILE_NAME));
    drop(env);
  }

  #[test]
  fn test_load_missing_file_is_empty() {
    let temp = TempDir::new().unwrap();
    let config = JiraConfig::load(&temp.path().join("config.toml")).unwrap();
    assert_eq!(config, JiraConfig::default());
  }

  #[test]
  fn test_save_and_load() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("config.toml");

    let config = JiraConfig {
      url: Some("https://acme.atlassian.net".to_string()),
      email: Some("dev@acme.io".to_string()),
      api_token: Some("secret-token".to_string()),
    };
    config.save(&path).unwrap();

    assert_eq!(JiraConfig::load(&path).unwrap(), config);

    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      let mode = fs::metadata(&path).unwrap().permissions().mode();
      assert_eq!(mode & 0o777, 0o600);
    }

    assert!(JiraConfig::clear(&path).unwrap());
    assert!(!JiraConfig::clear(&path).unwrap());
  }

  #[test]
  fn test_load_rejects_invalid_toml() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "url = [").unwrap();

    let error = JiraConfig::load(&path).unwrap_err();
    assert!(error.to_string().contains("Failed to parse config"));
  }

  #[test]
  fn test_merge_prefers_set_values() {
    let base = JiraConfig {
      url: Some("https://old.example".to_string()),
      email: Some("old@example.com".to_string()),
      api_token: None,
    };
    let update = JiraConfig {
      url: Some("https://new.example".to_string()),
      ..JiraConfig::default()
    };

    let merged = base.merge(update);
    assert_eq!(merged.url.as_deref(), Some("https://new.example"));
    assert_eq!(merged.email.as_deref(), Some("old@example.com"));
    assert!(merged.api_token.is_none());
  }

  #[test]
  fn test_env_overrides_file() {
    let env = JiraEnvGuard::new();
    env.set(ENV_JIRA_URL, "env.atlassian.net");
    env.set(ENV_JIRA_EMAIL, "");

    let file = JiraConfig {
      url: Some("https://file.atlassian.net".to_string()),
      email: Some("file@example.com".to_string()),
      api_token: Some("file-token".to_string()),
    };

    let resolved = file.resolve();
    assert_eq!(resolved.url.as_deref(), Some("env.atlassian.net"));
    assert_eq!(resolved.email.as_deref(), Some("file@example.com"));
    assert_eq!(value_source(ENV_JIRA_URL, Some("x")), ValueSource::Env);
    assert_eq!(value_source(ENV_JIRA_EMAIL, Some("x")), ValueSource::File);
    assert_eq!(value_source(ENV_JIRA_API_TOKEN, None), ValueSource::Unset);

    let credentials = resolved.credentials().unwrap();
    assert_eq!(credentials.url, "https://env.atlassian.net");
  }

  #[test]
  fn test_credentials_report_first_missing_setting() {
    let mut config = JiraConfig::default();
    assert_eq!(config.credentials(), Err(ConfigError::MissingUrl));

    config.url = Some("https://acme.atlassian.net/".to_string());
    assert_eq!(config.credentials(), Err(ConfigError::MissingEmail));

    config.email = Some("dev@acme.io".to_string());
    config.api_token = Some("   ".to_string());
    assert_eq!(config.credentials(), Err(ConfigError::MissingToken));

    config.api_token = Some("token".to_string());
    let credentials = config.credentials().unwrap();
    assert_eq!(credentials.url, "https://acme.atlassian.net");
  }

  #[test]
  fn test_mask_token() {
    assert_eq!(mask_token(""), "");
    assert_eq!(mask_token("short"), "****");
    assert_eq!(mask_token("ATATT3xFfGF0abcd1234"), "ATAT...1234");
  }
}
