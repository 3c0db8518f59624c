//! Environment variable management for testing
//!
//! Guards that point XDG directories at a per-test temporary directory and
//! isolate the `JIRA_*` connection variables, restoring everything on drop.

use std::env;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tempfile::TempDir;

/// A test environment that overrides the XDG config directory to use a
/// per-test temporary directory
pub struct EnvTestGuard {
  /// The temporary directory that will be used for XDG directories
  pub temp_dir: TempDir,
  /// The original XDG_CONFIG_HOME value, if any
  original_config_home: Option<String>,
}

impl Default for EnvTestGuard {
  fn default() -> Self {
    Self::new()
  }
}

impl EnvTestGuard {
  pub const XDG_CONFIG_HOME: &'static str = "XDG_CONFIG_HOME";

  /// Create a new test environment with an overridden XDG config directory
  pub fn new() -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let original_config_home = env::var(Self::XDG_CONFIG_HOME).ok();

    let config_dir = temp_dir.path().join("config");
    std::fs::create_dir_all(&config_dir).expect("Failed to create config directory");
    // SAFETY: test-only; callers accept that env mutation is process-wide
    unsafe {
      env::set_var(Self::XDG_CONFIG_HOME, &config_dir);
    }

    Self {
      temp_dir,
      original_config_home,
    }
  }

  /// Get the path to the XDG config directory
  pub fn config_dir(&self) -> PathBuf {
    self.temp_dir.path().join("config")
  }
}

impl Drop for EnvTestGuard {
  fn drop(&mut self) {
    restore(Self::XDG_CONFIG_HOME, self.original_config_home.as_deref());
  }
}

static JIRA_ENV_LOCK: Mutex<()> = Mutex::new(());

/// Clears the Jira connection variables for the lifetime of the guard.
///
/// Guards are serialized through a process-wide lock, so tests holding one
/// never observe each other's variables.
pub struct JiraEnvGuard {
  originals: Vec<(&'static str, Option<String>)>,
  _lock: MutexGuard<'static, ()>,
}

impl Default for JiraEnvGuard {
  fn default() -> Self {
    Self::new()
  }
}

impl JiraEnvGuard {
  pub const VARS: [&'static str; 3] = ["JIRA_URL", "JIRA_EMAIL", "JIRA_API_TOKEN"];

  pub fn new() -> Self {
    let lock = JIRA_ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let originals = Self::VARS
      .iter()
      .map(|name| (*name, env::var(name).ok()))
      .collect();
    for name in Self::VARS {
      restore(name, None);
    }
    Self {
      originals,
      _lock: lock,
    }
  }

  /// Set one of the variables for the rest of the test
  pub fn set(&self, name: &str, value: &str) {
    // SAFETY: test-only; callers accept that env mutation is process-wide
    unsafe {
      env::set_var(name, value);
    }
  }
}

impl Drop for JiraEnvGuard {
  fn drop(&mut self) {
    for (name, value) in &self.originals {
      restore(name, value.as_deref());
    }
  }
}

fn restore(name: &str, value: Option<&str>) {
  // SAFETY: test-only; callers accept that env mutation is process-wide
  unsafe {
    match value {
      Some(value) => env::set_var(name, value),
      None => env::remove_var(name),
    }
  }
}
