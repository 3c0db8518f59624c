//! Core constants shared across jtk components.

/// Environment variable overriding the configured Jira URL.
pub const ENV_JIRA_URL: &str = "JIRA_URL";

/// Environment variable overriding the configured account email.
pub const ENV_JIRA_EMAIL: &str = "JIRA_EMAIL";

/// Environment variable overriding the configured API token.
pub const ENV_JIRA_API_TOKEN: &str = "JIRA_API_TOKEN";

/// Name of the settings file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";
