//! Constants for the jtk-jira client.

/// User-Agent header value for the Jira API client
pub const USER_AGENT: &str = concat!("jtk/", env!("CARGO_PKG_VERSION"));

/// Path prefix of the Jira Cloud REST API (v3 speaks ADF)
pub const API_PATH: &str = "/rest/api/3";
