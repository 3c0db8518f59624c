//! # Jira API Endpoints
//!
//! Organized endpoint implementations for different Jira API resource types:
//! issues, comments, fields and workflow transitions.

pub mod comments;
pub mod fields;
pub mod issues;
pub mod transitions;
