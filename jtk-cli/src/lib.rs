//! # jtk CLI Library
//!
//! Command tree, client construction and output rendering for the jtk
//! command-line tool.

#![allow(clippy::print_stdout, clippy::print_stderr)]

pub mod cli;
pub mod clients;
pub mod completion;
pub mod render;
