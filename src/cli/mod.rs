//! CLI module for minisql
//!
//! Parses arguments, resolves configuration and writes each statement's
//! result (or explain plan) to stdout.

mod args;
mod commands;
mod io;

pub use args::Cli;
pub use commands::{resolve_config, run, run_statements};
pub use io::{write_explain, write_result};
