//! oden-sync CLI library
//!
//! Command-line definitions, command runners, logging setup and exit codes
//! behind the `oden-sync` binary.

/// Command-line interface definitions and argument parsing
pub mod cli;
/// Runners for the `status`, `sync` and `create` subcommands
pub mod commands;
/// Error type carrying an exit code
pub mod error;
/// Exit codes used by the CLI application
pub mod exit_codes;
/// Log writer used in MCP mode
pub mod logging;
