use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "oden-sync")]
#[command(version)]
#[command(about = "An MCP server that syncs Oden task documents to GitHub Issues")]
#[command(long_about = "
oden-sync is an MCP (Model Context Protocol) server that pushes markdown task
documents to GitHub Issues through the authenticated gh CLI. The same
operations can be run directly from a terminal.

Example usage:
  oden-sync serve         # Run as MCP server
  oden-sync status        # Check gh authentication and the target repository
  oden-sync sync auth     # Create issues for every auth-task-*.md document
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Project root containing the tasks directory and the git checkout
    #[arg(long, global = true, value_name = "DIR")]
    pub project_root: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run as MCP server on stdio
    #[command(long_about = "
Runs oden-sync as an MCP server on stdin/stdout. The server exposes three
tools: sync_epic_to_github, check_github_status and create_single_issue.
It stops on Ctrl-C or when the client disconnects.

Example:
  oden-sync serve
  # Or configure it in your MCP client's server settings
")]
    Serve,
    /// Show GitHub CLI authentication and repository status
    #[command(long_about = "
Checks whether gh is authenticated, which GitHub repository the origin
remote points at, and how many issues labelled oden-epic already exist.

Example:
  oden-sync status
")]
    Status,
    /// Sync every task of an epic to GitHub Issues
    #[command(long_about = "
Creates one GitHub issue per <EPIC>-task-*.md document, writes the issue
number and URL back into each document, and opens an [EPIC] tracking issue.

Exit codes:
  0 - Sync completed (including when no tasks were found)
  1 - gh not authenticated, or the repository could not be resolved
  2 - Configuration or startup failure

Example:
  oden-sync sync auth
")]
    Sync {
        /// Epic whose task documents are synced
        epic: String,
    },
    /// Create a single GitHub issue
    #[command(long_about = "
Creates one issue in the repository behind the origin remote.

Examples:
  oden-sync create --title \"Fix login\" --body \"Steps to reproduce...\"
  oden-sync create --title \"Fix login\" --body-file notes.md --label bug --label auth
")]
    #[command(group(ArgGroup::new("content").required(true).args(["body", "body_file"])))]
    Create {
        /// Issue title
        #[arg(long)]
        title: String,

        /// Markdown body
        #[arg(long)]
        body: Option<String>,

        /// Read the markdown body from a file
        #[arg(long, value_name = "FILE")]
        body_file: Option<PathBuf>,

        /// Label to attach (repeatable)
        #[arg(long = "label", value_name = "LABEL")]
        labels: Vec<String>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn try_parse_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(args)
    }
}
