//! # oden-sync
//!
//! Synchronizes markdown task documents with GitHub Issues.
//!
//! ## Features
//!
//! - **Epic Sync**: Create one issue per task document plus an epic tracking issue
//! - **Front Matter Updates**: Record issue numbers and URLs back into each document
//! - **Status Checks**: Report `gh` authentication, target repository and existing issues
//! - **MCP Support**: Model Context Protocol server exposing the above as tools
//!
//! All tracker access goes through the authenticated `gh` command-line client;
//! the target repository is derived from the project's `origin` remote.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use oden_sync::{Config, EpicSync};
//!
//! # async fn run() -> oden_sync::Result<()> {
//! let sync = EpicSync::new(Config::new());
//!
//! println!("{}", sync.check_status().await);
//! println!("{}", sync.sync_epic("auth").await?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// External command execution policy
pub mod command;

/// Shared helpers
pub mod common;

/// Runtime configuration
pub mod config;

/// Error types used throughout the library
pub mod error;

/// Repository resolution from the git remote
pub mod git;

/// GitHub issue creation and listing through `gh`
pub mod github;

/// Model Context Protocol (MCP) server support
pub mod mcp;

/// The sync orchestrator
pub mod sync;

/// Task documents and discovery
pub mod tasks;

pub use command::{CommandOutput, CommandRunner, SystemCommandRunner};
pub use config::Config;
pub use error::{ErrorChainExt, ErrorContext, OdenSyncError, Result};
pub use git::{GitOperations, RepositoryRef};
pub use github::{GitHubCli, IssueRecord, IssueSource, TrackingIssue};
pub use sync::{EpicSync, StatusReport, SyncOperation, SyncOutcome};
pub use tasks::{TaskDiscovery, TaskDocument};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::mcp::McpServer;
    pub use crate::{
        Config, EpicSync, IssueRecord, OdenSyncError, RepositoryRef, Result, SyncOperation,
        SyncOutcome, TaskDocument,
    };
}

/// Test utilities module for testing support
#[doc(hidden)]
pub mod test_utils;
