//! Model Context Protocol (MCP) server support
//!
//! This module serves the GitHub sync operations as MCP tools over stdio.

pub mod responses;
pub mod server;
pub mod shared_utils;
pub mod tool_registry;
pub mod tools;
pub mod types;


pub use server::{McpServer, SERVER_NAME};
pub use tool_registry::{register_github_tools, McpTool, ToolContext, ToolRegistry};
pub use types::{CheckStatusRequest, CreateSingleIssueRequest, SyncEpicRequest};
