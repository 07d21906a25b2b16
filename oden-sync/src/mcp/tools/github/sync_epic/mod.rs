//! Epic sync tool for MCP operations
//!
//! This module provides the SyncEpicTool for pushing an epic's task documents
//! to GitHub through the MCP protocol.

use crate::mcp::responses::{create_failure_response, create_success_response};
use crate::mcp::shared_utils::{McpErrorHandler, McpValidation};
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::types::SyncEpicRequest;
use crate::sync::SyncOperation;
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;

/// Tool for syncing an epic's tasks to GitHub issues
#[derive(Default)]
pub struct SyncEpicTool;

impl SyncEpicTool {
    /// Creates a new instance of the SyncEpicTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for SyncEpicTool {
    fn name(&self) -> &'static str {
        "sync_epic_to_github"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "epic_name": {
                    "type": "string",
                    "description": "Name of the epic to sync"
                }
            },
            "required": ["epic_name"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: SyncEpicRequest = BaseToolImpl::parse_arguments(arguments)?;

        McpValidation::validate_not_empty(&request.epic_name, "epic name")
            .map_err(|e| McpErrorHandler::handle_error(e, "validate epic name"))?;
        let epic = request.epic_name.trim();

        tracing::debug!("Syncing epic '{}' to GitHub", epic);

        match context.sync.sync_epic(epic).await {
            Ok(outcome) => Ok(create_success_response(outcome.to_string())),
            Err(e) => Ok(create_failure_response(SyncOperation::SyncEpic, &e)),
        }
    }
}
