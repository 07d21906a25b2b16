//! Single issue creation tool for MCP operations

use crate::mcp::responses::{create_failure_response, create_success_response};
use crate::mcp::shared_utils::{McpErrorHandler, McpValidation};
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::types::CreateSingleIssueRequest;
use crate::sync::{issue_created_text, SyncOperation};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;

/// Tool for creating one issue from explicit fields
#[derive(Default)]
pub struct CreateSingleIssueTool;

impl CreateSingleIssueTool {
    /// Creates a new instance of the CreateSingleIssueTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for CreateSingleIssueTool {
    fn name(&self) -> &'static str {
        "create_single_issue"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "Issue title"
                },
                "body": {
                    "type": "string",
                    "description": "Markdown body of the issue"
                },
                "labels": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Labels to attach"
                }
            },
            "required": ["title", "body"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: CreateSingleIssueRequest = BaseToolImpl::parse_arguments(arguments)?;

        McpValidation::validate_not_empty(&request.title, "issue title")
            .map_err(|e| McpErrorHandler::handle_error(e, "validate issue title"))?;

        tracing::debug!("Creating issue: {}", request.title);

        match context
            .sync
            .create_single_issue(
                &request.title,
                &request.body,
                request.labels.unwrap_or_default(),
            )
            .await
        {
            Ok(issue) => Ok(create_success_response(issue_created_text(&issue))),
            Err(e) => Ok(create_failure_response(SyncOperation::CreateIssue, &e)),
        }
    }
}
