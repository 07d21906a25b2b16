//! GitHub status tool for MCP operations

use crate::mcp::responses::create_success_response;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::types::CheckStatusRequest;
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;

/// Tool reporting authentication, repository and existing issue state
#[derive(Default)]
pub struct CheckStatusTool;

impl CheckStatusTool {
    /// Creates a new instance of the CheckStatusTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for CheckStatusTool {
    fn name(&self) -> &'static str {
        "check_github_status"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let _request: CheckStatusRequest = BaseToolImpl::parse_arguments(arguments)?;

        let report = context.sync.check_status().await;
        Ok(create_success_response(report.to_string()))
    }
}
