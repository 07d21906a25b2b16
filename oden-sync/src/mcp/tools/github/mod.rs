//! GitHub sync tools for MCP operations
//!
//! Each tool is in its own submodule with a dedicated implementation and
//! description.

pub mod check_status;
pub mod create_issue;
pub mod sync_epic;

use crate::mcp::tool_registry::ToolRegistry;

/// Register all GitHub sync tools with the registry
pub fn register_github_tools(registry: &mut ToolRegistry) {
    registry.register(sync_epic::SyncEpicTool::new());
    registry.register(check_status::CheckStatusTool::new());
    registry.register(create_issue::CreateSingleIssueTool::new());
}
