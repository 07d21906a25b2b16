//! MCP server implementation for the GitHub sync tools

use crate::config::Config;
use crate::sync::EpicSync;
use rmcp::model::*;
use rmcp::service::RequestContext;
use rmcp::{Error as McpError, RoleServer, ServerHandler};
use std::sync::Arc;

use super::tool_registry::{register_github_tools, ToolContext, ToolRegistry};

/// Name the server reports to MCP clients
pub const SERVER_NAME: &str = "oden-github-sync";

const INSTRUCTIONS: &str = "Synchronizes Oden task documents with GitHub Issues through the authenticated gh CLI. Use sync_epic_to_github to create one issue per task of an epic plus an epic tracking issue, check_github_status to verify authentication and the target repository, and create_single_issue to open an individual issue.";

/// MCP server exposing the GitHub sync tools
#[derive(Clone)]
pub struct McpServer {
    tool_registry: Arc<ToolRegistry>,
    /// Tool context containing shared state for tool execution
    pub tool_context: Arc<ToolContext>,
}

impl McpServer {
    /// Create a server running real `gh` and `git` processes
    pub fn new(config: Config) -> Self {
        Self::with_sync(EpicSync::new(config))
    }

    /// Create a server around an existing orchestrator
    pub fn with_sync(sync: EpicSync) -> Self {
        tracing::debug!(
            "Serving project {}",
            sync.config().project_root.display()
        );

        let mut tool_registry = ToolRegistry::new();
        register_github_tools(&mut tool_registry);

        Self {
            tool_registry: Arc::new(tool_registry),
            tool_context: Arc::new(ToolContext::new(Arc::new(sync))),
        }
    }

    /// Tools advertised to clients
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tool_registry.list_tools()
    }

    /// Run a tool by name
    pub async fn execute_tool(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> std::result::Result<CallToolResult, McpError> {
        match self.tool_registry.get_tool(name) {
            Some(tool) => {
                tool.execute(arguments.unwrap_or_default(), &self.tool_context)
                    .await
            }
            None => Err(McpError::invalid_request(
                format!("Unknown tool: {name}"),
                None,
            )),
        }
    }

    fn capabilities() -> ServerCapabilities {
        ServerCapabilities {
            prompts: None,
            tools: Some(ToolsCapability {
                list_changed: Some(false),
            }),
            resources: None,
            logging: None,
            completions: None,
            experimental: None,
        }
    }
}

impl ServerHandler for McpServer {
    async fn initialize(
        &self,
        request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<InitializeResult, McpError> {
        tracing::info!(
            "MCP client connecting: {} v{}",
            request.client_info.name,
            request.client_info.version
        );

        Ok(self.get_info())
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_registry.list_tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        self.execute_tool(&request.name, request.arguments).await
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: Self::capabilities(),
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: crate::VERSION.into(),
            },
            instructions: Some(INSTRUCTIONS.into()),
        }
    }
}
