//! Request types for MCP operations

use serde::Deserialize;

/// Request to push every task of an epic to GitHub
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SyncEpicRequest {
    /// Epic whose `<epic>-task-*.md` documents are synced
    pub epic_name: String,
}

/// Request to report GitHub connectivity
#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct CheckStatusRequest {
    // No parameters needed
}

/// Request to create one issue
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateSingleIssueRequest {
    /// Issue title
    pub title: String,
    /// Markdown body of the issue
    pub body: String,
    /// Labels to attach; absent and `null` both mean none
    #[serde(default)]
    pub labels: Option<Vec<String>>,
}
