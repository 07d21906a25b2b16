//! Response creation utilities for MCP operations

use crate::sync::SyncOperation;
use crate::OdenSyncError;
use rmcp::model::*;

/// Create a success response for MCP tool calls
pub fn create_success_response(message: String) -> CallToolResult {
    CallToolResult {
        content: vec![Annotated::new(
            RawContent::Text(RawTextContent { text: message }),
            None,
        )],
        is_error: Some(false),
    }
}

/// Create an error response for MCP tool calls
pub fn create_error_response(message: String) -> CallToolResult {
    CallToolResult {
        content: vec![Annotated::new(
            RawContent::Text(RawTextContent { text: message }),
            None,
        )],
        is_error: Some(true),
    }
}

/// Create the error response for `operation` failing with `error`
pub fn create_failure_response(operation: SyncOperation, error: &OdenSyncError) -> CallToolResult {
    tracing::error!("{:?} failed: {}", operation, error);
    create_error_response(operation.failure_text(error))
}

/// Text of the first content item of a tool result
pub fn response_text(result: &CallToolResult) -> Option<&str> {
    result.content.first().and_then(|content| match &content.raw {
        RawContent::Text(text) => Some(text.text.as_str()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_and_error_flags() {
        let ok = create_success_response("done".to_string());
        assert_eq!(ok.is_error, Some(false));
        assert_eq!(response_text(&ok), Some("done"));

        let err = create_error_response("broken".to_string());
        assert_eq!(err.is_error, Some(true));
        assert_eq!(response_text(&err), Some("broken"));
    }

    #[test]
    fn test_failure_response_uses_operation_wording() {
        let response =
            create_failure_response(SyncOperation::SyncEpic, &OdenSyncError::Authentication);

        assert_eq!(response.is_error, Some(true));
        assert_eq!(
            response_text(&response),
            Some("❌ GitHub CLI not authenticated. Run: gh auth login")
        );
    }
}
