//! Shared utilities for MCP operations
//!
//! This module provides common functionality used across MCP tool handlers
//! to keep argument validation and error mapping consistent.

use crate::{OdenSyncError, Result};
use rmcp::Error as McpError;

/// Common error handling patterns for MCP operations
pub struct McpErrorHandler;

impl McpErrorHandler {
    /// Convert an [`OdenSyncError`] to an MCP protocol error
    ///
    /// Rejected arguments map to `invalid_params`; anything else is an
    /// internal error. Failures the caller should read as tool output go
    /// through [`crate::mcp::responses::create_failure_response`] instead.
    pub fn handle_error(error: OdenSyncError, operation: &str) -> McpError {
        tracing::error!("MCP operation '{}' failed: {}", operation, error);

        match error {
            OdenSyncError::Other(msg) => McpError::invalid_params(msg, None),
            other => McpError::internal_error(other.to_string(), None),
        }
    }
}

/// Validation utilities for MCP requests
pub struct McpValidation;

impl McpValidation {
    /// Validate string is not empty
    pub fn validate_not_empty(value: &str, field: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(OdenSyncError::Other(format!(
                "{} cannot be empty",
                Self::capitalize_first_letter(field)
            )));
        }
        Ok(())
    }

    fn capitalize_first_letter(s: &str) -> String {
        let mut chars = s.chars();
        match chars.next() {
            None => String::new(),
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_not_empty() {
        assert!(McpValidation::validate_not_empty("auth", "epic name").is_ok());
        assert!(McpValidation::validate_not_empty("", "epic name").is_err());

        let err = McpValidation::validate_not_empty("   ", "epic name").unwrap_err();
        assert_eq!(err.to_string(), "Epic name cannot be empty");
    }

    #[test]
    fn test_error_mapping() {
        let err = McpErrorHandler::handle_error(
            OdenSyncError::Other("Title cannot be empty".into()),
            "validate title",
        );
        assert_eq!(err.message, "Title cannot be empty");

        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);

        let err = McpErrorHandler::handle_error(OdenSyncError::NoRemote, "resolve repository");
        assert_eq!(err.code, rmcp::model::ErrorCode::INTERNAL_ERROR);
        assert_eq!(err.message, "No git remote origin found");
    }
}
