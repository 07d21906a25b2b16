//! Runners for the one-shot subcommands
//!
//! Each runner returns the text the equivalent MCP tool would answer with.
//! Failures carry the same text and an exit code.

use crate::error::{CliError, CliResult, IntoCliResult};
use oden_sync::sync::issue_created_text;
use oden_sync::{EpicSync, ErrorContext, SyncOperation};
use std::path::Path;

/// Report `gh` authentication, the target repository and existing issues
pub async fn run_status(sync: &EpicSync) -> CliResult<String> {
    Ok(sync.check_status().await.to_string())
}

/// Sync every task document of `epic`
pub async fn run_sync(sync: &EpicSync, epic: &str) -> CliResult<String> {
    let epic = epic.trim();
    if epic.is_empty() {
        return Err(CliError::operation("Epic name cannot be empty"));
    }

    match sync.sync_epic(epic).await {
        Ok(outcome) => Ok(outcome.to_string()),
        Err(e) => {
            tracing::error!("Sync of epic '{}' failed: {}", epic, e);
            Err(CliError::operation(SyncOperation::SyncEpic.failure_text(&e)))
        }
    }
}

/// Create one issue from explicit fields
pub async fn run_create(
    sync: &EpicSync,
    title: &str,
    body: &str,
    labels: Vec<String>,
) -> CliResult<String> {
    if title.trim().is_empty() {
        return Err(CliError::operation("Issue title cannot be empty"));
    }

    match sync.create_single_issue(title, body, labels).await {
        Ok(issue) => Ok(issue_created_text(&issue)),
        Err(e) => {
            tracing::error!("Creating issue '{}' failed: {}", title, e);
            Err(CliError::operation(
                SyncOperation::CreateIssue.failure_text(&e),
            ))
        }
    }
}

/// Resolve the issue body from `--body` or `--body-file`
pub fn read_body(body: Option<String>, body_file: Option<&Path>) -> CliResult<String> {
    match (body, body_file) {
        (Some(body), _) => Ok(body),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read body file {}", path.display()))
            .cli_startup_error(),
        (None, None) => Ok(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes::{EXIT_ERROR, EXIT_WARNING};
    use oden_sync::command::CommandOutput;
    use oden_sync::test_utils::{issue_created, ScriptedCommandRunner, TestProject};
    use std::sync::Arc;

    const REMOTE: &str = "git@github.com:acme/widgets.git";

    fn sync_for(project: &TestProject, runner: &Arc<ScriptedCommandRunner>) -> EpicSync {
        EpicSync::with_runner(project.config(), runner.clone())
    }

    #[tokio::test]
    async fn test_status_never_fails() {
        let project = TestProject::new();
        let runner = Arc::new(ScriptedCommandRunner::new());

        let text = run_status(&sync_for(&project, &runner)).await.unwrap();

        assert!(text.contains("🔐 Authentication: ❌ Not authenticated"));
        assert!(text.contains("📁 Repository: Not found"));
    }

    #[tokio::test]
    async fn test_sync_without_tasks_succeeds() {
        let project = TestProject::new();
        let runner = Arc::new(ScriptedCommandRunner::github_project(REMOTE));

        let text = run_sync(&sync_for(&project, &runner), " billing ")
            .await
            .unwrap();

        assert_eq!(
            text,
            "No tasks found for epic 'billing'. Run /oden:tasks billing first."
        );
    }

    #[tokio::test]
    async fn test_sync_unauthenticated_is_an_operation_error() {
        let project = TestProject::new();
        let runner = Arc::new(ScriptedCommandRunner::new());
        runner.respond(
            &["auth", "status"],
            CommandOutput::failure(1, "You are not logged into any GitHub hosts"),
        );

        let err = run_sync(&sync_for(&project, &runner), "auth")
            .await
            .unwrap_err();

        assert_eq!(err.exit_code, EXIT_WARNING);
        assert_eq!(
            err.message,
            "❌ GitHub CLI not authenticated. Run: gh auth login"
        );
    }

    #[tokio::test]
    async fn test_sync_rejects_blank_epic() {
        let project = TestProject::new();
        let runner = Arc::new(ScriptedCommandRunner::new());

        let err = run_sync(&sync_for(&project, &runner), "   ")
            .await
            .unwrap_err();

        assert_eq!(err.exit_code, EXIT_WARNING);
        assert!(runner.invocations().is_empty());
    }

    #[tokio::test]
    async fn test_create_reports_issue_url() {
        let project = TestProject::new();
        let runner = Arc::new(ScriptedCommandRunner::github_project(REMOTE));
        runner.respond(&["issue", "create"], issue_created(8));

        let text = run_create(
            &sync_for(&project, &runner),
            "Fix login",
            "Steps",
            vec!["bug".to_string()],
        )
        .await
        .unwrap();

        assert_eq!(
            text,
            "✅ Issue created: #8\n🔗 https://github.com/acme/widgets/issues/8"
        );
    }

    #[tokio::test]
    async fn test_create_failure_carries_gh_stderr() {
        let project = TestProject::new();
        let runner = Arc::new(ScriptedCommandRunner::github_project(REMOTE));
        runner.respond(
            &["issue", "create"],
            CommandOutput::failure(1, "HTTP 422: label does not exist\n"),
        );

        let err = run_create(&sync_for(&project, &runner), "Fix", "", Vec::new())
            .await
            .unwrap_err();

        assert_eq!(
            err.message,
            "❌ Failed to create issue: HTTP 422: label does not exist"
        );
    }

    #[test]
    fn test_read_body_prefers_inline_text() {
        assert_eq!(read_body(Some("inline".into()), None).unwrap(), "inline");
        assert_eq!(read_body(None, None).unwrap(), "");
    }

    #[test]
    fn test_read_body_from_file() {
        let project = TestProject::new();
        let path = project.root().join("notes.md");
        std::fs::write(&path, "## Steps\n\n1. open login\n").unwrap();

        assert_eq!(
            read_body(None, Some(&path)).unwrap(),
            "## Steps\n\n1. open login\n"
        );
    }

    #[test]
    fn test_read_body_missing_file_is_startup_error() {
        let project = TestProject::new();
        let path = project.root().join("missing.md");

        let err = read_body(None, Some(&path)).unwrap_err();

        assert_eq!(err.exit_code, EXIT_ERROR);
        assert!(err.message.starts_with("Failed to read body file"));
        assert!(err.full_chain().contains("Caused by:"));
    }
}
