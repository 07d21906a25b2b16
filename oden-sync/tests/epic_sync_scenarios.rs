//! End-to-end sync scenarios against a scripted `gh` and `git`

use async_trait::async_trait;
use oden_sync::command::{CommandOutput, CommandRunner};
use oden_sync::test_utils::{issue_created, ScriptedCommandRunner, TestProject};
use oden_sync::{EpicSync, OdenSyncError, SyncOutcome, TaskDocument, TrackingIssue};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

const REMOTE: &str = "git@github.com:acme/widgets.git";

const LOGIN_TASK: &str = "---
name: Login form
epic: auth
work_stream: frontend
labels:
  - ui
  - forms
estimate: 3
---

# Login form

Build the login form with email and password fields.

## Acceptance

- [ ] validation errors shown inline
";

const SESSION_TASK: &str = "---
name: Session store
epic: auth
labels: [backend]
---

Persist sessions in redis.
";

fn sync_for(project: &TestProject, runner: &Arc<ScriptedCommandRunner>) -> EpicSync {
    EpicSync::with_runner(project.config(), runner.clone())
}

fn synced(outcome: SyncOutcome) -> oden_sync::sync::EpicSyncSummary {
    match outcome {
        SyncOutcome::Synced(summary) => summary,
        other => panic!("expected a completed sync, got {other:?}"),
    }
}

#[tokio::test]
async fn test_two_documents_create_two_issues_and_a_tracking_issue() {
    let project = TestProject::new();
    project.write_task("auth-task-1.md", LOGIN_TASK);
    project.write_task("auth-task-2.md", SESSION_TASK);

    let runner = Arc::new(ScriptedCommandRunner::github_project(REMOTE));
    runner
        .respond(&["issue", "create"], issue_created(10))
        .respond(&["issue", "create"], issue_created(11))
        .respond(&["issue", "create"], issue_created(12));

    let summary = synced(sync_for(&project, &runner).sync_epic("auth").await.unwrap());

    assert_eq!(summary.issues.len(), 2);
    assert_eq!(summary.repository.full_name(), "acme/widgets");
    assert_eq!(summary.tracking.number_display(), "12");

    let creates = runner.invocations_of(&["issue", "create"]);
    assert_eq!(creates.len(), 3);

    assert_eq!(creates[0].flag("--title"), Some("[auth] Login form"));
    assert_eq!(
        creates[0].labels(),
        vec!["oden-epic", "auth", "ui", "forms", "frontend"]
    );
    assert_eq!(creates[1].flag("--title"), Some("[auth] Session store"));
    assert_eq!(creates[1].labels(), vec!["oden-epic", "auth", "backend"]);

    let tracking = &creates[2];
    assert_eq!(tracking.flag("--title"), Some("[EPIC] auth"));
    assert_eq!(tracking.labels(), vec!["epic", "oden-epic", "auth"]);
    let body = tracking.body.as_deref().unwrap();
    let checklist: Vec<&str> = body.lines().filter(|l| l.starts_with("- [ ] #")).collect();
    assert_eq!(checklist, vec!["- [ ] #10: Login form", "- [ ] #11: Session store"]);

    for file in ["auth-task-1.md", "auth-task-2.md"] {
        let content = project.read_task(file);
        assert!(content.contains("sync_status: created"), "{file}: {content}");
    }
}

#[tokio::test]
async fn test_document_update_preserves_body_and_other_keys() {
    let project = TestProject::new();
    let path = project.write_task("auth-task-1.md", LOGIN_TASK);
    let before = TaskDocument::load(&path, "auth").unwrap();

    let runner = Arc::new(ScriptedCommandRunner::github_project(REMOTE));
    runner.respond(&["issue", "create"], issue_created(40));

    sync_for(&project, &runner).sync_epic("auth").await.unwrap();

    let after = TaskDocument::load(&path, "auth").unwrap();
    assert_eq!(after.body, before.body);
    assert_eq!(after.metadata.len(), before.metadata.len() + 5);
    for (key, value) in &before.metadata {
        assert_eq!(after.metadata.get(key), Some(value));
    }
    assert_eq!(after.github_issue(), Some(40));

    let content = project.read_task("auth-task-1.md");
    assert!(content.starts_with("---\nname: Login form\n"));
    assert!(content.ends_with("- [ ] validation errors shown inline\n"));
}

#[tokio::test]
async fn test_missing_remote_fails_before_discovery() {
    let project = TestProject::new();
    project.write_task("auth-task-1.md", LOGIN_TASK);

    let runner = Arc::new(ScriptedCommandRunner::new());
    runner
        .respond(&["auth", "status"], CommandOutput::success(""))
        .respond(
            &["remote", "get-url", "origin"],
            CommandOutput::failure(2, "error: No such remote 'origin'"),
        );

    let err = sync_for(&project, &runner)
        .sync_epic("auth")
        .await
        .unwrap_err();

    assert!(matches!(err, OdenSyncError::NoRemote));
    assert!(runner.invocations_of(&["issue"]).is_empty());
    assert!(!project.read_task("auth-task-1.md").contains("github_issue"));
}

#[tokio::test]
async fn test_one_failed_creation_does_not_stop_the_other() {
    let project = TestProject::new();
    project.write_task("auth-task-1.md", LOGIN_TASK);
    project.write_task("auth-task-2.md", SESSION_TASK);

    let runner = Arc::new(ScriptedCommandRunner::github_project(REMOTE));
    runner
        .respond(
            &["issue", "create"],
            CommandOutput::failure(1, "GraphQL: could not add label 'forms'"),
        )
        .respond(&["issue", "create"], issue_created(21))
        .respond(&["issue", "create"], issue_created(22));

    let summary = synced(sync_for(&project, &runner).sync_epic("auth").await.unwrap());

    assert_eq!(summary.issues.len(), 1);
    assert_eq!(summary.issues[0].title, "[auth] Session store");

    let text = SyncOutcome::Synced(summary).to_string();
    assert!(text.contains("- Task issues created: 1\n"));

    let tracking = runner.invocations_of(&["issue", "create"]).pop().unwrap();
    let body = tracking.body.unwrap();
    assert!(body.contains("- [ ] #21: Session store"));
    assert!(!body.contains("Login form"));

    assert!(!project.read_task("auth-task-1.md").contains("sync_status"));
    assert!(project.read_task("auth-task-2.md").contains("github_issue: 21"));
}

#[tokio::test]
async fn test_tracking_failure_reports_placeholder() {
    let project = TestProject::new();
    project.write_task("auth-task-1.md", SESSION_TASK);

    let runner = Arc::new(ScriptedCommandRunner::github_project(REMOTE));
    runner
        .respond(&["issue", "create"], issue_created(5))
        .respond(&["issue", "create"], CommandOutput::failure(1, "rate limited"));

    let summary = synced(sync_for(&project, &runner).sync_epic("auth").await.unwrap());

    assert_eq!(summary.tracking, TrackingIssue::Unavailable);
    let text = SyncOutcome::Synced(summary).to_string();
    assert!(text.contains("- Epic tracking issue: #?\n"));
    assert!(text.contains("🔗 Epic Issue: ?\n"));
}

#[tokio::test]
async fn test_unparsable_documents_are_skipped() {
    let project = TestProject::new();
    project.write_task("auth-task-1.md", "no front matter at all\n");
    project.write_task("auth-task-2.md", SESSION_TASK);

    let runner = Arc::new(ScriptedCommandRunner::github_project(REMOTE));
    runner
        .respond(&["issue", "create"], issue_created(1))
        .respond(&["issue", "create"], issue_created(2));

    let summary = synced(sync_for(&project, &runner).sync_epic("auth").await.unwrap());

    assert_eq!(summary.issues.len(), 1);
    assert_eq!(
        project.read_task("auth-task-1.md"),
        "no front matter at all\n"
    );
}

#[tokio::test]
async fn test_non_github_remote_is_rejected() {
    let project = TestProject::new();
    project.write_task("auth-task-1.md", SESSION_TASK);

    let runner = Arc::new(ScriptedCommandRunner::github_project(
        "https://gitlab.com/acme/widgets.git",
    ));

    let err = sync_for(&project, &runner)
        .sync_epic("auth")
        .await
        .unwrap_err();

    assert!(matches!(err, OdenSyncError::NotHostedTracker { .. }));
    assert_eq!(err.user_message(), "❌ Not a GitHub repository");
}

/// Turns a task document into a directory once the first issue is created,
/// so rewriting that document fails after discovery already read it.
struct BlockDocumentOnCreate {
    inner: Arc<ScriptedCommandRunner>,
    document: Mutex<Option<PathBuf>>,
}

#[async_trait]
impl CommandRunner for BlockDocumentOnCreate {
    async fn run(&self, program: &str, args: &[String]) -> CommandOutput {
        if args.starts_with(&["issue".to_string(), "create".to_string()]) {
            let pending = self.document.lock().unwrap().take();
            if let Some(path) = pending {
                std::fs::remove_file(&path).unwrap();
                std::fs::create_dir(&path).unwrap();
            }
        }
        self.inner.run(program, args).await
    }
}

#[tokio::test]
async fn test_unwritable_document_still_counts_its_issue() {
    let project = TestProject::new();
    let blocked = project.write_task("auth-task-1.md", LOGIN_TASK);
    project.write_task("auth-task-2.md", SESSION_TASK);

    let scripted = Arc::new(ScriptedCommandRunner::github_project(REMOTE));
    scripted
        .respond(&["issue", "create"], issue_created(30))
        .respond(&["issue", "create"], issue_created(31))
        .respond(&["issue", "create"], issue_created(32));
    let runner = Arc::new(BlockDocumentOnCreate {
        inner: scripted.clone(),
        document: Mutex::new(Some(blocked.clone())),
    });

    let summary = synced(
        EpicSync::with_runner(project.config(), runner)
            .sync_epic("auth")
            .await
            .unwrap(),
    );

    assert!(blocked.is_dir());
    assert_eq!(
        summary.issues.iter().map(|i| i.number).collect::<Vec<_>>(),
        vec![30, 31]
    );
    assert_eq!(summary.tracking.number_display(), "32");

    let creates = scripted.invocations_of(&["issue", "create"]);
    assert_eq!(creates.len(), 3);
    let body = creates[2].body.as_deref().unwrap();
    assert!(body.contains("- [ ] #30: Login form"));
    assert!(body.contains("- [ ] #31: Session store"));

    assert!(project.read_task("auth-task-2.md").contains("github_issue: 31"));
}
