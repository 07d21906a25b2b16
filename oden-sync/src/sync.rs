//! The sync orchestrator
//!
//! [`EpicSync`] runs the three operations offered to callers. Each call checks
//! what it needs from scratch: authentication, the repository behind `origin`,
//! and the task documents on disk. Nothing is cached between calls.

use crate::command::{CommandRunner, SystemCommandRunner};
use crate::config::Config;
use crate::git::{GitOperations, RepositoryRef};
use crate::github::{GitHubCli, IssueRecord, IssueSource, OdenIssueSummary, TrackingIssue};
use crate::tasks::TaskDiscovery;
use crate::{OdenSyncError, Result};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

/// Source of the timestamps written into synced documents
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// The operations callers can request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOperation {
    /// Push every task of an epic
    SyncEpic,
    /// Report tracker connectivity
    CheckStatus,
    /// Create one issue from explicit fields
    CreateIssue,
}

impl SyncOperation {
    /// Text reported to the caller when the operation fails with `error`
    ///
    /// Authentication and repository problems carry their own wording. Issue
    /// creation failures do too, but only for a single issue; inside an epic
    /// sync they never surface.
    pub fn failure_text(self, error: &OdenSyncError) -> String {
        let expected = match self {
            SyncOperation::SyncEpic | SyncOperation::CheckStatus => {
                matches!(error, OdenSyncError::Authentication) || error.is_repository_resolution()
            }
            SyncOperation::CreateIssue => {
                error.is_repository_resolution()
                    || matches!(error, OdenSyncError::IssueCreation { .. })
            }
        };

        if expected {
            return error.user_message();
        }

        match self {
            SyncOperation::SyncEpic => format!("❌ Error syncing to GitHub: {error}"),
            SyncOperation::CheckStatus => format!("❌ Error checking GitHub status: {error}"),
            SyncOperation::CreateIssue => format!("❌ Error creating issue: {error}"),
        }
    }
}

/// Result of a sync that got past authentication and repository checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The epic has no task documents
    NoTasks {
        /// Requested epic
        epic: String,
    },
    /// Issues were created (possibly none, if every creation failed)
    Synced(EpicSyncSummary),
}

/// What a completed sync created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpicSyncSummary {
    /// Synced epic
    pub epic: String,
    /// Repository the issues were created in
    pub repository: RepositoryRef,
    /// Task issues, in creation order
    pub issues: Vec<IssueRecord>,
    /// The tracking issue over `issues`
    pub tracking: TrackingIssue,
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncOutcome::NoTasks { epic } => write!(
                f,
                "No tasks found for epic '{epic}'. Run /oden:tasks {epic} first."
            ),
            SyncOutcome::Synced(summary) => write!(f, "{summary}"),
        }
    }
}

impl fmt::Display for EpicSyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let issue_lines = self
            .issues
            .iter()
            .map(|issue| format!("- #{}: {}", issue.number, issue.title))
            .collect::<Vec<_>>()
            .join("\n");

        write!(
            f,
            "✅ Epic '{epic}' synced to GitHub\n\n\
             📊 Results:\n\
             - Epic tracking issue: #{tracking}\n\
             - Task issues created: {count}\n\
             - Repository: {repository}\n\n\
             📋 Issues Created:\n\
             {issue_lines}\n\n\
             🔗 Epic Issue: {url}\n\n\
             Next: Use /oden:work {epic} to start development",
            epic = self.epic,
            tracking = self.tracking.number_display(),
            count = self.issues.len(),
            repository = self.repository,
            url = self.tracking.url_display(),
        )
    }
}

/// Tracker connectivity as seen from the project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    /// Whether `gh` is logged in
    pub authenticated: bool,
    /// Resolved repository, or the text explaining why resolution failed
    pub repository: std::result::Result<RepositoryRef, String>,
    /// Existing issues created by this tool
    pub oden_issues: OdenIssueSummary,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let auth = if self.authenticated {
            "✅ Authenticated"
        } else {
            "❌ Not authenticated"
        };
        let repository = match &self.repository {
            Ok(repository) => repository.to_string(),
            Err(_) => "Not found".to_string(),
        };
        let labels = if self.oden_issues.labels.is_empty() {
            "None".to_string()
        } else {
            self.oden_issues
                .labels
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };

        write!(
            f,
            "🔗 GitHub Integration Status\n\n\
             🔐 Authentication: {auth}\n\
             📁 Repository: {repository}\n\
             🏷️ Oden Issues: {count} found\n\
             📊 Labels: {labels}",
            count = self.oden_issues.count,
        )?;

        if let Err(reason) = &self.repository {
            write!(f, "\n\n{reason}")?;
        }
        Ok(())
    }
}

/// Text reported after a single issue was created
pub fn issue_created_text(issue: &IssueRecord) -> String {
    format!("✅ Issue created: #{}\n🔗 {}", issue.number, issue.url)
}

/// Orchestrates task discovery, issue creation and document updates
pub struct EpicSync {
    config: Arc<Config>,
    runner: Arc<dyn CommandRunner>,
    clock: Clock,
}

impl EpicSync {
    /// Orchestrator running real `gh` and `git` processes in the project root
    pub fn new(config: Config) -> Self {
        let runner = SystemCommandRunner::new(&config.project_root, config.command_timeout);
        Self::with_runner(config, Arc::new(runner))
    }

    /// Orchestrator running external commands through `runner`
    pub fn with_runner(config: Config, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            config: Arc::new(config),
            runner,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the timestamp source
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn github(&self) -> GitHubCli {
        GitHubCli::new(self.runner.clone(), &self.config)
    }

    fn git(&self) -> GitOperations {
        GitOperations::new(self.runner.clone(), &self.config)
    }

    /// Create an issue for every task document of `epic`, then a tracking issue
    ///
    /// Authentication and repository failures abort before any document is
    /// read. A task whose issue cannot be created is skipped; a document that
    /// cannot be rewritten is logged and its issue still counts.
    pub async fn sync_epic(&self, epic: &str) -> Result<SyncOutcome> {
        let github = self.github();
        github.ensure_authenticated().await?;
        let repository = self.git().resolve_repository().await?;

        let mut tasks = TaskDiscovery::new(self.config.tasks_path()).find_epic_tasks(epic);
        if tasks.is_empty() {
            tracing::info!("No task documents for epic '{}'", epic);
            return Ok(SyncOutcome::NoTasks {
                epic: epic.to_string(),
            });
        }

        let mut issues = Vec::with_capacity(tasks.len());
        for task in tasks.iter_mut() {
            let created = github
                .create_issue(&IssueSource::FromDocument(&*task), &repository)
                .await;

            match created {
                Ok(issue) => {
                    task.record_sync(&issue, (self.clock)());
                    if let Err(e) = task.write() {
                        tracing::warn!(
                            "Issue #{} created but document not updated: {}",
                            issue.number,
                            e
                        );
                    }
                    issues.push(issue);
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", task.file_name(), e);
                }
            }
        }

        let tracking = github
            .create_tracking_issue(epic, &issues, &repository)
            .await;

        tracing::info!(
            "Synced epic '{}' to {}: {} of {} tasks created",
            epic,
            repository,
            issues.len(),
            tasks.len()
        );

        Ok(SyncOutcome::Synced(EpicSyncSummary {
            epic: epic.to_string(),
            repository,
            issues,
            tracking,
        }))
    }

    /// Report authentication, repository and existing issue state
    ///
    /// Never fails: every check degrades to its negative answer.
    pub async fn check_status(&self) -> StatusReport {
        let github = self.github();
        let authenticated = github.is_authenticated().await;
        let repository = self
            .git()
            .resolve_repository()
            .await
            .map_err(|e| e.user_message());
        let oden_issues = github.list_oden_issues().await;

        StatusReport {
            authenticated,
            repository,
            oden_issues,
        }
    }

    /// Create one issue with explicit title, body and labels
    pub async fn create_single_issue(
        &self,
        title: &str,
        body: &str,
        labels: Vec<String>,
    ) -> Result<IssueRecord> {
        let repository = self.git().resolve_repository().await?;
        let source = IssueSource::Direct {
            title: title.to_string(),
            body: body.to_string(),
            labels,
        };
        self.github().create_issue(&source, &repository).await
    }
}
