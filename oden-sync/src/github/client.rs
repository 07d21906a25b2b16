use super::{IssueRecord, IssueSource, ODEN_EPIC_LABEL};
use crate::command::{display_command, CommandRunner};
use crate::config::Config;
use crate::git::RepositoryRef;
use crate::{OdenSyncError, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::io::Write;
use std::sync::Arc;

/// Existing issues carrying the `oden-epic` label
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OdenIssueSummary {
    /// Number of issues found
    pub count: usize,
    /// Distinct label names across those issues
    pub labels: BTreeSet<String>,
}

#[derive(Debug, Deserialize)]
struct ListedIssue {
    #[serde(default)]
    labels: Vec<ListedLabel>,
}

#[derive(Debug, Deserialize)]
struct ListedLabel {
    name: String,
}

/// Issue tracker client driving the `gh` executable
pub struct GitHubCli {
    runner: Arc<dyn CommandRunner>,
    gh_binary: String,
}

impl GitHubCli {
    /// Create a client executing through `runner`
    pub fn new(runner: Arc<dyn CommandRunner>, config: &Config) -> Self {
        Self {
            runner,
            gh_binary: config.gh_binary.clone(),
        }
    }

    async fn gh(&self, args: &[String]) -> crate::command::CommandOutput {
        self.runner.run(&self.gh_binary, args).await
    }

    /// Whether `gh auth status` reports a logged in account
    pub async fn is_authenticated(&self) -> bool {
        let output = self.gh(&["auth", "status"].map(String::from)).await;
        output.is_success()
    }

    /// Fail with [`OdenSyncError::Authentication`] unless logged in
    pub async fn ensure_authenticated(&self) -> Result<()> {
        if self.is_authenticated().await {
            Ok(())
        } else {
            Err(OdenSyncError::Authentication)
        }
    }

    /// Create one issue in `repository`
    ///
    /// The body travels through a temporary file that is removed when this
    /// call returns, whatever the outcome.
    pub async fn create_issue(
        &self,
        source: &IssueSource<'_>,
        repository: &RepositoryRef,
    ) -> Result<IssueRecord> {
        let draft = source.to_draft();

        let mut body_file = tempfile::Builder::new()
            .prefix("oden-issue-")
            .suffix(".md")
            .tempfile()?;
        body_file.write_all(draft.body.as_bytes())?;
        body_file.flush()?;

        let mut args: Vec<String> = vec![
            "issue".into(),
            "create".into(),
            "--repo".into(),
            repository.full_name(),
            "--title".into(),
            draft.title.clone(),
            "--body-file".into(),
            body_file.path().to_string_lossy().into_owned(),
        ];
        for label in &draft.labels {
            args.push("--label".into());
            args.push(label.clone());
        }

        let output = self.gh(&args).await;
        if !output.is_success() {
            tracing::debug!(
                "{} exited with {}",
                display_command(&self.gh_binary, &args),
                output.status
            );
            return Err(OdenSyncError::issue_creation(
                &draft.title,
                format!("Failed to create issue: {}", output.stderr.trim()),
            ));
        }

        let url = output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .last()
            .unwrap_or_default()
            .to_string();

        let number = url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .and_then(|segment| segment.parse::<u64>().ok())
            .ok_or_else(|| {
                OdenSyncError::issue_creation(
                    &draft.title,
                    format!("Failed to create issue: unexpected client output '{url}'"),
                )
            })?;

        tracing::info!("Created issue #{}: {}", number, draft.title);
        Ok(IssueRecord {
            number,
            url,
            title: draft.title,
        })
    }

    /// Count issues labelled `oden-epic` and collect their labels
    ///
    /// Any failure, from the client or from its output, reads as no issues.
    pub async fn list_oden_issues(&self) -> OdenIssueSummary {
        match self.fetch_oden_issues().await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::debug!("Listing oden issues failed: {}", e);
                OdenIssueSummary::default()
            }
        }
    }

    async fn fetch_oden_issues(&self) -> Result<OdenIssueSummary> {
        let args = ["issue", "list", "--label", ODEN_EPIC_LABEL, "--json", "number,labels"]
            .map(String::from);
        let output = self.gh(&args).await;

        if !output.is_success() {
            return Err(OdenSyncError::CommandFailed {
                command: display_command(&self.gh_binary, &args),
                exit_code: output.status,
                stderr: output.stderr.trim().to_string(),
            });
        }

        let stdout = output.stdout.trim();
        let json = if stdout.is_empty() { "[]" } else { stdout };
        let issues: Vec<ListedIssue> = serde_json::from_str(json)?;

        Ok(OdenIssueSummary {
            count: issues.len(),
            labels: issues
                .into_iter()
                .flat_map(|issue| issue.labels)
                .map(|label| label.name)
                .collect(),
        })
    }
}
