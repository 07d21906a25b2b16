use super::{GitHubCli, IssueRecord, IssueSource, EPIC_LABEL, ODEN_EPIC_LABEL};
use crate::git::RepositoryRef;

/// Placeholder shown when the tracking issue could not be created
const UNAVAILABLE: &str = "?";

/// Title of the tracking issue for `epic`
pub fn tracking_title(epic: &str) -> String {
    format!("[EPIC] {epic}")
}

/// Markdown body of the tracking issue listing `issues` in order
pub fn build_tracking_body(epic: &str, issues: &[IssueRecord]) -> String {
    let prefix = format!("[{epic}] ");
    let checklist = issues
        .iter()
        .map(|issue| {
            let title = issue.title.strip_prefix(&prefix).unwrap_or(&issue.title);
            format!("- [ ] #{}: {}", issue.number, title)
        })
        .collect::<Vec<_>>()
        .join("\n");
    let total = issues.len();

    format!(
        r#"# Epic: {epic}

This is the tracking issue for the "{epic}" epic.

## 📋 Tasks

{checklist}

## 📊 Progress

- **Total Tasks**: {total}
- **Completed**: 0
- **In Progress**: 0
- **Todo**: {total}

## 🏷️ Labels

- `epic` - This is an epic tracking issue
- `oden-epic` - Created by Oden Forge methodology
- `{epic}` - Epic identifier

---

*Created by Oden Forge Documentation-First Development methodology*
"#
    )
}

/// Outcome of creating the tracking issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingIssue {
    /// The tracking issue exists
    Created(IssueRecord),
    /// Creation failed; the sync still reports its task issues
    Unavailable,
}

impl TrackingIssue {
    /// Issue number, or `?`
    pub fn number_display(&self) -> String {
        match self {
            Self::Created(issue) => issue.number.to_string(),
            Self::Unavailable => UNAVAILABLE.to_string(),
        }
    }

    /// Issue URL, or `?`
    pub fn url_display(&self) -> &str {
        match self {
            Self::Created(issue) => &issue.url,
            Self::Unavailable => UNAVAILABLE,
        }
    }
}

impl GitHubCli {
    /// Create the tracking issue for `epic` over the already created `issues`
    pub async fn create_tracking_issue(
        &self,
        epic: &str,
        issues: &[IssueRecord],
        repository: &RepositoryRef,
    ) -> TrackingIssue {
        let source = IssueSource::Direct {
            title: tracking_title(epic),
            body: build_tracking_body(epic, issues),
            labels: vec![
                EPIC_LABEL.to_string(),
                ODEN_EPIC_LABEL.to_string(),
                epic.to_string(),
            ],
        };

        match self.create_issue(&source, repository).await {
            Ok(issue) => TrackingIssue::Created(issue),
            Err(e) => {
                tracing::warn!("Tracking issue for epic '{}' not created: {}", epic, e);
                TrackingIssue::Unavailable
            }
        }
    }
}
