//! GitHub issue tracker access through the `gh` command-line client

mod client;
mod tracking;

pub use client::{GitHubCli, OdenIssueSummary};
pub use tracking::{build_tracking_body, tracking_title, TrackingIssue};

use crate::tasks::TaskDocument;

/// Label attached to every issue this crate creates
pub const ODEN_EPIC_LABEL: &str = "oden-epic";
/// Label attached to epic tracking issues
pub const EPIC_LABEL: &str = "epic";

/// An issue that was created on the tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRecord {
    /// Issue number
    pub number: u64,
    /// Web URL of the issue
    pub url: String,
    /// Title the issue was created with
    pub title: String,
}

/// Fully resolved title, body and labels of an issue about to be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDraft {
    /// Issue title
    pub title: String,
    /// Markdown body
    pub body: String,
    /// Labels, in the order they are passed to the client
    pub labels: Vec<String>,
}

/// What an issue is created from
#[derive(Debug, Clone)]
pub enum IssueSource<'a> {
    /// A task document; title and labels are derived from its front matter
    FromDocument(&'a TaskDocument),
    /// Explicit title, body and labels, used verbatim
    Direct {
        /// Issue title
        title: String,
        /// Markdown body
        body: String,
        /// Labels to attach
        labels: Vec<String>,
    },
}

impl IssueSource<'_> {
    /// Resolve the title, body and labels to send
    pub fn to_draft(&self) -> IssueDraft {
        match self {
            IssueSource::FromDocument(document) => {
                let epic = document.epic();
                let mut labels = vec![ODEN_EPIC_LABEL.to_string(), epic.to_string()];
                labels.extend(document.labels());
                labels.extend(document.work_stream());

                IssueDraft {
                    title: format!("[{}] {}", epic, document.name()),
                    body: document.body.clone(),
                    labels,
                }
            }
            IssueSource::Direct {
                title,
                body,
                labels,
            } => IssueDraft {
                title: title.clone(),
                body: body.clone(),
                labels: labels.clone(),
            },
        }
    }
}
