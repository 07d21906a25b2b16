//! Unified error handling for the oden-sync library
//!
//! Every fallible operation in the crate returns [`Result`], whose error type
//! distinguishes the failures a sync run has to treat differently: the ones
//! that abort a tool call (authentication, repository resolution) and the ones
//! that are isolated to a single task (parse, creation, write).

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// The main error type for the oden-sync library
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OdenSyncError {
    /// The GitHub CLI reported that no account is logged in
    #[error("GitHub CLI not authenticated. Run: gh auth login")]
    Authentication,

    /// The project has no `origin` remote
    #[error("No git remote origin found")]
    NoRemote,

    /// The `origin` remote does not point at GitHub
    #[error("Not a GitHub repository: {url}")]
    NotHostedTracker {
        /// The remote URL that was rejected
        url: String,
    },

    /// The `origin` remote looks like a shared template or example project
    #[error("Cannot sync to template repository: {url}")]
    TemplateRepository {
        /// The remote URL that was rejected
        url: String,
    },

    /// A task document could not be parsed
    #[error("Failed to parse task document {path}: {reason}")]
    TaskParse {
        /// Path of the offending document
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// The tracker client could not create an issue
    #[error("{details}")]
    IssueCreation {
        /// Title of the issue that was being created
        title: String,
        /// Failure text, starting with `Failed to create issue:`
        details: String,
    },

    /// A task document could not be rewritten after sync
    #[error("Failed to write task document {path}: {source}")]
    FileWrite {
        /// Path of the document
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// An external command exceeded its time budget
    #[error("Command '{command}' timed out after {timeout:?}")]
    CommandTimeout {
        /// Rendered command line
        command: String,
        /// The budget that was exceeded
        timeout: Duration,
    },

    /// An external command exited unsuccessfully
    #[error("Command '{command}' failed with exit code {exit_code}: {stderr}")]
    CommandFailed {
        /// Rendered command line
        command: String,
        /// Process exit code (1 for synthetic failures)
        exit_code: i32,
        /// Captured standard error
        stderr: String,
    },

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// YAML serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),

    /// Generic error with context
    #[error("{message}")]
    Context {
        /// Description of what was being attempted
        message: String,
        /// The underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl OdenSyncError {
    /// Create a task parse error
    pub fn task_parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::TaskParse {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an issue creation error
    pub fn issue_creation(title: impl Into<String>, details: impl Into<String>) -> Self {
        Self::IssueCreation {
            title: title.into(),
            details: details.into(),
        }
    }

    /// Whether this error comes from resolving the repository reference
    pub fn is_repository_resolution(&self) -> bool {
        matches!(
            self,
            Self::NoRemote | Self::NotHostedTracker { .. } | Self::TemplateRepository { .. }
        )
    }

    /// The message shown to the calling agent for this error
    ///
    /// Authentication and repository failures have fixed wordings that tell
    /// the user what to do next; everything else uses the `Display` text.
    pub fn user_message(&self) -> String {
        match self {
            Self::Authentication => "❌ GitHub CLI not authenticated. Run: gh auth login".to_string(),
            Self::NoRemote => "❌ No git remote origin found".to_string(),
            Self::NotHostedTracker { .. } => "❌ Not a GitHub repository".to_string(),
            Self::TemplateRepository { .. } => "❌ Cannot sync to template repository. Please fork or create your own repository first.".to_string(),
            other => format!("❌ {other}"),
        }
    }
}

/// Result type alias for oden-sync operations
pub type Result<T> = std::result::Result<T, OdenSyncError>;

/// Extension trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context<S: Into<String>>(self, msg: S) -> Result<T>;

    /// Add context with a closure that's only called on error
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context<S: Into<String>>(self, msg: S) -> Result<T> {
        self.map_err(|e| OdenSyncError::Context {
            message: msg.into(),
            source: Box::new(e),
        })
    }

    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| OdenSyncError::Context {
            message: f().into(),
            source: Box::new(e),
        })
    }
}

/// Error chain formatter for detailed error reporting
pub struct ErrorChain<'a>(&'a dyn std::error::Error);

impl<'a> fmt::Display for ErrorChain<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Error: {}", self.0)?;

        let mut current = self.0.source();
        let mut level = 1;

        while let Some(err) = current {
            writeln!(f, "{:indent$}Caused by: {}", "", err, indent = level * 2)?;
            current = err.source();
            level += 1;
        }

        Ok(())
    }
}

/// Extension trait for error types to format the full error chain
pub trait ErrorChainExt {
    /// Format the full error chain
    fn error_chain(&self) -> ErrorChain<'_>;
}

impl<E: std::error::Error> ErrorChainExt for E {
    fn error_chain(&self) -> ErrorChain<'_> {
        ErrorChain(self)
    }
}
