//! External command execution
//!
//! Every call to `git` or `gh` goes through a [`CommandRunner`]. The system
//! runner applies one policy to all of them: piped output, no stdin, a fixed
//! timeout, and no error escaping to the caller. A timeout or spawn failure is
//! folded into a [`CommandOutput`] with exit status 1 and the failure text as
//! stderr, so callers only ever inspect an exit status.

use crate::OdenSyncError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Exit status reported for commands that never produced one
pub const SYNTHETIC_FAILURE_STATUS: i32 = 1;

/// Captured result of an external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Process exit status
    pub status: i32,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl CommandOutput {
    /// A successful output with the given stdout
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed output with the given status and stderr
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        Self {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Whether the command exited with status 0
    pub fn is_success(&self) -> bool {
        self.status == 0
    }
}

/// Runs external programs on behalf of the sync orchestrator
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` and capture its output
    ///
    /// Implementations never fail: launch errors and timeouts are reported
    /// as a non-zero [`CommandOutput`].
    async fn run(&self, program: &str, args: &[String]) -> CommandOutput;
}

/// Render a command line for logs and error messages
pub fn display_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// [`CommandRunner`] backed by real processes
#[derive(Debug, Clone)]
pub struct SystemCommandRunner {
    work_dir: PathBuf,
    timeout: Duration,
}

impl SystemCommandRunner {
    /// Create a runner executing in `work_dir` with the given time budget
    pub fn new(work_dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            work_dir: work_dir.into(),
            timeout,
        }
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, program: &str, args: &[String]) -> CommandOutput {
        let rendered = display_command(program, args);
        tracing::debug!("Running command: {}", rendered);

        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(&self.work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        match timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => {
                let result = CommandOutput {
                    status: output.status.code().unwrap_or(SYNTHETIC_FAILURE_STATUS),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                };
                tracing::debug!("Command '{}' exited with {}", rendered, result.status);
                result
            }
            Ok(Err(e)) => {
                tracing::warn!("Failed to launch '{}': {}", rendered, e);
                CommandOutput::failure(SYNTHETIC_FAILURE_STATUS, e.to_string())
            }
            Err(_) => {
                let err = OdenSyncError::CommandTimeout {
                    command: rendered,
                    timeout: self.timeout,
                };
                tracing::warn!("{}", err);
                CommandOutput::failure(SYNTHETIC_FAILURE_STATUS, err.to_string())
            }
        }
    }
}
