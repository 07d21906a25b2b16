//! Test utilities for oden-sync tests
//!
//! Tests never run the real `gh` or `git`. A [`ScriptedCommandRunner`] stands
//! in for them: it replays canned outputs matched on argument prefixes and
//! records every call, including the contents of the `--body-file` the tracker
//! client writes, which is gone by the time the call returns.
//!
//! [`TestProject`] provides an isolated project root with a tasks directory.
//!
//! ```no_run
//! use oden_sync::test_utils::{issue_created, ScriptedCommandRunner, TestProject};
//!
//! let project = TestProject::new();
//! project.write_task("auth-task-1.md", "---\nname: Login\n---\nBody\n");
//!
//! let runner = ScriptedCommandRunner::github_project("git@github.com:acme/widgets.git");
//! runner.respond(&["issue", "create"], issue_created(1));
//! ```

use crate::command::{CommandOutput, CommandRunner};
use crate::config::Config;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::TempDir;

/// Status reported for calls no rule matches
pub const UNSCRIPTED_STATUS: i32 = 127;

/// One recorded call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program that was run
    pub program: String,
    /// Arguments it was given
    pub args: Vec<String>,
    /// Contents of the `--body-file`, read while the call was in flight
    pub body: Option<String>,
}

impl Invocation {
    /// Value following the first occurrence of `flag`
    pub fn flag(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|arg| arg == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }

    /// Every `--label` value, in order
    pub fn labels(&self) -> Vec<&str> {
        self.args
            .windows(2)
            .filter(|pair| pair[0] == "--label")
            .map(|pair| pair[1].as_str())
            .collect()
    }

    fn starts_with(&self, prefix: &[&str]) -> bool {
        self.args.len() >= prefix.len() && self.args.iter().zip(prefix).all(|(a, p)| a == p)
    }
}

struct Rule {
    prefix: Vec<String>,
    outputs: VecDeque<CommandOutput>,
}

/// [`CommandRunner`] replaying scripted outputs
///
/// Outputs registered for the same prefix are returned in order; the last one
/// repeats. The first registered rule whose prefix matches the arguments wins.
#[derive(Default)]
pub struct ScriptedCommandRunner {
    rules: Mutex<Vec<Rule>>,
    invocations: Mutex<Vec<Invocation>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ScriptedCommandRunner {
    /// Runner with no scripted responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner for an authenticated project whose `origin` is `remote_url`
    pub fn github_project(remote_url: &str) -> Self {
        let runner = Self::new();
        runner.respond(&["auth", "status"], CommandOutput::success("Logged in"));
        runner.respond(
            &["remote", "get-url", "origin"],
            CommandOutput::success(format!("{remote_url}\n")),
        );
        runner
    }

    /// Queue `output` for calls whose arguments start with `prefix`
    pub fn respond(&self, prefix: &[&str], output: CommandOutput) -> &Self {
        let mut rules = lock(&self.rules);
        match rules
            .iter_mut()
            .find(|rule| rule.prefix.iter().map(String::as_str).eq(prefix.iter().copied()))
        {
            Some(rule) => rule.outputs.push_back(output),
            None => rules.push(Rule {
                prefix: prefix.iter().map(|p| p.to_string()).collect(),
                outputs: VecDeque::from([output]),
            }),
        }
        self
    }

    /// Every call made so far
    pub fn invocations(&self) -> Vec<Invocation> {
        lock(&self.invocations).clone()
    }

    /// Calls whose arguments start with `prefix`
    pub fn invocations_of(&self, prefix: &[&str]) -> Vec<Invocation> {
        lock(&self.invocations)
            .iter()
            .filter(|call| call.starts_with(prefix))
            .cloned()
            .collect()
    }

    fn next_output(&self, invocation: &Invocation) -> CommandOutput {
        let mut rules = lock(&self.rules);
        let rule = rules.iter_mut().find(|rule| {
            let prefix: Vec<&str> = rule.prefix.iter().map(String::as_str).collect();
            invocation.starts_with(&prefix)
        });

        match rule {
            Some(rule) if rule.outputs.len() > 1 => rule.outputs.pop_front().unwrap_or_else(|| {
                CommandOutput::failure(UNSCRIPTED_STATUS, "script exhausted")
            }),
            Some(rule) => rule.outputs.front().cloned().unwrap_or_else(|| {
                CommandOutput::failure(UNSCRIPTED_STATUS, "script exhausted")
            }),
            None => CommandOutput::failure(
                UNSCRIPTED_STATUS,
                format!("unscripted command: {}", invocation.args.join(" ")),
            ),
        }
    }
}

#[async_trait]
impl CommandRunner for ScriptedCommandRunner {
    async fn run(&self, program: &str, args: &[String]) -> CommandOutput {
        let mut invocation = Invocation {
            program: program.to_string(),
            args: args.to_vec(),
            body: None,
        };
        invocation.body = invocation
            .flag("--body-file")
            .and_then(|path| std::fs::read_to_string(path).ok());

        let output = self.next_output(&invocation);
        lock(&self.invocations).push(invocation);
        output
    }
}

/// Successful `gh issue create` output for issue `number` in acme/widgets
pub fn issue_created(number: u64) -> CommandOutput {
    CommandOutput::success(format!("https://github.com/acme/widgets/issues/{number}\n"))
}

/// A temporary project root with a tasks directory
pub struct TestProject {
    temp_dir: TempDir,
    config: Config,
}

impl TestProject {
    /// Create the project and its default tasks directory
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = Config::with_project_root(temp_dir.path());
        std::fs::create_dir_all(config.tasks_path()).expect("Failed to create tasks dir");
        Self { temp_dir, config }
    }

    /// Project root
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Configuration rooted at this project
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// Tasks directory
    pub fn tasks_dir(&self) -> PathBuf {
        self.config.tasks_path()
    }

    /// Write a task document, returning its path
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_task(&self, file_name: &str, content: &str) -> PathBuf {
        let path = self.tasks_dir().join(file_name);
        std::fs::write(&path, content).expect("Failed to write task document");
        path
    }

    /// Read a task document back
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be read.
    pub fn read_task(&self, file_name: &str) -> String {
        std::fs::read_to_string(self.tasks_dir().join(file_name))
            .expect("Failed to read task document")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}
