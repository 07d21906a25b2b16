//! Configuration management for oden-sync
//!
//! Values are resolved from, in increasing precedence:
//! 1. built-in defaults
//! 2. environment variables (`PROJECT_ROOT`, `GITHUB_TOKEN`, `ODEN_SYNC_*`)
//! 3. an optional `oden-sync.yaml` file

use crate::common::env_loader::{load_env_optional, EnvLoader};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Relative location of task documents inside the project
pub const DEFAULT_TASKS_DIR: &str = "docs/development/current/tasks";
/// Time budget for every external command
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 30;
/// Host that remotes must point at
pub const DEFAULT_TRACKER_HOST: &str = "github.com";

const CONFIG_FILENAME: &str = "oden-sync.yaml";
const ENV_PREFIX: &str = "ODEN_SYNC";

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file from disk
    #[error("Failed to read configuration file {path}: {source}")]
    FileRead {
        /// Path to the configuration file that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse YAML content from a configuration file
    #[error("Invalid YAML syntax in {path}:\n{source}\n\nHint: Check for proper indentation and YAML formatting")]
    YamlParse {
        /// Path to the configuration file with invalid YAML content
        path: PathBuf,
        /// Underlying YAML parsing error
        #[source]
        source: serde_yaml::Error,
    },

    /// Invalid configuration value for a specific field
    #[error("Invalid configuration value for '{field}': {value}\n{hint}")]
    InvalidValue {
        /// Name of the field
        field: String,
        /// The rejected value
        value: String,
        /// How to fix it
        hint: String,
    },
}

/// Runtime settings for a sync server
#[derive(Clone)]
pub struct Config {
    /// Base directory for task discovery and command execution
    pub project_root: PathBuf,
    /// Task directory, relative to `project_root`
    pub tasks_dir: PathBuf,
    /// Time budget for each external command
    pub command_timeout: Duration,
    /// GitHub CLI executable
    pub gh_binary: String,
    /// Git executable
    pub git_binary: String,
    /// Host that the origin remote must reference
    pub tracker_host: String,
    /// Token from the environment. `gh` manages its own credentials, so this
    /// is held for completeness and never passed anywhere.
    pub github_token: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("project_root", &self.project_root)
            .field("tasks_dir", &self.tasks_dir)
            .field("command_timeout", &self.command_timeout)
            .field("gh_binary", &self.gh_binary)
            .field("git_binary", &self.git_binary)
            .field("tracker_host", &self.tracker_host)
            .field(
                "github_token",
                &self.github_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_root: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            tasks_dir: PathBuf::from(DEFAULT_TASKS_DIR),
            command_timeout: Duration::from_secs(DEFAULT_COMMAND_TIMEOUT_SECS),
            gh_binary: "gh".to_string(),
            git_binary: "git".to_string(),
            tracker_host: DEFAULT_TRACKER_HOST.to_string(),
            github_token: None,
        }
    }
}

impl Config {
    /// Load configuration from the environment and the optional YAML file
    pub fn new() -> Self {
        Self::load(None)
    }

    /// Load configuration, letting an explicit project root win over `PROJECT_ROOT`
    pub fn load(project_root: Option<PathBuf>) -> Self {
        let mut config = Self::default();
        config.apply_env_vars();

        if let Some(root) = project_root {
            config.project_root = root;
        }

        match YamlConfig::load_or_default(&config.project_root) {
            Ok(yaml_config) => yaml_config.apply_to_config(&mut config),
            Err(e) => {
                tracing::warn!(
                    "Failed to load YAML configuration, falling back to env vars and defaults: {}",
                    e
                );
            }
        }

        tracing::debug!("Resolved configuration: {:?}", config);
        config
    }

    /// Build a configuration rooted at `project_root` with every other value defaulted
    pub fn with_project_root(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ..Self::default()
        }
    }

    /// Absolute directory holding task documents
    pub fn tasks_path(&self) -> PathBuf {
        self.project_root.join(&self.tasks_dir)
    }

    fn apply_env_vars(&mut self) {
        if let Some(root) = load_env_optional::<String>("PROJECT_ROOT") {
            self.project_root = PathBuf::from(root);
        }
        self.github_token = load_env_optional("GITHUB_TOKEN");

        let loader = EnvLoader::new(ENV_PREFIX);
        if let Some(dir) = loader.load_optional::<String>("TASKS_DIR") {
            self.tasks_dir = PathBuf::from(dir);
        }
        self.command_timeout = Duration::from_secs(loader.load_validated(
            "COMMAND_TIMEOUT_SECS",
            self.command_timeout.as_secs(),
            |secs| *secs > 0,
        ));
        self.gh_binary = loader.load_string("GH_BINARY", &self.gh_binary);
        self.git_binary = loader.load_string("GIT_BINARY", &self.git_binary);
    }

    /// Find the `oden-sync.yaml` configuration file
    ///
    /// Search order:
    /// 1. `<project_root>/oden-sync.yaml`
    /// 2. `~/.config/oden-sync/oden-sync.yaml`
    pub fn find_yaml_config_file(project_root: &Path) -> Option<PathBuf> {
        let mut search_paths = vec![project_root.join(CONFIG_FILENAME)];

        if let Some(home_dir) = dirs::home_dir() {
            search_paths.push(
                home_dir
                    .join(".config")
                    .join("oden-sync")
                    .join(CONFIG_FILENAME),
            );
        }

        let found = search_paths.into_iter().find(|path| path.is_file());
        match &found {
            Some(path) => tracing::debug!("Found configuration file: {:?}", path),
            None => tracing::debug!("No {} found in any search location", CONFIG_FILENAME),
        }
        found
    }
}

/// Configuration loaded from `oden-sync.yaml`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlConfig {
    /// Task directory relative to the project root
    pub tasks_dir: Option<String>,
    /// Time budget for each external command, in seconds
    pub command_timeout_secs: Option<u64>,
    /// GitHub CLI executable
    pub gh_binary: Option<String>,
    /// Git executable
    pub git_binary: Option<String>,
}

impl YamlConfig {
    /// Apply YAML values over an existing configuration
    pub fn apply_to_config(&self, config: &mut Config) {
        if let Some(ref dir) = self.tasks_dir {
            config.tasks_dir = PathBuf::from(dir);
        }
        if let Some(secs) = self.command_timeout_secs {
            config.command_timeout = Duration::from_secs(secs);
        }
        if let Some(ref gh) = self.gh_binary {
            config.gh_binary = gh.clone();
        }
        if let Some(ref git) = self.git_binary {
            config.git_binary = git.clone();
        }
    }

    /// Load and validate a YAML configuration file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        tracing::info!("Loading YAML configuration from: {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: YamlConfig =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::YamlParse {
                path: path.to_path_buf(),
                source: e,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load the first configuration file found, or defaults when there is none
    pub fn load_or_default(project_root: &Path) -> Result<Self, ConfigError> {
        match Config::find_yaml_config_file(project_root) {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Reject values that would make every sync fail
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.tasks_dir {
            if dir.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "tasks_dir".to_string(),
                    value: dir.clone(),
                    hint: "tasks_dir cannot be empty".to_string(),
                });
            }
            if Path::new(dir).is_absolute() {
                return Err(ConfigError::InvalidValue {
                    field: "tasks_dir".to_string(),
                    value: dir.clone(),
                    hint: "tasks_dir must be relative to the project root".to_string(),
                });
            }
        }

        if self.command_timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "command_timeout_secs".to_string(),
                value: "0".to_string(),
                hint: "command_timeout_secs must be at least 1".to_string(),
            });
        }

        for (field, value) in [("gh_binary", &self.gh_binary), ("git_binary", &self.git_binary)] {
            if let Some(value) = value {
                if value.trim().is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: field.to_string(),
                        value: value.clone(),
                        hint: format!("{field} cannot be empty"),
                    });
                }
            }
        }

        Ok(())
    }
}
