use super::TaskDocument;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Finds the task documents belonging to an epic
#[derive(Debug, Clone)]
pub struct TaskDiscovery {
    tasks_dir: PathBuf,
}

impl TaskDiscovery {
    /// Create a discovery rooted at `tasks_dir`
    pub fn new(tasks_dir: impl Into<PathBuf>) -> Self {
        Self {
            tasks_dir: tasks_dir.into(),
        }
    }

    /// Directory that is scanned
    pub fn tasks_dir(&self) -> &Path {
        &self.tasks_dir
    }

    /// Load every `<epic>-task-*.md` document, sorted by file name
    ///
    /// Documents that cannot be read or parsed are skipped with a warning. A
    /// missing tasks directory yields an empty list.
    pub fn find_epic_tasks(&self, epic: &str) -> Vec<TaskDocument> {
        if !self.tasks_dir.is_dir() {
            tracing::debug!("Tasks directory {} does not exist", self.tasks_dir.display());
            return Vec::new();
        }

        let prefix = format!("{epic}-task-");
        let mut tasks = Vec::new();

        for entry in WalkDir::new(&self.tasks_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let file_name = entry.file_name().to_string_lossy();
            if !file_name.starts_with(&prefix) || !file_name.ends_with(".md") {
                continue;
            }

            match TaskDocument::load(entry.path(), epic) {
                Ok(document) => tasks.push(document),
                Err(e) => tracing::warn!("Skipping task document: {}", e),
            }
        }

        tracing::debug!("Found {} task documents for epic '{}'", tasks.len(), epic);
        tasks
    }
}
