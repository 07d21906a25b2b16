use crate::github::IssueRecord;
use crate::{OdenSyncError, Result};
use chrono::{DateTime, Utc};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

/// Line that opens and closes the front matter block
pub const FRONT_MATTER_MARKER: &str = "---";
/// Format of `synced_at` and `updated`
pub const SYNC_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
/// Value written to `sync_status` after a successful sync
pub const SYNC_STATUS_CREATED: &str = "created";

const DEFAULT_TASK_NAME: &str = "Untitled Task";

/// A task document: YAML front matter followed by a markdown body
///
/// The front matter is kept as an ordered mapping so keys this crate does not
/// know about survive a rewrite untouched and in place.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDocument {
    /// Where the document was read from
    pub path: PathBuf,
    /// Parsed front matter
    pub metadata: Mapping,
    /// Body text following the front matter, surrounding whitespace removed
    pub body: String,
    epic: String,
}

impl TaskDocument {
    /// Read and parse a document, using `default_epic` when it declares none
    pub fn load(path: &Path, default_epic: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| OdenSyncError::task_parse(path, e.to_string()))?;
        Self::parse(path, &content, default_epic)
    }

    /// Parse document text
    pub fn parse(path: &Path, content: &str, default_epic: &str) -> Result<Self> {
        let (yaml, body) = split_front_matter(content)
            .ok_or_else(|| OdenSyncError::task_parse(path, "missing front matter block"))?;

        let metadata = match serde_yaml::from_str::<Value>(yaml)
            .map_err(|e| OdenSyncError::task_parse(path, e.to_string()))?
        {
            Value::Mapping(mapping) => mapping,
            Value::Null => Mapping::new(),
            _ => {
                return Err(OdenSyncError::task_parse(
                    path,
                    "front matter is not a key/value mapping",
                ))
            }
        };

        let epic = metadata
            .get("epic")
            .and_then(scalar_to_string)
            .unwrap_or_else(|| default_epic.to_string());

        Ok(Self {
            path: path.to_path_buf(),
            metadata,
            body: body.trim().to_string(),
            epic,
        })
    }

    /// File name of the document
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Task name, `Untitled Task` when missing
    pub fn name(&self) -> String {
        self.metadata
            .get("name")
            .and_then(scalar_to_string)
            .unwrap_or_else(|| DEFAULT_TASK_NAME.to_string())
    }

    /// Epic the task belongs to
    pub fn epic(&self) -> &str {
        &self.epic
    }

    /// Work stream tag, if any
    pub fn work_stream(&self) -> Option<String> {
        self.metadata
            .get("work_stream")
            .and_then(scalar_to_string)
            .filter(|s| !s.trim().is_empty())
    }

    /// Labels declared by the document, in declaration order
    pub fn labels(&self) -> Vec<String> {
        match self.metadata.get("labels") {
            Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
            Some(value) => scalar_to_string(value).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Issue number recorded by a previous sync
    pub fn github_issue(&self) -> Option<u64> {
        self.metadata.get("github_issue").and_then(Value::as_u64)
    }

    /// Record a successful issue creation in the front matter
    pub fn record_sync(&mut self, issue: &IssueRecord, at: DateTime<Utc>) {
        let timestamp = at.format(SYNC_TIMESTAMP_FORMAT).to_string();

        self.metadata
            .insert("github_issue".into(), Value::from(issue.number));
        self.metadata
            .insert("github_url".into(), Value::from(issue.url.clone()));
        self.metadata
            .insert("synced_at".into(), Value::from(timestamp.clone()));
        self.metadata
            .insert("sync_status".into(), Value::from(SYNC_STATUS_CREATED));
        self.metadata.insert("updated".into(), Value::from(timestamp));
    }

    /// Serialize front matter and body back into document text
    pub fn render(&self) -> Result<String> {
        let yaml = if self.metadata.is_empty() {
            String::new()
        } else {
            serde_yaml::to_string(&self.metadata)?
        };

        let mut content = format!("{FRONT_MATTER_MARKER}\n{yaml}{FRONT_MATTER_MARKER}\n");
        if !self.body.is_empty() {
            content.push('\n');
            content.push_str(&self.body);
            content.push('\n');
        }
        Ok(content)
    }

    /// Rewrite the document at its original path
    pub fn write(&self) -> Result<()> {
        let content = self.render()?;
        std::fs::write(&self.path, content).map_err(|source| OdenSyncError::FileWrite {
            path: self.path.clone(),
            source,
        })
    }
}

/// Split text into front matter YAML and the remainder after the closing marker
fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix(FRONT_MATTER_MARKER)?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == FRONT_MATTER_MARKER {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    const DOC: &str = "---\nname: Login form\nepic: auth\nwork_stream: frontend\nlabels: [ui, forms]\npriority: high\n---\n\n# Login form\n\nBuild the login form.\n\n- [ ] fields\n";

    fn parse(content: &str) -> TaskDocument {
        TaskDocument::parse(Path::new("auth-task-1.md"), content, "fallback").unwrap()
    }

    fn record() -> IssueRecord {
        IssueRecord {
            number: 42,
            url: "https://github.com/acme/widgets/issues/42".to_string(),
            title: "[auth] Login form".to_string(),
        }
    }

    fn synced_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
    }

    #[test]
    fn test_parse_fields() {
        let doc = parse(DOC);
        assert_eq!(doc.name(), "Login form");
        assert_eq!(doc.epic(), "auth");
        assert_eq!(doc.work_stream().as_deref(), Some("frontend"));
        assert_eq!(doc.labels(), vec!["ui", "forms"]);
        assert_eq!(doc.body, "# Login form\n\nBuild the login form.\n\n- [ ] fields");
        assert_eq!(doc.github_issue(), None);
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let doc = parse("---\npriority: low\n---\nbody");
        assert_eq!(doc.name(), "Untitled Task");
        assert_eq!(doc.epic(), "fallback");
        assert_eq!(doc.work_stream(), None);
        assert!(doc.labels().is_empty());
    }

    #[test]
    fn test_single_label_and_numeric_scalars() {
        let doc = parse("---\nname: 7\nlabels: backend\n---\n");
        assert_eq!(doc.name(), "7");
        assert_eq!(doc.labels(), vec!["backend"]);
        assert_eq!(doc.body, "");
    }

    #[test]
    fn test_marker_inside_body_is_not_a_delimiter() {
        let doc = parse("---\nname: x\n---\nintro\n---\nafter rule\n");
        assert_eq!(doc.body, "intro\n---\nafter rule");
    }

    #[test]
    fn test_crlf_documents() {
        let doc = parse("---\r\nname: Windows\r\n---\r\nbody\r\n");
        assert_eq!(doc.name(), "Windows");
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn test_rejects_malformed_documents() {
        let path = Path::new("auth-task-9.md");
        for content in [
            "no front matter here",
            "---\nname: never closed\n",
            "---\nname: [unbalanced\n---\nbody",
            "---\n- just\n- a list\n---\nbody",
        ] {
            let err = TaskDocument::parse(path, content, "auth").unwrap_err();
            assert!(
                matches!(err, OdenSyncError::TaskParse { .. }),
                "{content:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_record_sync_adds_exactly_five_keys() {
        let original = parse(DOC);
        let mut doc = original.clone();
        doc.record_sync(&record(), synced_at());

        assert_eq!(doc.metadata.len(), original.metadata.len() + 5);
        for (key, value) in &original.metadata {
            assert_eq!(doc.metadata.get(key), Some(value));
        }
        assert_eq!(doc.github_issue(), Some(42));
        assert_eq!(
            doc.metadata.get("github_url").and_then(Value::as_str),
            Some("https://github.com/acme/widgets/issues/42")
        );
        assert_eq!(
            doc.metadata.get("synced_at").and_then(Value::as_str),
            Some("2026-03-14T09:26:53Z")
        );
        assert_eq!(
            doc.metadata.get("updated").and_then(Value::as_str),
            Some("2026-03-14T09:26:53Z")
        );
        assert_eq!(
            doc.metadata.get("sync_status").and_then(Value::as_str),
            Some("created")
        );
    }

    #[test]
    fn test_record_sync_overwrites_in_place() {
        let mut doc = parse("---\nname: x\nsync_status: pending\nepic: auth\n---\nbody");
        doc.record_sync(&record(), synced_at());

        let keys: Vec<&str> = doc.metadata.keys().filter_map(Value::as_str).collect();
        assert_eq!(
            keys,
            vec!["name", "sync_status", "epic", "github_issue", "github_url", "synced_at", "updated"]
        );
    }

    #[test]
    fn test_render_round_trip_preserves_body_and_keys() {
        let mut doc = parse(DOC);
        doc.record_sync(&record(), synced_at());

        let rendered = doc.render().unwrap();
        assert!(rendered.starts_with("---\nname: Login form\n"));
        assert!(rendered.contains("---\n\n# Login form\n"));

        let reparsed = parse(&rendered);
        assert_eq!(reparsed.body, doc.body);
        assert_eq!(reparsed.metadata, doc.metadata);
    }

    #[test]
    fn test_write_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("auth-task-1.md");
        std::fs::write(&path, DOC).unwrap();

        let mut doc = TaskDocument::load(&path, "auth").unwrap();
        doc.record_sync(&record(), synced_at());
        doc.write().unwrap();

        let reloaded = TaskDocument::load(&path, "auth").unwrap();
        assert_eq!(reloaded.github_issue(), Some(42));
        assert_eq!(reloaded.body, doc.body);
        assert_eq!(reloaded.file_name(), "auth-task-1.md");
    }

    #[test]
    fn test_write_failure_is_file_write_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut doc = parse(DOC);
        doc.path = temp_dir.path().join("missing-dir").join("auth-task-1.md");

        assert!(matches!(
            doc.write(),
            Err(OdenSyncError::FileWrite { .. })
        ));
    }
}
