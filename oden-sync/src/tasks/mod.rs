//! Task documents and their discovery
//!
//! A task document is a markdown file named `<epic>-task-<n>.md` whose YAML
//! front matter carries the task metadata and, after a sync, the issue it was
//! pushed to.

mod discovery;
mod document;

pub use discovery::TaskDiscovery;
pub use document::{
    TaskDocument, FRONT_MATTER_MARKER, SYNC_STATUS_CREATED, SYNC_TIMESTAMP_FORMAT,
};
