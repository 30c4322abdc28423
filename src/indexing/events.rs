//! Workspace change events as delivered by a file watcher.

use lsp_types::Url;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceEventKind {
    Created,
    Changed,
    Deleted,
}

/// One create/change/delete notification for a file URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspaceEvent {
    pub kind: WorkspaceEventKind,
    pub uri: Url,
}

impl WorkspaceEvent {
    /// Event for a filesystem path. `None` for relative paths.
    pub fn from_path(kind: WorkspaceEventKind, path: &Path) -> Option<Self> {
        Url::from_file_path(path).ok().map(|uri| Self { kind, uri })
    }

    pub fn created(path: &Path) -> Option<Self> {
        Self::from_path(WorkspaceEventKind::Created, path)
    }

    pub fn changed(path: &Path) -> Option<Self> {
        Self::from_path(WorkspaceEventKind::Changed, path)
    }

    pub fn deleted(path: &Path) -> Option<Self> {
        Self::from_path(WorkspaceEventKind::Deleted, path)
    }
}
