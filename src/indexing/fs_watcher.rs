//! File system watcher for keeping the workspace index current
//!
//! Watches the workspace root recursively and turns OS notifications into
//! [`WorkspaceEvent`]s. Events are debounced per path and applied to the
//! index in arrival order, one at a time, under the index write lock.

use indexmap::IndexMap;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{RwLock, mpsc};
use tokio::time::{Duration, sleep};
use tracing::{debug, info, warn};

use super::events::{WorkspaceEvent, WorkspaceEventKind};
use super::scanner::Scanner;
use super::walker::FileWalker;
use crate::document::{DocumentPath, SOURCE_EXTENSION};
use crate::storage::WorkspaceIndex;
use crate::{IndexError, IndexResult};

/// Watches a workspace root and feeds changes to the [`Scanner`].
pub struct FileSystemWatcher {
    /// Index shared with query handlers
    index: Arc<RwLock<WorkspaceIndex>>,
    scanner: Arc<Scanner>,
    workspace_root: DocumentPath,
    /// How long a path must stay quiet before its event is applied
    debounce_ms: u64,
    /// Channel receiver for file events
    event_rx: mpsc::Receiver<notify::Result<Event>>,
    /// The actual file watcher (kept alive by storing it)
    watcher: notify::RecommendedWatcher,
}

impl FileSystemWatcher {
    pub fn new(
        index: Arc<RwLock<WorkspaceIndex>>,
        scanner: Arc<Scanner>,
        workspace_root: DocumentPath,
    ) -> IndexResult<Self> {
        let (tx, rx) = mpsc::channel(256);

        let watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            // The callback is sync, so use blocking_send
            let _ = tx.blocking_send(res);
        })
        .map_err(|e| IndexError::WatcherInit {
            reason: e.to_string(),
        })?;

        let debounce_ms = scanner.settings().file_watch.debounce_ms;
        Ok(Self {
            index,
            scanner,
            workspace_root,
            debounce_ms,
            event_rx: rx,
            watcher,
        })
    }

    /// Map an OS event to workspace events for files we care about.
    fn translate(&self, event: &Event, walker: &FileWalker) -> Vec<(PathBuf, WorkspaceEventKind)> {
        let kind = match event.kind {
            EventKind::Create(_) => WorkspaceEventKind::Created,
            EventKind::Modify(_) => WorkspaceEventKind::Changed,
            EventKind::Remove(_) => WorkspaceEventKind::Deleted,
            _ => return Vec::new(),
        };

        let project = &self.scanner.settings().project;
        event
            .paths
            .iter()
            .filter(|path| {
                let is_source =
                    path.extension().and_then(|ext| ext.to_str()) == Some(SOURCE_EXTENSION);
                let is_json = path.extension().and_then(|ext| ext.to_str()) == Some("json");
                (is_source || is_json || project.is_config_file(path))
                    && !walker.is_excluded(self.workspace_root.as_path(), path)
            })
            .map(|path| (path.clone(), kind))
            .collect()
    }

    /// Run until the event channel closes.
    pub async fn watch(mut self) -> IndexResult<()> {
        self.watcher
            .watch(self.workspace_root.as_path(), RecursiveMode::Recursive)
            .map_err(|e| IndexError::WatcherInit {
                reason: format!("cannot watch {}: {e}", self.workspace_root),
            })?;

        info!(root = %self.workspace_root, "file watcher started");

        let walker = FileWalker::new(Arc::new(self.scanner.settings().clone()));
        let debounce_duration = Duration::from_millis(self.debounce_ms);
        // Latest event per path, ordered by arrival of that latest event
        let mut pending: IndexMap<PathBuf, (WorkspaceEventKind, Instant)> = IndexMap::new();

        loop {
            let timeout = sleep(Duration::from_millis(50));
            tokio::pin!(timeout);

            tokio::select! {
                received = self.event_rx.recv() => {
                    let Some(res) = received else {
                        break;
                    };
                    match res {
                        Ok(event) => {
                            for (path, kind) in self.translate(&event, &walker) {
                                pending.shift_remove(&path);
                                pending.insert(path, (kind, Instant::now()));
                            }
                        }
                        Err(e) => warn!("file watch error: {e}"),
                    }
                }

                _ = &mut timeout => {
                    let now = Instant::now();
                    let ready: Vec<(PathBuf, WorkspaceEventKind)> = pending
                        .iter()
                        .filter(|(_, (_, at))| now.duration_since(*at) >= debounce_duration)
                        .map(|(path, (kind, _))| (path.clone(), *kind))
                        .collect();

                    for (path, kind) in ready {
                        pending.shift_remove(&path);
                        let Some(event) = WorkspaceEvent::from_path(kind, &path) else {
                            continue;
                        };
                        debug!(path = %path.display(), ?kind, "applying file event");

                        let mut index = self.index.write().await;
                        let stats = self
                            .scanner
                            .apply(&mut index, &event, &self.workspace_root)
                            .await;
                        debug!(?stats, documents = index.len(), "file event applied");
                    }
                }
            }
        }

        info!("file watcher stopped");
        Ok(())
    }
}
