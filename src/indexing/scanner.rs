//! Scanner: populates the workspace index and keeps it current.
//!
//! Initial population scans discovered files breadth-first and follows
//! static imports. Incremental updates re-scan single files or adjust the
//! project configs and their document associations. Missing files are
//! removed from the index, never left stale.

use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use std::ops::AddAssign;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::events::{WorkspaceEvent, WorkspaceEventKind};
use super::fs;
use super::walker::FileWalker;
use crate::document::{DocumentPath, ScssDocument, is_source_file};
use crate::project_resolver::load_project_config;
use crate::storage::WorkspaceIndex;
use crate::symbols::{ImportRecord, extract};
use crate::syntax::parse;
use crate::{IndexError, IndexResult, Settings};

/// Counters returned by bulk operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub files_scanned: usize,
    pub files_missing: usize,
    pub configs_loaded: usize,
}

impl AddAssign for ScanStats {
    fn add_assign(&mut self, other: Self) {
        self.files_scanned += other.files_scanned;
        self.files_missing += other.files_missing;
        self.configs_loaded += other.configs_loaded;
    }
}

/// The only writer of the workspace index apart from query write-back.
#[derive(Debug)]
pub struct Scanner {
    settings: Arc<Settings>,
}

impl Scanner {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Discover configs and stylesheets under `root` and index them.
    ///
    /// Configs are registered first so aliases apply during the scan.
    pub async fn initialize(
        &self,
        index: &mut WorkspaceIndex,
        root: &Path,
    ) -> IndexResult<ScanStats> {
        let metadata = tokio::fs::metadata(root)
            .await
            .map_err(|source| IndexError::WorkspaceRead {
                path: root.to_path_buf(),
                source,
            })?;
        if !metadata.is_dir() {
            return Err(IndexError::WorkspaceRead {
                path: root.to_path_buf(),
                source: std::io::Error::other("not a directory"),
            });
        }

        let walker = FileWalker::new(self.settings.clone());
        let walk_root = root.to_path_buf();
        let (configs, sources) = tokio::task::spawn_blocking(move || {
            (
                walker.config_files(&walk_root),
                walker.source_files(&walk_root),
            )
        })
        .await
        .map_err(|e| IndexError::General(format!("File discovery failed: {e}")))?;

        let mut stats = ScanStats::default();
        for config in configs {
            self.add_config(index, &DocumentPath::new(config)).await;
            stats.configs_loaded += 1;
        }

        stats += self
            .scan_all(index, sources.into_iter().map(DocumentPath::new).collect())
            .await;

        info!(
            root = %root.display(),
            files = stats.files_scanned,
            missing = stats.files_missing,
            configs = stats.configs_loaded,
            "workspace indexed"
        );
        Ok(stats)
    }

    /// Initial population: scan `paths` and every static import they reach.
    /// Each path is scanned at most once per call, so import cycles end.
    pub async fn scan_all(&self, index: &mut WorkspaceIndex, paths: Vec<DocumentPath>) -> ScanStats {
        self.scan_queue(index, paths, true).await
    }

    /// Incremental scan: re-scan `paths`, following only imports that are
    /// not indexed yet.
    pub async fn scan(&self, index: &mut WorkspaceIndex, paths: Vec<DocumentPath>) -> ScanStats {
        self.scan_queue(index, paths, false).await
    }

    async fn scan_queue(
        &self,
        index: &mut WorkspaceIndex,
        seeds: Vec<DocumentPath>,
        rescan_known: bool,
    ) -> ScanStats {
        let mut stats = ScanStats::default();
        let mut visited: HashSet<DocumentPath> = HashSet::new();
        let mut queue: VecDeque<(DocumentPath, Option<String>)> =
            seeds.into_iter().map(|path| (path, None)).collect();

        while let Some((path, import_text)) = queue.pop_front() {
            if !visited.insert(path.clone()) {
                // Discovered as a seed before an importer reached it
                if let Some(text) = import_text {
                    if let Some(table) = index.get_mut(&path) {
                        table.document_import_path = text;
                    }
                }
                continue;
            }

            let Some(imports) = self
                .scan_file(index, &path, import_text.as_deref(), &mut stats)
                .await
            else {
                continue;
            };

            if !self.settings.indexing.scan_imported_files {
                continue;
            }

            for import in imports.iter().filter(|import| import.is_followable()) {
                let Some(target) = existing_candidate(import).await else {
                    debug!(importer = %path, target = %import.target, "import target not found");
                    continue;
                };

                let known = visited.contains(&target) || (!rescan_known && index.contains(&target));
                if known {
                    if let Some(table) = index.get_mut(&target) {
                        table.document_import_path = import.target.clone();
                    }
                    continue;
                }
                queue.push_back((target, Some(import.target.clone())));
            }
        }

        stats
    }

    /// Read, parse, extract and store one document. Returns its imports.
    async fn scan_file(
        &self,
        index: &mut WorkspaceIndex,
        path: &DocumentPath,
        import_text: Option<&str>,
        stats: &mut ScanStats,
    ) -> Option<Vec<ImportRecord>> {
        let Some(text) = fs::read_document(path).await else {
            if index.remove(path).is_some() {
                debug!(path = %path, "removed missing file from index");
            }
            stats.files_missing += 1;
            return None;
        };

        let document = ScssDocument::new(path.clone(), text);
        let tree = parse(&document.text);
        let config = index
            .config_for(path)
            .or_else(|| index.configs().nearest_for(path));
        let mut table = extract(&tree, &document, config);

        table.document_import_path = match import_text {
            Some(text) => text.to_string(),
            None => index
                .get(path)
                .map(|existing| existing.document_import_path.clone())
                .unwrap_or_default(),
        };

        debug!(
            path = %path,
            symbols = table.symbol_count(),
            imports = table.imports.len(),
            "scanned"
        );

        let imports = table.imports.clone();
        index.insert(table);
        stats.files_scanned += 1;
        Some(imports)
    }

    /// Apply one watcher event. Config files go to the config operations,
    /// stylesheets are re-scanned or removed, anything else is ignored
    /// unless a registered config extends it.
    pub async fn apply(
        &self,
        index: &mut WorkspaceIndex,
        event: &WorkspaceEvent,
        workspace_root: &DocumentPath,
    ) -> ScanStats {
        let mut stats = ScanStats::default();
        let Some(path) = DocumentPath::from_url(&event.uri) else {
            debug!(uri = %event.uri, "ignoring event for non-file uri");
            return stats;
        };

        if self.settings.project.is_config_file(path.as_path()) {
            match event.kind {
                WorkspaceEventKind::Created => {
                    self.add_config(index, &path).await;
                    stats.configs_loaded += 1;
                }
                WorkspaceEventKind::Changed => {
                    stats.configs_loaded += self.update_config(index, &path).await;
                }
                WorkspaceEventKind::Deleted => {
                    self.delete_config(index, &path, workspace_root).await;
                }
            }
        } else if is_source_file(&path) {
            match event.kind {
                WorkspaceEventKind::Created | WorkspaceEventKind::Changed => {
                    stats += self.scan(index, vec![path]).await;
                }
                WorkspaceEventKind::Deleted => {
                    if index.remove(&path).is_some() {
                        debug!(path = %path, "removed deleted file from index");
                    }
                }
            }
        } else if !index.configs().dependents_of(&path).is_empty() {
            stats.configs_loaded += self.update_config(index, &path).await;
        }

        stats
    }

    /// Register a new config and associate the documents it governs.
    pub async fn add_config(&self, index: &mut WorkspaceIndex, path: &DocumentPath) -> usize {
        let config = load_project_config(path).await;
        index.add_config(config)
    }

    /// Re-derive every config built from `path` in place. Associations are
    /// untouched. Returns the number of configs reloaded.
    pub async fn update_config(&self, index: &mut WorkspaceIndex, path: &DocumentPath) -> usize {
        let dependents = index.configs().dependents_of(path);
        if dependents.is_empty() {
            if self.settings.project.is_config_file(path.as_path()) {
                self.add_config(index, path).await;
                return 1;
            }
            return 0;
        }

        for config_path in &dependents {
            let config = load_project_config(config_path).await;
            index.replace_config(config);
        }
        debug!(config = %path, reloaded = dependents.len(), "config updated");
        dependents.len()
    }

    /// Unregister a config and move its documents to the nearest remaining
    /// ancestor config inside `workspace_root` (the root itself included).
    ///
    /// When the config's directory lies outside the root the documents stay
    /// unassociated and fall back to relative resolution.
    pub async fn delete_config(
        &self,
        index: &mut WorkspaceIndex,
        path: &DocumentPath,
        workspace_root: &DocumentPath,
    ) {
        let orphans = index.remove_config(path);
        for dependent in index.configs().dependents_of(path) {
            let config = load_project_config(&dependent).await;
            index.replace_config(config);
        }
        if orphans.is_empty() {
            return;
        }

        let dir = path.parent();
        if !dir.is_descendant_of(workspace_root) {
            warn!(
                config = %path,
                root = %workspace_root,
                "deleted config lies outside the workspace root; documents left unassociated"
            );
            return;
        }

        // Find the nearest config on disk that is not registered yet.
        let mut current = dir;
        loop {
            if index.configs().in_directory(&current).is_some() {
                break;
            }
            if let Some(found) = self.config_on_disk(&current, path).await {
                self.add_config(index, &found).await;
                break;
            }
            if &current == workspace_root {
                break;
            }
            let parent = current.parent();
            if parent == current {
                break;
            }
            current = parent;
        }

        let mut reassociated = 0;
        for orphan in &orphans {
            let nearest = index
                .configs()
                .nearest_for(orphan)
                .filter(|config| config.directory().is_descendant_of(workspace_root))
                .map(|config| config.config_path.clone());
            if let Some(config_path) = nearest {
                if index.associate(orphan, &config_path) {
                    reassociated += 1;
                }
            }
        }
        debug!(
            config = %path,
            orphans = orphans.len(),
            reassociated,
            "config deleted"
        );
    }

    async fn config_on_disk(&self, dir: &DocumentPath, deleted: &DocumentPath) -> Option<DocumentPath> {
        for name in &self.settings.project.config_file_names {
            let candidate = dir.join(name);
            if &candidate != deleted && fs::is_file(&candidate).await {
                return Some(candidate);
            }
        }
        None
    }
}

/// First file of the import's lookup order that exists.
async fn existing_candidate(import: &ImportRecord) -> Option<DocumentPath> {
    for candidate in import.candidates() {
        if is_source_file(&candidate) && fs::is_file(&candidate).await {
            return Some(candidate);
        }
    }
    None
}
