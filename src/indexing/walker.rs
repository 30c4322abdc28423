//! File system walker for discovering stylesheets and project configs
//!
//! This module provides directory traversal with support for:
//! - .gitignore rules
//! - Exclude globs from configuration
//! - A maximum depth
//! - Hidden file handling

use crate::Settings;
use crate::document::SOURCE_EXTENSION;
use ignore::WalkBuilder;
use ignore::overrides::{Override, OverrideBuilder};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

/// Walks directories to find files to index
#[derive(Debug)]
pub struct FileWalker {
    settings: Arc<Settings>,
}

impl FileWalker {
    /// Create a new file walker with the given settings
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    /// Stylesheets of the indexed dialect under `root`
    pub fn source_files(&self, root: &Path) -> Vec<PathBuf> {
        self.walk(root, |path| {
            path.extension().and_then(|ext| ext.to_str()) == Some(SOURCE_EXTENSION)
        })
    }

    /// Project config files under `root`
    pub fn config_files(&self, root: &Path) -> Vec<PathBuf> {
        let project = self.settings.project.clone();
        self.walk(root, move |path| project.is_config_file(path))
    }

    /// True when `path` matches one of the exclude globs relative to `root`
    pub fn is_excluded(&self, root: &Path, path: &Path) -> bool {
        self.overrides(root)
            .map(|overrides| overrides.matched(path, false).is_ignore())
            .unwrap_or(false)
    }

    /// Exclude globs as ignore-style overrides (`!` marks an exclusion)
    fn overrides(&self, root: &Path) -> Option<Override> {
        let mut builder = OverrideBuilder::new(root);
        for pattern in &self.settings.indexing.exclude {
            if let Err(e) = builder.add(&format!("!{pattern}")) {
                warn!("ignoring invalid exclude pattern '{pattern}': {e}");
            }
        }
        builder.build().ok()
    }

    fn walk(&self, root: &Path, keep: impl Fn(&Path) -> bool) -> Vec<PathBuf> {
        let mut builder = WalkBuilder::new(root);

        builder
            .hidden(true) // Skip hidden files and directories
            .git_ignore(true) // Respect .gitignore files
            .git_global(true) // Respect global gitignore
            .git_exclude(true) // Respect .git/info/exclude
            .follow_links(false)
            .max_depth(self.settings.indexing.max_depth)
            .require_git(false); // Allow gitignore to work in non-git directories

        builder.add_custom_ignore_filename(".stylescopeignore");

        if let Some(overrides) = self.overrides(root) {
            builder.overrides(overrides);
        }

        let mut files: Vec<PathBuf> = builder
            .build()
            .filter_map(Result::ok) // Skip files we can't access
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .map(|entry| entry.into_path())
            .filter(|path| keep(path))
            .collect();

        files.sort();
        files
    }
}
