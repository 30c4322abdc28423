#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use stylescope::{DocumentPath, ScssDocument, Scanner, Settings, WorkspaceIndex};
use tempfile::TempDir;

/// A throwaway workspace on disk.
pub struct TestProject {
    pub dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    pub fn remove_file(&self, path: &str) -> PathBuf {
        let file_path = self.dir.path().join(path);
        fs::remove_file(&file_path).expect("Failed to remove file");
        file_path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn root(&self) -> DocumentPath {
        DocumentPath::new(self.dir.path())
    }

    pub fn doc(&self, path: &str) -> DocumentPath {
        DocumentPath::new(self.dir.path().join(path))
    }

    /// Open a file as an editor would see it.
    pub fn open(&self, path: &str) -> ScssDocument {
        let text = fs::read_to_string(self.dir.path().join(path)).expect("Failed to read file");
        ScssDocument::new(self.doc(path), text)
    }

    pub fn scanner(&self) -> Scanner {
        self.scanner_with(Settings::default())
    }

    pub fn scanner_with(&self, settings: Settings) -> Scanner {
        Scanner::new(Arc::new(settings))
    }

    /// Index the whole project with default settings.
    pub async fn index(&self) -> (Scanner, WorkspaceIndex) {
        let scanner = self.scanner();
        let mut index = WorkspaceIndex::new();
        scanner
            .initialize(&mut index, self.path())
            .await
            .expect("Failed to index project");
        (scanner, index)
    }
}

/// Byte offset just after the first occurrence of `needle`.
pub fn offset_after(text: &str, needle: &str) -> usize {
    text.find(needle).expect("needle not found") + needle.len()
}
