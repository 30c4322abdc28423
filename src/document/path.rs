//! Canonical document paths
//!
//! Every map in the workspace index is keyed by [`DocumentPath`]. URIs and raw
//! filesystem paths only exist at the boundary; both are normalized here so the
//! same file can never end up under two different keys.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use lsp_types::Url;
use serde::Serialize;

/// Absolute, lexically normalized filesystem path.
///
/// Equality and hashing are defined on the normalized form only. Construction
/// does not touch the filesystem, so paths of deleted or not-yet-created files
/// are representable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DocumentPath(PathBuf);

impl DocumentPath {
    /// Normalize `path`. Relative paths are anchored at the current directory.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path.is_absolute() {
            Self(normalize_path(path))
        } else {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
            Self(normalize_path(&cwd.join(path)))
        }
    }

    /// Build from a `file://` URI. Other schemes have no filesystem identity.
    pub fn from_url(url: &Url) -> Option<Self> {
        if url.scheme() != "file" {
            return None;
        }
        url.to_file_path().ok().map(Self::new)
    }

    pub fn to_url(&self) -> Option<Url> {
        Url::from_file_path(&self.0).ok()
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Directory containing this path. The root is its own parent.
    pub fn parent(&self) -> DocumentPath {
        match self.0.parent() {
            Some(parent) => Self(parent.to_path_buf()),
            None => self.clone(),
        }
    }

    pub fn join(&self, relative: impl AsRef<Path>) -> DocumentPath {
        Self(normalize_path(&self.0.join(relative)))
    }

    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name().and_then(|name| name.to_str())
    }

    pub fn extension(&self) -> Option<&str> {
        self.0.extension().and_then(|ext| ext.to_str())
    }

    /// True when `self` lies inside `dir` (or is `dir` itself).
    ///
    /// The relative path from `dir` to `self` must not climb upward.
    pub fn is_descendant_of(&self, dir: &DocumentPath) -> bool {
        relative_path(dir, self)
            .map(|rel| {
                !rel.components()
                    .any(|component| matches!(component, Component::ParentDir))
            })
            .unwrap_or(false)
    }

    /// Number of path components, used to rank nested configs.
    pub fn depth(&self) -> usize {
        self.0.components().count()
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<&Path> for DocumentPath {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<PathBuf> for DocumentPath {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

/// Lexical normalization: drops `.` and resolves `..` against earlier components.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::RootDir | Component::Normal(_) | Component::Prefix(_) => {
                normalized.push(component.as_os_str());
            }
        }
    }

    normalized
}

/// Relative path leading from directory `base` to `target`.
///
/// Returns `None` when the two paths live on different roots (Windows prefixes).
pub fn relative_path(base: &DocumentPath, target: &DocumentPath) -> Option<PathBuf> {
    let base: Vec<Component> = base.0.components().collect();
    let target: Vec<Component> = target.0.components().collect();

    if base.first() != target.first() {
        return None;
    }

    let common = base
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &target[common..] {
        relative.push(component.as_os_str());
    }
    Some(relative)
}
