//! Async filesystem access used by the scanner and query providers.
//!
//! Every call is a suspension point. Failures degrade to "does not exist":
//! a missing file is routine, anything else is logged once and ignored.

use std::io::ErrorKind;
use tracing::{debug, warn};

use crate::document::DocumentPath;

/// Read a document's text. `None` when it is missing or unreadable.
pub async fn read_document(path: &DocumentPath) -> Option<String> {
    match tokio::fs::read_to_string(path.as_path()).await {
        Ok(text) => Some(text),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path, "file does not exist");
            None
        }
        Err(e) => {
            warn!(path = %path, "treating unreadable file as missing: {e}");
            None
        }
    }
}

pub async fn is_file(path: &DocumentPath) -> bool {
    tokio::fs::metadata(path.as_path())
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// List a directory, sorted by name. Unreadable directories list as empty.
pub async fn list_dir(dir: &DocumentPath) -> Vec<DirEntry> {
    let mut entries = Vec::new();
    let mut reader = match tokio::fs::read_dir(dir.as_path()).await {
        Ok(reader) => reader,
        Err(e) => {
            debug!(dir = %dir, "cannot list directory: {e}");
            return entries;
        }
    };

    while let Ok(Some(entry)) = reader.next_entry().await {
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        let is_dir = entry
            .file_type()
            .await
            .map(|ft| ft.is_dir())
            .unwrap_or(false);
        entries.push(DirEntry { name, is_dir });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}
