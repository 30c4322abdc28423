//! Documents as seen by queries: canonical path, text and line index.

mod line_index;
mod path;

pub use line_index::LineIndex;
pub use path::{DocumentPath, normalize_path, relative_path};

use lsp_types::{Position, Range};

/// Extension of the indexed stylesheet dialect.
pub const SOURCE_EXTENSION: &str = "scss";

/// Extension of foreign stylesheets that are recorded but never followed.
pub const FOREIGN_EXTENSION: &str = "css";

/// The "current document" of a query.
#[derive(Debug, Clone)]
pub struct ScssDocument {
    pub path: DocumentPath,
    pub text: String,
    line_index: LineIndex,
}

impl ScssDocument {
    pub fn new(path: DocumentPath, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            line_index: LineIndex::new(&text),
            path,
            text,
        }
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn position_at(&self, offset: usize) -> Position {
        self.line_index.position(&self.text, offset)
    }

    pub fn offset_at(&self, position: Position) -> usize {
        self.line_index
            .offset(&self.text, position)
            .unwrap_or(self.text.len())
    }

    pub fn range(&self, start: usize, end: usize) -> Range {
        self.line_index.range(&self.text, start, end)
    }
}

/// True for paths of the indexed dialect.
pub fn is_source_file(path: &DocumentPath) -> bool {
    path.extension() == Some(SOURCE_EXTENSION)
}
