//! Per-document symbol tables
//!
//! A [`SymbolTable`] is everything the workspace index keeps about one
//! stylesheet: declared variables, mixins and functions, and the imports
//! that link it to other stylesheets. Parsed trees are never stored.

mod extract;

pub use extract::extract;

use crate::document::{DocumentPath, FOREIGN_EXTENSION, SOURCE_EXTENSION};
use crate::project_resolver::{ProjectConfig, resolve};
use lsp_types::Position;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    pub name: String,
    pub offset: usize,
    pub position: Position,
    /// Declared value as written, not evaluated.
    pub value: Option<String>,
    /// Set when the variable is declared inside a mixin body.
    pub owning_mixin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub offset: usize,
    pub default_value: Option<String>,
}

/// A mixin or function declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Callable {
    pub name: String,
    pub offset: usize,
    pub position: Position,
    pub parameters: Vec<Parameter>,
}

impl Callable {
    /// Signature as shown to users, e.g. `button($size, $color: blue)`.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|p| match &p.default_value {
                Some(default) => format!("{}: {default}", p.name),
                None => p.name.clone(),
            })
            .collect();
        format!("{}({})", self.name, params.join(", "))
    }
}

pub type Mixin = Callable;
pub type Function = Callable;

/// Which statement produced an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    Import,
    Use,
    Forward,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRecord {
    pub kind: ImportKind,
    /// Target exactly as written, without quotes.
    pub target: String,
    /// Alias-resolved absolute target.
    pub target_path: DocumentPath,
    /// Contains interpolation or glob syntax.
    pub dynamic: bool,
    /// Plain CSS (or a remote URL); recorded but never followed.
    pub css: bool,
}

impl ImportRecord {
    /// Built-in modules such as `sass:math` have no file behind them.
    pub fn is_builtin(&self) -> bool {
        self.target.starts_with("sass:")
    }

    /// Static stylesheet imports are the ones the scanner follows.
    pub fn is_followable(&self) -> bool {
        !self.dynamic && !self.css && !self.is_builtin()
    }

    /// Files the import may refer to, in lookup order: the file itself, its
    /// partial, then an index file inside a directory of that name.
    pub fn candidates(&self) -> Vec<DocumentPath> {
        if self.target_path.extension() != Some(SOURCE_EXTENSION) {
            return vec![self.target_path.clone()];
        }

        let file_name = self.target_path.file_name().unwrap_or_default();
        let stem = file_name
            .strip_suffix(&format!(".{SOURCE_EXTENSION}"))
            .unwrap_or(file_name)
            .to_string();
        let dir = self.target_path.parent();

        let mut candidates = vec![self.target_path.clone()];
        if !stem.starts_with('_') {
            candidates.push(dir.join(format!("_{stem}.{SOURCE_EXTENSION}")));
        }
        let nested = dir.join(&stem);
        candidates.push(nested.join(format!("_index.{SOURCE_EXTENSION}")));
        candidates.push(nested.join(format!("index.{SOURCE_EXTENSION}")));
        candidates
    }

    /// True when `path` is one of the files this import can load.
    pub fn matches(&self, path: &DocumentPath) -> bool {
        self.candidates().iter().any(|candidate| candidate == path)
    }
}

/// True when an import target is dynamic.
pub(crate) fn is_dynamic_target(target: &str) -> bool {
    target.contains("#{") || target.contains('*')
}

/// True when an import target is a foreign stylesheet.
pub(crate) fn is_css_target(target: &str) -> bool {
    let lower = target.to_ascii_lowercase();
    lower.ends_with(&format!(".{FOREIGN_EXTENSION}"))
        || lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("//")
        || lower.starts_with("url(")
}

/// Path an import target points at: the alias-resolved text, with `.scss`
/// appended unless it already names a stylesheet.
pub fn target_path(
    target: &str,
    importer: &DocumentPath,
    config: Option<&ProjectConfig>,
) -> DocumentPath {
    let resolved = resolve(target, importer, config);
    let has_extension = target.ends_with(&format!(".{SOURCE_EXTENSION}"))
        || target.ends_with(&format!(".{FOREIGN_EXTENSION}"));
    if has_extension || is_css_target(target) {
        resolved
    } else {
        DocumentPath::new(format!("{resolved}.{SOURCE_EXTENSION}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolTable {
    pub path: DocumentPath,
    /// Import text used by whichever importer scanned this document last.
    /// Empty for documents reached by discovery.
    pub document_import_path: String,
    pub variables: Vec<Variable>,
    pub mixins: Vec<Mixin>,
    pub functions: Vec<Function>,
    pub imports: Vec<ImportRecord>,
}

impl SymbolTable {
    pub fn new(path: DocumentPath) -> Self {
        Self {
            path,
            document_import_path: String::new(),
            variables: Vec::new(),
            mixins: Vec::new(),
            functions: Vec::new(),
            imports: Vec::new(),
        }
    }

    pub fn has_use(&self) -> bool {
        self.imports.iter().any(|i| i.kind == ImportKind::Use)
    }

    pub fn has_legacy_import(&self) -> bool {
        self.imports.iter().any(|i| i.kind == ImportKind::Import)
    }

    /// True when one of this document's imports loads `path`.
    pub fn imports_document(&self, path: &DocumentPath) -> bool {
        self.imports.iter().any(|import| import.matches(path))
    }

    pub fn symbol_count(&self) -> usize {
        self.variables.len() + self.mixins.len() + self.functions.len()
    }
}
