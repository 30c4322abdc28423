//! File and folder suggestions inside import strings.

use lsp_types::{CompletionItem, CompletionItemKind};
use regex::Regex;
use std::sync::LazyLock;

use crate::document::{SOURCE_EXTENSION, ScssDocument};
use crate::indexing::fs::list_dir;
use crate::project_resolver::{ProjectConfig, resolve};
use crate::syntax::{NodeKind, SyntaxTree};

/// An import string that has no closing quote yet.
static OPEN_IMPORT_STRING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*@(?:import|use|forward)\s+["']([^"']*)$"#).expect("Invalid regex")
});

/// Text typed between the opening quote of an import string and the cursor.
pub(super) fn typed_import_path(
    tree: &SyntaxTree,
    document: &ScssDocument,
    offset: usize,
) -> Option<String> {
    if let Some(node) = tree.node_at_offset(offset) {
        let inside_link = tree.kind(node) == NodeKind::StringLiteral
            && tree
                .parent(node)
                .is_some_and(|parent| tree.kind(parent).is_link_statement());
        if inside_link {
            let literal = tree.node(node);
            if offset <= literal.offset || offset >= literal.end() {
                return None;
            }
            return document
                .text
                .get(literal.offset + 1..offset)
                .map(str::to_string);
        }
    }

    let before = document.text.get(..offset)?;
    let line = &before[before.rfind('\n').map(|i| i + 1).unwrap_or(0)..];
    OPEN_IMPORT_STRING
        .captures(line)
        .map(|captures| captures[1].to_string())
}

/// Folders and stylesheets in the directory `typed` points into.
pub(super) async fn complete_import_path(
    document: &ScssDocument,
    typed: &str,
    config: Option<&ProjectConfig>,
) -> Vec<CompletionItem> {
    let (dir_part, segment) = match typed.rfind('/') {
        Some(i) => (&typed[..=i], &typed[i + 1..]),
        None => ("", typed),
    };
    let dir = if dir_part.is_empty() {
        document.path.parent()
    } else {
        resolve(dir_part, &document.path, config)
    };

    let source_suffix = format!(".{SOURCE_EXTENSION}");
    let mut items: Vec<CompletionItem> = list_dir(&dir)
        .await
        .into_iter()
        .filter(|entry| !entry.name.starts_with('.') && entry.name.starts_with(segment))
        .filter_map(|entry| {
            if entry.is_dir {
                return Some(CompletionItem {
                    sort_text: Some(format!("0{}", entry.name)),
                    label: entry.name,
                    kind: Some(CompletionItemKind::FOLDER),
                    ..CompletionItem::default()
                });
            }

            let stem = entry.name.strip_suffix(&source_suffix)?;
            if dir.join(&entry.name) == document.path {
                return None;
            }
            let label = stem.strip_suffix(".module").unwrap_or(stem).to_string();
            Some(CompletionItem {
                sort_text: Some(format!("1{label}")),
                label,
                kind: Some(CompletionItemKind::FILE),
                ..CompletionItem::default()
            })
        })
        .collect();

    items.sort_by(|a, b| a.sort_text.cmp(&b.sort_text));
    items
}
