//! Completion for variables, mixins, functions and import paths.

mod context;
mod import_path;

pub use context::CompletionContext;

use lsp_types::{
    CompletionItem, CompletionItemKind, CompletionList, Documentation, Position, Range, TextEdit,
};
use tracing::debug;

use crate::config::CompletionConfig;
use crate::document::{DocumentPath, SOURCE_EXTENSION, ScssDocument, relative_path};
use crate::ide::color::normalize_color;
use crate::storage::WorkspaceIndex;
use crate::symbols::{Callable, SymbolTable, Variable};
use crate::syntax::{NodeKind, SyntaxTree};

/// Completion items at `offset` in `document`.
///
/// Inside the string of an import statement this lists files and folders.
/// Elsewhere it offers symbols from every indexed document, marking the ones
/// the document does not import.
pub async fn complete(
    index: &mut WorkspaceIndex,
    document: &ScssDocument,
    offset: usize,
    settings: &CompletionConfig,
) -> CompletionList {
    let tree = super::refresh(index, document);

    if let Some(typed) = import_path::typed_import_path(&tree, document, offset) {
        let config = index
            .config_for(&document.path)
            .or_else(|| index.configs().nearest_for(&document.path));
        let items = import_path::complete_import_path(document, &typed, config).await;
        return CompletionList {
            is_incomplete: false,
            items,
        };
    }

    let context = CompletionContext::detect(
        &document.text,
        offset,
        &settings.suggest_functions_in_string_context_after_symbols,
    );
    if context.comment {
        return empty_list();
    }

    let Some(current) = index.get(&document.path) else {
        return empty_list();
    };
    let builder = ItemBuilder {
        document,
        current,
        settings,
        enclosing_mixins: enclosing_mixins(&tree, offset),
        use_insertion: use_insertion_offset(&tree, document),
    };

    let mut items = Vec::new();
    let tables = std::iter::once(current).chain(
        index
            .documents()
            .filter(|table| table.path != document.path),
    );
    for table in tables {
        let implicit = builder.is_implicit(table);
        if implicit && settings.suggest_from_use_only && current.has_use() {
            continue;
        }

        if context.variable && settings.suggest_variables {
            items.extend(
                table
                    .variables
                    .iter()
                    .filter(|variable| builder.variable_visible(table, variable))
                    .map(|variable| builder.variable_item(table, variable, implicit)),
            );
        }
        if context.mixin && settings.suggest_mixins {
            items.extend(
                table
                    .mixins
                    .iter()
                    .map(|mixin| builder.callable_item(table, mixin, implicit, false)),
            );
        }
        if context.function && settings.suggest_functions {
            items.extend(
                table
                    .functions
                    .iter()
                    .map(|function| builder.callable_item(table, function, implicit, true)),
            );
        }
    }

    debug!(?context, count = items.len(), "completion items");
    CompletionList {
        is_incomplete: false,
        items,
    }
}

fn empty_list() -> CompletionList {
    CompletionList {
        is_incomplete: false,
        items: Vec::new(),
    }
}

struct ItemBuilder<'a> {
    document: &'a ScssDocument,
    current: &'a SymbolTable,
    settings: &'a CompletionConfig,
    enclosing_mixins: Vec<String>,
    /// Where a missing `@use` goes, when the document only uses `@use`
    use_insertion: Option<usize>,
}

impl ItemBuilder<'_> {
    /// Symbols from a document the current one neither is nor imports.
    /// A document without imports sees everything as explicit.
    fn is_implicit(&self, table: &SymbolTable) -> bool {
        !self.current.imports.is_empty()
            && table.path != self.document.path
            && !self.current.imports_document(&table.path)
    }

    /// Mixin-local variables only show up inside their own mixin.
    fn variable_visible(&self, table: &SymbolTable, variable: &Variable) -> bool {
        match &variable.owning_mixin {
            None => true,
            Some(mixin) => {
                table.path == self.document.path && self.enclosing_mixins.contains(mixin)
            }
        }
    }

    fn detail(&self, table: &SymbolTable, implicit: bool) -> String {
        let from = relative_path(&self.document.path.parent(), &table.path)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| table.path.to_string());
        if implicit && !self.settings.implicitly_label.is_empty() {
            format!("{} {from}", self.settings.implicitly_label)
        } else {
            from
        }
    }

    fn variable_item(
        &self,
        table: &SymbolTable,
        variable: &Variable,
        implicit: bool,
    ) -> CompletionItem {
        let value = variable.value.clone().unwrap_or_default();
        let color = normalize_color(&value);

        let additional_text_edits = if implicit {
            self.use_edit(&table.path).map(|edit| vec![edit])
        } else {
            None
        };

        CompletionItem {
            label: variable.name.clone(),
            kind: Some(if color.is_some() {
                CompletionItemKind::COLOR
            } else {
                CompletionItemKind::VARIABLE
            }),
            detail: Some(self.detail(table, implicit)),
            documentation: Some(Documentation::String(color.unwrap_or(value))),
            additional_text_edits,
            ..CompletionItem::default()
        }
    }

    fn callable_item(
        &self,
        table: &SymbolTable,
        callable: &Callable,
        implicit: bool,
        is_function: bool,
    ) -> CompletionItem {
        let (kind, insert_text) = if is_function {
            (CompletionItemKind::INTERFACE, format!("{}()", callable.name))
        } else {
            (CompletionItemKind::FUNCTION, callable.name.clone())
        };

        CompletionItem {
            label: callable.name.clone(),
            kind: Some(kind),
            detail: Some(self.detail(table, implicit)),
            documentation: Some(Documentation::String(callable.signature())),
            insert_text: Some(insert_text),
            ..CompletionItem::default()
        }
    }

    /// Inserts `@use '<path>';` after the last existing `@use`.
    fn use_edit(&self, target: &DocumentPath) -> Option<TextEdit> {
        if self.current.has_legacy_import() {
            return None;
        }
        let offset = self.use_insertion?;
        let module = use_module_path(&self.document.path, target)?;
        let position: Position = self.document.position_at(offset);
        Some(TextEdit::new(
            Range::new(position, position),
            format!("\n@use '{module}';"),
        ))
    }
}

/// Names of mixins whose body contains `offset`, innermost first.
fn enclosing_mixins(tree: &SyntaxTree, offset: usize) -> Vec<String> {
    let Some(node) = tree.node_at_offset(offset) else {
        return Vec::new();
    };
    std::iter::once(node)
        .chain(tree.ancestors(node))
        .filter(|&id| tree.kind(id) == NodeKind::MixinDeclaration)
        .filter_map(|id| tree.name(id).map(str::to_string))
        .collect()
}

/// End of the line holding the last top-level `@use`.
fn use_insertion_offset(tree: &SyntaxTree, document: &ScssDocument) -> Option<usize> {
    let last_use = tree
        .children(tree.root())
        .iter()
        .copied()
        .filter(|&id| tree.kind(id) == NodeKind::Use)
        .last()?;
    let end = tree.node(last_use).end();
    let line_end = document.text[end..]
        .find('\n')
        .map(|i| end + i)
        .unwrap_or(document.text.len());
    Some(line_end)
}

/// Module path `@use` would load `target` by, written from `from`'s directory.
fn use_module_path(from: &DocumentPath, target: &DocumentPath) -> Option<String> {
    let relative = relative_path(&from.parent(), target)?;
    let mut segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    let file = segments.pop()?;
    let stem = file
        .strip_suffix(&format!(".{SOURCE_EXTENSION}"))
        .unwrap_or(&file);
    let stem = stem.strip_prefix('_').unwrap_or(stem);
    if stem != "index" || segments.is_empty() {
        segments.push(stem.to_string());
    }
    Some(segments.join("/"))
}
