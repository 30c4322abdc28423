//! Clickable targets for top-level `@use` statements.

use lsp_types::DocumentLink;

use crate::document::ScssDocument;
use crate::storage::WorkspaceIndex;
use crate::symbols::target_path;
use crate::syntax::{NodeKind, parse, unquote};

/// Links for every top-level `@use` in `document`.
///
/// Targets go through the alias table of the document's project config.
/// The link range spans the whole literal, quotes included.
pub fn links(index: &WorkspaceIndex, document: &ScssDocument) -> Vec<DocumentLink> {
    let tree = parse(&document.text);
    let config = index
        .config_for(&document.path)
        .or_else(|| index.configs().nearest_for(&document.path));

    let mut links = Vec::new();
    for &statement in tree.children(tree.root()) {
        if tree.kind(statement) != NodeKind::Use {
            continue;
        }
        let Some(&literal) = tree.link_literals(statement).first() else {
            continue;
        };

        let target = unquote(tree.text(literal));
        if target.is_empty() || target.starts_with("sass:") {
            continue;
        }

        let resolved = target_path(target, &document.path, config);

        let node = tree.node(literal);
        links.push(DocumentLink {
            range: document.range(node.offset, node.end()),
            target: resolved.to_url(),
            tooltip: None,
            data: None,
        });
    }
    links
}
