//! Go-to-definition across indexed documents.

use lsp_types::{Location, Position, Range};
use tracing::debug;

use crate::document::ScssDocument;
use crate::storage::WorkspaceIndex;
use crate::syntax::{NodeId, NodeKind, SyntaxTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Mixin,
    Function,
}

/// What the cursor points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub kind: SymbolKind,
    pub name: String,
    pub offset: usize,
}

/// Classify the node under `offset`. Only variable references and the names
/// of mixin includes and function calls qualify.
pub fn reference_at(tree: &SyntaxTree, offset: usize) -> Option<Reference> {
    let node = tree.node_at_offset(offset)?;
    let kind = match tree.kind(node) {
        NodeKind::VariableName => {
            let parent = tree.parent(node).map(|p| tree.kind(p));
            match parent {
                Some(
                    NodeKind::Parameter | NodeKind::VariableDeclaration | NodeKind::KeywordArgument,
                ) => return None,
                _ => SymbolKind::Variable,
            }
        }
        NodeKind::Identifier => callable_kind(tree, node)?,
        _ => return None,
    };

    Some(Reference {
        kind,
        name: tree.text(node).to_string(),
        offset: tree.node(node).offset,
    })
}

/// Walks at most two levels up looking for the include or call `node` names.
fn callable_kind(tree: &SyntaxTree, node: NodeId) -> Option<SymbolKind> {
    tree.ancestors(node).take(2).find_map(|ancestor| {
        let kind = match tree.kind(ancestor) {
            NodeKind::MixinReference => SymbolKind::Mixin,
            NodeKind::FunctionCall => SymbolKind::Function,
            _ => return None,
        };
        (tree.name_node(ancestor) == Some(node)).then_some(kind)
    })
}

/// Find where the symbol under `offset` is declared.
///
/// Searches every indexed document except `document` in index order and
/// returns the first declaration with the same kind and name. No ranking
/// is applied.
pub fn find_definition(
    index: &mut WorkspaceIndex,
    document: &ScssDocument,
    offset: usize,
) -> Option<Location> {
    let tree = super::refresh(index, document);
    let reference = reference_at(&tree, offset)?;
    let reference_position = document.position_at(reference.offset);

    for table in index.documents() {
        if table.path == document.path {
            continue;
        }

        let found = match reference.kind {
            SymbolKind::Variable => table
                .variables
                .iter()
                .find(|v| v.name == reference.name && v.position != reference_position)
                .map(|v| v.position),
            SymbolKind::Mixin => table
                .mixins
                .iter()
                .find(|m| m.name == reference.name && m.position != reference_position)
                .map(|m| m.position),
            SymbolKind::Function => table
                .functions
                .iter()
                .find(|f| f.name == reference.name && f.position != reference_position)
                .map(|f| f.position),
        };

        if let Some(start) = found {
            let uri = table.path.to_url()?;
            let width = reference.name.encode_utf16().count() as u32;
            let end = Position::new(start.line, start.character + width);
            debug!(name = %reference.name, target = %table.path, "definition found");
            return Some(Location::new(uri, Range::new(start, end)));
        }
    }

    debug!(name = %reference.name, "no definition found");
    None
}
