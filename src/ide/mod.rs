//! Query providers: definition, completion and links.
//!
//! Each query parses the current document fresh. Definition and completion
//! write the new symbol table back into the index, so a stale entry for the
//! document being edited heals itself on the next query.

pub mod color;
pub mod completion;
pub mod definition;
pub mod links;

pub use completion::complete;
pub use definition::find_definition;
pub use links::links;

use crate::document::ScssDocument;
use crate::storage::WorkspaceIndex;
use crate::symbols::extract;
use crate::syntax::{SyntaxTree, parse};

/// Parse `document` and store its fresh symbol table.
pub(crate) fn refresh(index: &mut WorkspaceIndex, document: &ScssDocument) -> SyntaxTree {
    let tree = parse(&document.text);
    let config = index
        .config_for(&document.path)
        .or_else(|| index.configs().nearest_for(&document.path));
    let table = extract(&tree, document, config);
    index.write_back(table);
    tree
}
