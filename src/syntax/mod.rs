//! SCSS syntax: tokens, arena tree and the recovering parser.
//!
//! The rest of the crate only needs [`parse`] and the [`SyntaxTree`]
//! accessors; nothing outside this module builds nodes.

pub mod lexer;
pub mod parser;
pub mod tree;

pub use parser::parse;
pub use tree::{Node, NodeId, NodeKind, SyntaxTree, unquote};
