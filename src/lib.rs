//! Workspace symbol index and resolver for SCSS.
//!
//! Stylesheets are parsed into syntax trees, reduced to symbol tables and
//! kept in a [`WorkspaceIndex`] that the [`Scanner`] populates and keeps
//! current. Path aliases come from the workspace's `tsconfig.json` /
//! `jsconfig.json` files. The [`ide`] module answers definition,
//! completion and link queries against the index.

pub mod config;
pub mod document;
pub mod error;
pub mod ide;
pub mod indexing;
pub mod project_resolver;
pub mod storage;
pub mod symbols;
pub mod syntax;

// Explicit exports for better API clarity
pub use config::Settings;
pub use document::{DocumentPath, ScssDocument};
pub use error::{IndexError, IndexResult};
pub use indexing::Scanner;
pub use storage::WorkspaceIndex;
pub use symbols::SymbolTable;
