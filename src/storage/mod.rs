//! Session-scoped, in-memory storage. Nothing is persisted.

mod workspace;

pub use workspace::WorkspaceIndex;
