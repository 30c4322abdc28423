use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::debug;

use crate::document::DocumentPath;
use crate::project_resolver::{ConfigRegistry, ProjectConfig};
use crate::symbols::SymbolTable;

/// In-memory index of one workspace session.
///
/// Three maps: document to symbol table, config path to config (the
/// [`ConfigRegistry`]), and document to the config governing its aliases.
/// Every association points at a registered config.
#[derive(Debug, Default)]
pub struct WorkspaceIndex {
    documents: IndexMap<DocumentPath, SymbolTable>,
    configs: ConfigRegistry,
    associations: HashMap<DocumentPath, DocumentPath>,
}

impl WorkspaceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    // ----- documents -----

    /// Store a table. New documents are associated with their nearest config.
    pub fn insert(&mut self, table: SymbolTable) {
        let path = table.path.clone();
        let is_new = !self.documents.contains_key(&path);
        self.documents.insert(path.clone(), table);

        if is_new || !self.associations.contains_key(&path) {
            if let Some(config) = self.configs.nearest_for(&path) {
                let config_path = config.config_path.clone();
                self.associations.insert(path, config_path);
            }
        }
    }

    /// Store a table produced by a query, keeping the import text recorded
    /// by whichever importer scanned the document.
    pub fn write_back(&mut self, mut table: SymbolTable) {
        if let Some(existing) = self.documents.get(&table.path) {
            table.document_import_path = existing.document_import_path.clone();
        }
        self.insert(table);
    }

    pub fn get(&self, path: &DocumentPath) -> Option<&SymbolTable> {
        self.documents.get(path)
    }

    pub fn get_mut(&mut self, path: &DocumentPath) -> Option<&mut SymbolTable> {
        self.documents.get_mut(path)
    }

    pub fn contains(&self, path: &DocumentPath) -> bool {
        self.documents.contains_key(path)
    }

    /// Drop a document and its association. Other entries keep their order.
    pub fn remove(&mut self, path: &DocumentPath) -> Option<SymbolTable> {
        self.associations.remove(path);
        self.documents.shift_remove(path)
    }

    /// Tables in index order (first scanned first).
    pub fn documents(&self) -> impl Iterator<Item = &SymbolTable> {
        self.documents.values()
    }

    pub fn paths(&self) -> impl Iterator<Item = &DocumentPath> {
        self.documents.keys()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    // ----- configs -----

    pub fn configs(&self) -> &ConfigRegistry {
        &self.configs
    }

    /// Config governing `document`'s aliases, if any.
    pub fn config_for(&self, document: &DocumentPath) -> Option<&ProjectConfig> {
        self.associations
            .get(document)
            .and_then(|config_path| self.configs.get(config_path))
    }

    pub fn association(&self, document: &DocumentPath) -> Option<&DocumentPath> {
        self.associations.get(document)
    }

    /// Register a new config and take over every indexed descendant for
    /// which it is nearer than the current association.
    pub fn add_config(&mut self, config: ProjectConfig) -> usize {
        let config_path = config.config_path.clone();
        let dir = config.directory();
        let depth = dir.depth();
        self.configs.insert(config);

        let mut reassociated = 0;
        for path in self.documents.keys() {
            if !path.is_descendant_of(&dir) {
                continue;
            }
            let current_depth = self
                .associations
                .get(path)
                .map(|current| current.parent().depth());
            let nearer = match current_depth {
                None => true,
                Some(current) => current < depth,
            };
            if nearer {
                self.associations.insert(path.clone(), config_path.clone());
                reassociated += 1;
            }
        }

        debug!(config = %config_path, reassociated, "config added");
        reassociated
    }

    /// Replace a config's alias table in place. Associations are untouched.
    pub fn replace_config(&mut self, config: ProjectConfig) {
        self.configs.insert(config);
    }

    /// Unregister a config. Returns the documents that lost their association.
    pub fn remove_config(&mut self, config_path: &DocumentPath) -> Vec<DocumentPath> {
        self.configs.remove(config_path);

        let orphans: Vec<DocumentPath> = self
            .associations
            .iter()
            .filter(|(_, config)| *config == config_path)
            .map(|(document, _)| document.clone())
            .collect();
        for document in &orphans {
            self.associations.remove(document);
        }
        orphans
    }

    /// Point `document` at a registered config. Unknown configs are ignored.
    pub fn associate(&mut self, document: &DocumentPath, config_path: &DocumentPath) -> bool {
        if !self.configs.contains(config_path) || !self.documents.contains_key(document) {
            return false;
        }
        self.associations
            .insert(document.clone(), config_path.clone());
        true
    }
}
