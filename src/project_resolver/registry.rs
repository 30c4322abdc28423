//! Registry of loaded project configs, keyed by config file path

use indexmap::IndexMap;

use super::ProjectConfig;
use crate::document::DocumentPath;

/// Loaded project configs in insertion order.
///
/// Holds no symbol data; the workspace index keeps the document to config
/// associations next to it.
#[derive(Debug, Default)]
pub struct ConfigRegistry {
    configs: IndexMap<DocumentPath, ProjectConfig>,
}

impl ConfigRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `config.config_path`.
    pub fn insert(&mut self, config: ProjectConfig) {
        self.configs.insert(config.config_path.clone(), config);
    }

    pub fn get(&self, path: &DocumentPath) -> Option<&ProjectConfig> {
        self.configs.get(path)
    }

    pub fn contains(&self, path: &DocumentPath) -> bool {
        self.configs.contains_key(path)
    }

    pub fn remove(&mut self, path: &DocumentPath) -> Option<ProjectConfig> {
        self.configs.shift_remove(path)
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Configs built from `path`, either directly or through `extends`.
    pub fn dependents_of(&self, path: &DocumentPath) -> Vec<DocumentPath> {
        self.configs
            .values()
            .filter(|config| config.depends_on(path))
            .map(|config| config.config_path.clone())
            .collect()
    }

    /// The registered config whose directory is the nearest ancestor of
    /// `document`.
    pub fn nearest_for(&self, document: &DocumentPath) -> Option<&ProjectConfig> {
        self.configs
            .values()
            .filter(|config| document.is_descendant_of(&config.directory()))
            .max_by_key(|config| config.directory().depth())
    }

    /// Registered config located directly in `dir`, if any.
    pub fn in_directory(&self, dir: &DocumentPath) -> Option<&ProjectConfig> {
        self.configs.values().find(|config| &config.directory() == dir)
    }
}
