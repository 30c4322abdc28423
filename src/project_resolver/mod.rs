//! Project configuration resolver
//!
//! Reads path-alias configuration (`tsconfig.json`, `jsconfig.json`) and
//! rewrites import paths with it. This answers "which alias table governs
//! this stylesheet?" and "where does `@ui/button` point?".
//!
//! Configuration problems never reach callers of the index: a config that
//! cannot be read or parsed is stored with an empty alias table.

pub mod alias;
pub mod registry;
pub mod tsconfig;

pub use alias::resolve;
pub use registry::ConfigRegistry;
pub use tsconfig::{load_project_config, parse_jsonc_tsconfig};

use crate::document::DocumentPath;
use serde::Serialize;
use std::path::PathBuf;

/// One entry of `compilerOptions.paths` after wildcard markers are stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasRule {
    /// Import prefix, e.g. `@ui/` for `@ui/*`.
    pub prefix: String,
    /// Replacement prefixes in declaration order. Only the first is used.
    pub substitutions: Vec<String>,
}

/// A parsed project config with its `extends` chain already merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectConfig {
    pub config_path: DocumentPath,
    /// Child aliases first, then inherited ones.
    pub aliases: Vec<AliasRule>,
    /// Every config file read to build this entry, starting with
    /// `config_path` itself.
    pub extends_chain: Vec<DocumentPath>,
}

impl ProjectConfig {
    /// A config without aliases. Used when the file is missing or malformed.
    pub fn empty(config_path: DocumentPath) -> Self {
        Self {
            extends_chain: vec![config_path.clone()],
            config_path,
            aliases: Vec::new(),
        }
    }

    /// Directory the config governs.
    pub fn directory(&self) -> DocumentPath {
        self.config_path.parent()
    }

    /// True when `path` is this config or one of the configs it extends.
    pub fn depends_on(&self, path: &DocumentPath) -> bool {
        self.extends_chain.iter().any(|p| p == path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    /// Config file could not be read
    #[error("config io error at '{path}': {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Config file is not valid JSON(C)
    #[error("invalid project config '{path}': {details}")]
    InvalidConfig { path: PathBuf, details: String },
    #[error("circular extends chain detected at '{path}'")]
    CircularExtends { path: PathBuf },
}

impl ResolutionError {
    pub fn config_io(path: PathBuf, source: std::io::Error) -> Self {
        Self::ConfigIo { path, source }
    }

    pub fn invalid_config(path: PathBuf, details: impl Into<String>) -> Self {
        Self::InvalidConfig {
            path,
            details: details.into(),
        }
    }

    pub fn suggestion(&self) -> &'static str {
        match self {
            ResolutionError::ConfigIo { .. } => "Check that the config file exists and is readable.",
            ResolutionError::InvalidConfig { .. } => {
                "Check JSON syntax, comments and trailing commas in the config file."
            }
            ResolutionError::CircularExtends { .. } => {
                "Remove circular references between the configs' `extends` fields."
            }
        }
    }

    /// Stable code for programmatic handling in JSON responses
    pub fn status_code(&self) -> String {
        match self {
            ResolutionError::ConfigIo { .. } => "RESOLUTION_CONFIG_IO",
            ResolutionError::InvalidConfig { .. } => "RESOLUTION_INVALID_CONFIG",
            ResolutionError::CircularExtends { .. } => "RESOLUTION_CIRCULAR_EXTENDS",
        }
        .to_string()
    }

    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            ResolutionError::ConfigIo { .. } => vec![
                "Ensure the file exists and is readable",
                "Check the `extends` path for typos",
            ],
            ResolutionError::InvalidConfig { .. } => vec![
                "Validate the file with a JSON linter",
                "Aliases from this file are ignored until it parses",
            ],
            ResolutionError::CircularExtends { .. } => {
                vec!["Make the `extends` chain end at a config without `extends`"]
            }
        }
    }
}

pub type ResolutionResult<T> = Result<T, ResolutionError>;
