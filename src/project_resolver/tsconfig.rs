//! tsconfig.json / jsconfig.json parsing and extends resolution
//!
//! Handles JSONC parsing, the `extends` chain and turning
//! `compilerOptions.paths` into ordered [`AliasRule`]s.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

use super::{AliasRule, ProjectConfig, ResolutionError, ResolutionResult};
use crate::document::DocumentPath;

/// Compiler options subset for path resolution
///
/// Other options, `baseUrl` included, are ignored: substitutions always
/// resolve against the directory of the config that governs the document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompilerOptions {
    /// Alias pattern to candidate prefixes, in declaration order
    #[serde(default)]
    pub paths: IndexMap<String, Vec<String>>,
}

/// Minimal tsconfig.json representation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TsConfig {
    /// Extends another configuration file
    pub extends: Option<String>,

    #[serde(default, rename = "compilerOptions")]
    pub compiler_options: CompilerOptions,
}

/// JSONC parsing helper using json5 for comment and trailing comma support
pub fn parse_jsonc_tsconfig(path: &Path, content: &str) -> ResolutionResult<TsConfig> {
    json5::from_str(content)
        .map_err(|e| ResolutionError::invalid_config(path.to_path_buf(), e.to_string()))
}

/// Read and parse one config file
pub async fn read_tsconfig(path: &Path) -> ResolutionResult<TsConfig> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ResolutionError::config_io(path.to_path_buf(), e))?;

    parse_jsonc_tsconfig(path, &content)
}

/// Where an `extends` value points, relative to the extending config.
///
/// Bare package names are looked up in the config's `node_modules`.
fn extends_target(config_path: &DocumentPath, extends: &str) -> DocumentPath {
    let dir = config_path.parent();
    let target = if extends.starts_with('.') || Path::new(extends).is_absolute() {
        dir.join(extends)
    } else {
        dir.join("node_modules").join(extends)
    };

    if target.extension() == Some("json") {
        target
    } else {
        DocumentPath::new(format!("{target}.json"))
    }
}

/// Read `config_path` and every config it extends, child first.
///
/// Only a failure on `config_path` itself is an error. A missing or broken
/// parent, or a cycle, ends the chain where it happens.
pub async fn resolve_extends_chain(
    config_path: &DocumentPath,
) -> ResolutionResult<Vec<(DocumentPath, TsConfig)>> {
    let mut chain: Vec<(DocumentPath, TsConfig)> = Vec::new();
    let mut visited = HashSet::new();
    let mut next = Some(config_path.clone());

    while let Some(path) = next.take() {
        if !visited.insert(path.clone()) {
            let error = ResolutionError::CircularExtends {
                path: path.as_path().to_path_buf(),
            };
            warn!(config = %config_path, "{error}");
            break;
        }

        let config = match read_tsconfig(path.as_path()).await {
            Ok(config) => config,
            Err(error) if chain.is_empty() => return Err(error),
            Err(error) => {
                warn!(config = %config_path, "ignoring extended config: {error}");
                break;
            }
        };

        next = config
            .extends
            .as_deref()
            .map(|extends| extends_target(&path, extends));
        chain.push((path, config));
    }

    Ok(chain)
}

/// Merge a child-first chain into one entry.
///
/// Inherited aliases are merged textually: they come after the child's,
/// never replace a prefix the child already defines, and resolve against
/// the child's directory like its own.
pub fn merge_chain(config_path: DocumentPath, chain: Vec<(DocumentPath, TsConfig)>) -> ProjectConfig {
    let mut seen = HashSet::new();
    let mut aliases = Vec::new();
    let mut extends_chain = Vec::with_capacity(chain.len());

    for (path, config) in chain {
        for (pattern, targets) in config.compiler_options.paths {
            let prefix = pattern.trim_end_matches('*').to_string();
            if !seen.insert(prefix.clone()) {
                continue;
            }
            aliases.push(AliasRule {
                prefix,
                substitutions: targets
                    .iter()
                    .map(|target| target.trim_end_matches('*').to_string())
                    .collect(),
            });
        }
        extends_chain.push(path);
    }

    ProjectConfig {
        config_path,
        aliases,
        extends_chain,
    }
}

/// Load a project config, degrading to an empty alias table on any error.
pub async fn load_project_config(config_path: &DocumentPath) -> ProjectConfig {
    match resolve_extends_chain(config_path).await {
        Ok(chain) => {
            let config = merge_chain(config_path.clone(), chain);
            debug!(
                config = %config_path,
                aliases = config.aliases.len(),
                "loaded project config"
            );
            config
        }
        Err(error) => {
            warn!(
                config = %config_path,
                code = %error.status_code(),
                "{error}. {}",
                error.suggestion()
            );
            ProjectConfig::empty(config_path.clone())
        }
    }
}
