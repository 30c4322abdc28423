//! Configuration module for stylescope.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file (`.stylescope/settings.toml`)
//! - Environment variable overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `STYLESCOPE_` and use double
//! underscores to separate nested levels:
//! - `STYLESCOPE_INDEXING__MAX_DEPTH=4` sets `indexing.max_depth`
//! - `STYLESCOPE_COMPLETION__SUGGEST_MIXINS=false` sets `completion.suggest_mixins`
//! - `STYLESCOPE_FILE_WATCH__DEBOUNCE_MS=200` sets `file_watch.debounce_ms`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding the settings file, searched upward from the cwd.
pub const SETTINGS_DIR: &str = ".stylescope";
const ENV_PREFIX: &str = "STYLESCOPE_";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Workspace root directory (where .stylescope is located)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,

    /// Global debug mode
    #[serde(default = "default_false")]
    pub debug: bool,

    #[serde(default)]
    pub indexing: IndexingConfig,

    /// Project config (path alias) discovery
    #[serde(default)]
    pub project: ProjectSettings,

    #[serde(default)]
    pub completion: CompletionConfig,

    /// File watching settings
    #[serde(default)]
    pub file_watch: FileWatchConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct IndexingConfig {
    /// Glob patterns excluded from discovery, on top of .gitignore
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Maximum directory depth below the workspace root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,

    /// Follow static imports to files outside the discovered set
    #[serde(default = "default_true")]
    pub scan_imported_files: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProjectSettings {
    /// File names recognised as alias configs
    #[serde(default = "default_config_file_names")]
    pub config_file_names: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CompletionConfig {
    #[serde(default = "default_true")]
    pub suggest_variables: bool,

    #[serde(default = "default_true")]
    pub suggest_mixins: bool,

    #[serde(default = "default_true")]
    pub suggest_functions: bool,

    /// Characters after which functions are offered inside a property value
    #[serde(default = "default_function_triggers")]
    pub suggest_functions_in_string_context_after_symbols: String,

    /// Prefix for items from files the document does not import. Empty disables it.
    #[serde(default = "default_implicitly_label")]
    pub implicitly_label: String,

    /// Drop implicit items when the document has a `@use`
    #[serde(default = "default_false")]
    pub suggest_from_use_only: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FileWatchConfig {
    /// Enable automatic file watching for indexed files
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Debounce interval in milliseconds (default: 500ms)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_version() -> u32 {
    1
}
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_exclude() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}
fn default_config_file_names() -> Vec<String> {
    vec!["tsconfig.json".to_string(), "jsconfig.json".to_string()]
}
fn default_function_triggers() -> String {
    " (+-*%".to_string()
}
fn default_implicitly_label() -> String {
    "(implicitly)".to_string()
}
fn default_debounce_ms() -> u64 {
    500
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            workspace_root: None,
            debug: false,
            indexing: IndexingConfig::default(),
            project: ProjectSettings::default(),
            completion: CompletionConfig::default(),
            file_watch: FileWatchConfig::default(),
        }
    }
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            exclude: default_exclude(),
            max_depth: None,
            scan_imported_files: true,
        }
    }
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            config_file_names: default_config_file_names(),
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            suggest_variables: true,
            suggest_mixins: true,
            suggest_functions: true,
            suggest_functions_in_string_context_after_symbols: default_function_triggers(),
            implicitly_label: default_implicitly_label(),
            suggest_from_use_only: false,
        }
    }
}

impl Default for FileWatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl ProjectSettings {
    /// True when `path` has one of the configured config file names.
    pub fn is_config_file(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.config_file_names.iter().any(|n| n == name))
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(SETTINGS_DIR).join("settings.toml"));

        Self::figment(config_path)
            .extract()
            .map_err(Box::new)
            .map(|mut settings: Settings| {
                if settings.workspace_root.is_none() {
                    settings.workspace_root = Self::workspace_root();
                }
                settings
            })
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Self::figment(path.as_ref().to_path_buf())
            .extract()
            .map_err(Box::new)
    }

    fn figment(config_path: PathBuf) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_path))
            // Double underscore separates nested levels; single underscores
            // stay part of the field name
            .merge(Env::prefixed(ENV_PREFIX).map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
    }

    /// Find the settings file by looking for .stylescope upward from the cwd
    fn find_workspace_config() -> Option<PathBuf> {
        Self::workspace_root().map(|root| root.join(SETTINGS_DIR).join("settings.toml"))
    }

    /// Get the workspace root directory (where .stylescope is located)
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        current
            .ancestors()
            .find(|ancestor| ancestor.join(SETTINGS_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Write the default settings to `.stylescope/settings.toml` in the cwd
    pub fn init_config_file(force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = PathBuf::from(SETTINGS_DIR).join("settings.toml");

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        Settings::default().save(&config_path)?;
        Ok(config_path)
    }
}
