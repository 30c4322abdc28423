//! Error types for stylescope
//!
//! Only operational failures are errors. Unreadable stylesheets, malformed
//! project configs and unresolved imports degrade inside the index and never
//! show up here.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for indexing operations
#[derive(Error, Debug)]
pub enum IndexError {
    /// The workspace root itself cannot be read
    #[error("Failed to read workspace root '{path}': {source}")]
    WorkspaceRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A query target could not be read
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Position {line}:{character} is outside '{path}'")]
    InvalidPosition {
        path: PathBuf,
        line: u32,
        character: u32,
    },

    /// File watcher could not be started
    #[error("Failed to start file watcher: {reason}")]
    WatcherInit { reason: String },

    /// Configuration errors
    #[error("Invalid configuration: {reason}")]
    ConfigError { reason: String },

    #[error("Failed to save configuration to '{path}': {reason}")]
    ConfigSave { path: PathBuf, reason: String },

    /// Output serialization or file discovery failed
    #[error("{0}")]
    General(String),
}

impl IndexError {
    /// Get a stable status code for this error type.
    ///
    /// Returns a string identifier that can be used in JSON responses
    /// for programmatic error handling.
    pub fn status_code(&self) -> String {
        match self {
            Self::WorkspaceRead { .. } => "WORKSPACE_READ_ERROR",
            Self::FileRead { .. } => "FILE_READ_ERROR",
            Self::InvalidPosition { .. } => "INVALID_POSITION",
            Self::WatcherInit { .. } => "WATCHER_INIT_ERROR",
            Self::ConfigError { .. } => "CONFIG_ERROR",
            Self::ConfigSave { .. } => "CONFIG_SAVE_ERROR",
            Self::General(_) => "GENERAL_ERROR",
        }
        .to_string()
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::WorkspaceRead { .. } => vec![
                "Check that the workspace root exists and is a directory",
                "Pass the root explicitly, e.g. 'stylescope index ./styles'",
            ],
            Self::FileRead { .. } => vec![
                "Check that the file exists and is readable",
                "Paths are resolved against the current directory",
            ],
            Self::InvalidPosition { .. } => {
                vec!["Lines and characters are 0-based, characters count UTF-16 units"]
            }
            Self::WatcherInit { .. } => vec![
                "Check the OS limit on watched files (inotify max_user_watches on Linux)",
                "Disable watching with STYLESCOPE_FILE_WATCH__ENABLED=false",
            ],
            Self::ConfigError { .. } => vec![
                "Check .stylescope/settings.toml for syntax errors",
                "Run 'stylescope config --init --force' to regenerate the defaults",
            ],
            Self::ConfigSave { .. } => vec!["Check write permissions for the settings directory"],
            Self::General(_) => vec![],
        }
    }
}

impl From<Box<figment::Error>> for IndexError {
    fn from(error: Box<figment::Error>) -> Self {
        Self::ConfigError {
            reason: error.to_string(),
        }
    }
}

/// Result type alias for index operations
pub type IndexResult<T> = Result<T, IndexError>;
