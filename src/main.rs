//! CLI entry point for the stylesheet index.
//!
//! Every query command indexes the workspace first, then answers one
//! question about one document and prints the answer as JSON on stdout.
//! Diagnostics go to stderr.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use lsp_types::Position;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use stylescope::document::{DocumentPath, ScssDocument};
use stylescope::indexing::{FileSystemWatcher, ScanStats};
use stylescope::symbols::SymbolTable;
use stylescope::{IndexError, IndexResult, Scanner, Settings, WorkspaceIndex, ide};
use tokio::sync::RwLock;
use tracing::Level;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// SCSS workspace index
#[derive(Parser)]
#[command(
    name = "stylescope",
    version = env!("CARGO_PKG_VERSION"),
    about = "Index SCSS workspaces and answer definition, completion and link queries",
    next_line_help = true,
    styles = clap_cargo_style()
)]
struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Workspace root for query commands (defaults to the settings root, then the current directory)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index the workspace and print a summary
    Index {
        /// Directory to index
        root: Option<PathBuf>,

        /// Print every symbol table instead of a summary
        #[arg(long)]
        symbols: bool,
    },

    /// Find the declaration of the symbol at a position
    #[command(after_help = "Lines and characters are 0-based.")]
    Definition {
        file: PathBuf,
        line: u32,
        character: u32,
    },

    /// List completion items at a position
    #[command(after_help = "Lines and characters are 0-based.")]
    Complete {
        file: PathBuf,
        line: u32,
        character: u32,
    },

    /// List links of the top-level @use statements of a file
    Links { file: PathBuf },

    /// Index the workspace, then keep it current until interrupted
    Watch {
        /// Directory to watch
        root: Option<PathBuf>,
    },

    /// Show active settings, or write the default settings file
    Config {
        /// Create .stylescope/settings.toml in the current directory
        #[arg(long)]
        init: bool,

        /// Overwrite an existing settings file
        #[arg(short, long, requires = "init")]
        force: bool,
    },
}

#[derive(Debug, Serialize)]
struct IndexSummary {
    root: PathBuf,
    documents: usize,
    configs: usize,
    stats: ScanStats,
    elapsed_ms: u128,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path).unwrap_or_else(|e| {
            eprintln!("Configuration error loading from {}: {e}", path.display());
            std::process::exit(1);
        }),
        None => Settings::load().unwrap_or_else(|e| {
            eprintln!("Configuration error: {e}");
            Settings::default()
        }),
    };

    let level = if cli.verbose || settings.debug {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();

    if let Err(e) = run(cli, settings).await {
        eprintln!("Error [{}]: {e}", e.status_code());
        for suggestion in e.recovery_suggestions() {
            eprintln!("  - {suggestion}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli, settings: Settings) -> IndexResult<()> {
    let positional = match &cli.command {
        Commands::Index { root, .. } | Commands::Watch { root } => root.clone(),
        _ => None,
    };
    let root = workspace_root(positional.or(cli.root).as_deref(), &settings)?;
    let settings = Arc::new(settings);

    match cli.command {
        Commands::Config { init, force } => {
            if init {
                let path = Settings::init_config_file(force).map_err(|e| IndexError::ConfigSave {
                    path: PathBuf::from(stylescope::config::SETTINGS_DIR).join("settings.toml"),
                    reason: e.to_string(),
                })?;
                println!("Created configuration file at: {}", path.display());
            } else {
                let rendered =
                    toml::to_string_pretty(settings.as_ref()).map_err(|e| IndexError::ConfigError {
                        reason: e.to_string(),
                    })?;
                println!("{rendered}");
            }
        }

        Commands::Index { symbols, .. } => {
            let start = Instant::now();
            let scanner = Scanner::new(settings);
            let mut index = WorkspaceIndex::new();
            let stats = scanner.initialize(&mut index, &root).await?;

            if symbols {
                let tables: Vec<&SymbolTable> = index.documents().collect();
                print_json(&tables)?;
            } else {
                print_json(&IndexSummary {
                    root,
                    documents: index.len(),
                    configs: index.configs().len(),
                    stats,
                    elapsed_ms: start.elapsed().as_millis(),
                })?;
            }
        }

        Commands::Definition {
            file,
            line,
            character,
        } => {
            let (mut index, document) = prepare(&settings, &root, &file).await?;
            let offset = offset_of(&document, line, character)?;
            let location = ide::find_definition(&mut index, &document, offset);
            print_json(&location)?;
        }

        Commands::Complete {
            file,
            line,
            character,
        } => {
            let (mut index, document) = prepare(&settings, &root, &file).await?;
            let offset = offset_of(&document, line, character)?;
            let list = ide::complete(&mut index, &document, offset, &settings.completion).await;
            print_json(&list)?;
        }

        Commands::Links { file } => {
            let (index, document) = prepare(&settings, &root, &file).await?;
            print_json(&ide::links(&index, &document))?;
        }

        Commands::Watch { .. } => {
            if !settings.file_watch.enabled {
                return Err(IndexError::ConfigError {
                    reason: "file watching is disabled (file_watch.enabled = false)".to_string(),
                });
            }
            let scanner = Arc::new(Scanner::new(settings));
            let mut index = WorkspaceIndex::new();
            let stats = scanner.initialize(&mut index, &root).await?;
            eprintln!(
                "Indexed {} documents ({} configs). Watching {} - press Ctrl+C to stop.",
                stats.files_scanned,
                stats.configs_loaded,
                root.display()
            );

            let index = Arc::new(RwLock::new(index));
            let watcher = FileSystemWatcher::new(index, scanner, DocumentPath::new(&root))?;
            tokio::select! {
                result = watcher.watch() => result?,
                _ = tokio::signal::ctrl_c() => eprintln!("Stopping watcher"),
            }
        }
    }

    Ok(())
}

/// Absolute workspace root from the flag, the settings, or the cwd.
fn workspace_root(flag: Option<&Path>, settings: &Settings) -> IndexResult<PathBuf> {
    let cwd = std::env::current_dir().map_err(|source| IndexError::WorkspaceRead {
        path: PathBuf::from("."),
        source,
    })?;
    let root = flag
        .map(Path::to_path_buf)
        .or_else(|| settings.workspace_root.clone())
        .unwrap_or_else(|| cwd.clone());
    Ok(DocumentPath::new(cwd.join(root)).as_path().to_path_buf())
}

/// Index the workspace and load the queried file.
async fn prepare(
    settings: &Arc<Settings>,
    root: &Path,
    file: &Path,
) -> IndexResult<(WorkspaceIndex, ScssDocument)> {
    let scanner = Scanner::new(settings.clone());
    let mut index = WorkspaceIndex::new();
    scanner.initialize(&mut index, root).await?;

    let absolute = std::path::absolute(file).map_err(|source| IndexError::FileRead {
        path: file.to_path_buf(),
        source,
    })?;
    let path = DocumentPath::new(absolute);
    let text = tokio::fs::read_to_string(path.as_path())
        .await
        .map_err(|source| IndexError::FileRead {
            path: path.as_path().to_path_buf(),
            source,
        })?;
    Ok((index, ScssDocument::new(path, text)))
}

fn offset_of(document: &ScssDocument, line: u32, character: u32) -> IndexResult<usize> {
    document
        .line_index()
        .offset(&document.text, Position::new(line, character))
        .ok_or_else(|| IndexError::InvalidPosition {
            path: document.path.as_path().to_path_buf(),
            line,
            character,
        })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> IndexResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| IndexError::General(format!("Failed to serialize output: {e}")))?;
    println!("{rendered}");
    Ok(())
}
