pub mod events;
pub mod fs;
pub mod fs_watcher;
pub mod scanner;
pub mod walker;

pub use events::{WorkspaceEvent, WorkspaceEventKind};
pub use fs_watcher::FileSystemWatcher;
pub use scanner::{ScanStats, Scanner};
pub use walker::FileWalker;
