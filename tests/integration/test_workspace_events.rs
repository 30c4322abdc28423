//! Watcher events applied to the index

use crate::common::TestProject;
use std::sync::Arc;
use std::time::Duration;
use stylescope::indexing::{FileSystemWatcher, WorkspaceEvent};
use stylescope::{Scanner, Settings, WorkspaceIndex};
use tokio::sync::RwLock;

#[tokio::test]
async fn test_created_changed_deleted_stylesheet() {
    let project = TestProject::new();
    project.add_file("main.scss", "$a: 1;");
    let (scanner, mut index) = project.index().await;
    let root = project.root();

    let created = project.add_file("extra.scss", "@import 'fresh';\n$b: 2;");
    project.add_file("_fresh.scss", "$c: 3;");
    scanner
        .apply(&mut index, &WorkspaceEvent::created(&created).unwrap(), &root)
        .await;
    assert!(index.contains(&project.doc("extra.scss")));
    // Not indexed yet, so the import is followed
    assert_eq!(
        index
            .get(&project.doc("_fresh.scss"))
            .map(|t| t.document_import_path.as_str()),
        Some("fresh")
    );

    let changed = project.add_file("extra.scss", "$renamed: 2;");
    scanner
        .apply(&mut index, &WorkspaceEvent::changed(&changed).unwrap(), &root)
        .await;
    let extra = index.get(&project.doc("extra.scss")).unwrap();
    assert_eq!(extra.variables[0].name, "$renamed");
    assert!(extra.imports.is_empty());

    let deleted = project.remove_file("extra.scss");
    scanner
        .apply(&mut index, &WorkspaceEvent::deleted(&deleted).unwrap(), &root)
        .await;
    assert!(!index.contains(&project.doc("extra.scss")));
    assert!(index.contains(&project.doc("main.scss")));
}

#[tokio::test]
async fn test_change_does_not_rescan_known_imports() {
    let project = TestProject::new();
    project.add_file("main.scss", "@import 'vars';");
    project.add_file("_vars.scss", "$v: 1;");
    let (scanner, mut index) = project.index().await;

    // Edited on disk without an event of its own
    project.add_file("_vars.scss", "$changed: 1;");
    let main = project.add_file("main.scss", "@import 'vars';\n$m: 0;");
    let stats = scanner
        .apply(&mut index, &WorkspaceEvent::changed(&main).unwrap(), &project.root())
        .await;

    assert_eq!(stats.files_scanned, 1);
    let vars = index.get(&project.doc("_vars.scss")).unwrap();
    assert_eq!(vars.variables[0].name, "$v");
}

#[tokio::test]
async fn test_unrelated_files_are_ignored() {
    let project = TestProject::new();
    project.add_file("main.scss", "$a: 1;");
    let (scanner, mut index) = project.index().await;

    let notes = project.add_file("notes.md", "# notes");
    let stats = scanner
        .apply(&mut index, &WorkspaceEvent::created(&notes).unwrap(), &project.root())
        .await;

    assert_eq!(stats.files_scanned, 0);
    assert_eq!(stats.configs_loaded, 0);
    assert_eq!(index.len(), 1);
}

#[tokio::test]
async fn test_watcher_picks_up_new_files() {
    let project = TestProject::new();
    project.add_file("main.scss", "$a: 1;");

    let mut settings = Settings::default();
    settings.file_watch.debounce_ms = 50;
    let scanner = Arc::new(Scanner::new(Arc::new(settings)));
    let mut index = WorkspaceIndex::new();
    scanner.initialize(&mut index, project.path()).await.unwrap();
    let index = Arc::new(RwLock::new(index));

    let watcher = FileSystemWatcher::new(index.clone(), scanner, project.root()).unwrap();
    let handle = tokio::spawn(watcher.watch());
    tokio::time::sleep(Duration::from_millis(200)).await;

    project.add_file("late.scss", "$late: 1;");

    let target = project.doc("late.scss");
    let mut found = false;
    for _ in 0..100 {
        if index.read().await.contains(&target) {
            found = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    handle.abort();

    assert!(found, "watcher did not index the new file");
}
