//! Config association, deletion and change handling

use crate::common::TestProject;
use stylescope::WorkspaceIndex;
use stylescope::indexing::WorkspaceEvent;
use stylescope::project_resolver::ProjectConfig;

const ROOT_CONFIG: &str = r#"{ "compilerOptions": { "paths": { "@root/*": ["shared/*"] } } }"#;
const WEB_CONFIG: &str = r#"{ "compilerOptions": { "paths": { "@web/*": ["lib/*"] } } }"#;

#[tokio::test]
async fn test_documents_use_the_nearest_config() {
    let project = TestProject::new();
    project.add_file("tsconfig.json", ROOT_CONFIG);
    project.add_file("packages/web/tsconfig.json", WEB_CONFIG);
    project.add_file("packages/web/src/app.scss", "$a: 1;");
    project.add_file("packages/api/style.scss", "$b: 1;");

    let (_, index) = project.index().await;
    assert_eq!(
        index.association(&project.doc("packages/web/src/app.scss")),
        Some(&project.doc("packages/web/tsconfig.json"))
    );
    assert_eq!(
        index.association(&project.doc("packages/api/style.scss")),
        Some(&project.doc("tsconfig.json"))
    );
}

#[tokio::test]
async fn test_deleted_config_hands_documents_to_ancestor() {
    let project = TestProject::new();
    project.add_file("tsconfig.json", ROOT_CONFIG);
    project.add_file("packages/web/tsconfig.json", WEB_CONFIG);
    project.add_file("packages/web/src/app.scss", "$a: 1;");

    let (scanner, mut index) = project.index().await;
    let removed = project.remove_file("packages/web/tsconfig.json");
    let event = WorkspaceEvent::deleted(&removed).unwrap();
    scanner.apply(&mut index, &event, &project.root()).await;

    assert!(!index.configs().contains(&project.doc("packages/web/tsconfig.json")));
    assert_eq!(
        index.association(&project.doc("packages/web/src/app.scss")),
        Some(&project.doc("tsconfig.json"))
    );
}

#[tokio::test]
async fn test_deletion_walk_includes_the_workspace_root() {
    let project = TestProject::new();
    project.add_file("packages/web/tsconfig.json", WEB_CONFIG);
    project.add_file("packages/web/src/app.scss", "$a: 1;");

    let (scanner, mut index) = project.index().await;

    // Appears without an event, so only the walk can find it
    project.add_file("tsconfig.json", ROOT_CONFIG);
    let removed = project.remove_file("packages/web/tsconfig.json");
    let event = WorkspaceEvent::deleted(&removed).unwrap();
    scanner.apply(&mut index, &event, &project.root()).await;

    assert!(index.configs().contains(&project.doc("tsconfig.json")));
    assert_eq!(
        index.association(&project.doc("packages/web/src/app.scss")),
        Some(&project.doc("tsconfig.json"))
    );
}

#[tokio::test]
async fn test_deleted_config_outside_root_leaves_documents_unassociated() {
    let project = TestProject::new();
    project.add_file("tsconfig.json", ROOT_CONFIG);
    project.add_file("ws/main.scss", "$a: 1;");

    let scanner = project.scanner();
    let mut index = WorkspaceIndex::new();
    let workspace_root = project.doc("ws");
    scanner
        .initialize(&mut index, workspace_root.as_path())
        .await
        .unwrap();
    assert!(index.association(&project.doc("ws/main.scss")).is_none());

    // Registered by hand: discovery never leaves the root
    index.add_config(ProjectConfig::empty(project.doc("tsconfig.json")));
    assert!(index.association(&project.doc("ws/main.scss")).is_some());

    let removed = project.remove_file("tsconfig.json");
    let event = WorkspaceEvent::deleted(&removed).unwrap();
    scanner.apply(&mut index, &event, &workspace_root).await;

    assert!(index.configs().is_empty());
    assert!(index.association(&project.doc("ws/main.scss")).is_none());
}

#[tokio::test]
async fn test_created_config_takes_over_descendants() {
    let project = TestProject::new();
    project.add_file("tsconfig.json", ROOT_CONFIG);
    project.add_file("packages/web/src/app.scss", "$a: 1;");

    let (scanner, mut index) = project.index().await;
    assert_eq!(
        index.association(&project.doc("packages/web/src/app.scss")),
        Some(&project.doc("tsconfig.json"))
    );

    let created = project.add_file("packages/web/tsconfig.json", WEB_CONFIG);
    let event = WorkspaceEvent::created(&created).unwrap();
    scanner.apply(&mut index, &event, &project.root()).await;

    assert_eq!(
        index.association(&project.doc("packages/web/src/app.scss")),
        Some(&project.doc("packages/web/tsconfig.json"))
    );
}

#[tokio::test]
async fn test_changed_config_is_rederived_in_place() {
    let project = TestProject::new();
    project.add_file("tsconfig.json", ROOT_CONFIG);
    project.add_file("main.scss", "$a: 1;");

    let (scanner, mut index) = project.index().await;
    let path = project.add_file(
        "tsconfig.json",
        r#"{ "compilerOptions": { "paths": { "@new/*": ["fresh/*"] } } }"#,
    );
    let event = WorkspaceEvent::changed(&path).unwrap();
    scanner.apply(&mut index, &event, &project.root()).await;

    let config = index.config_for(&project.doc("main.scss")).unwrap();
    assert_eq!(config.aliases.len(), 1);
    assert_eq!(config.aliases[0].prefix, "@new/");
    assert_eq!(index.configs().len(), 1);
}

#[tokio::test]
async fn test_changed_base_config_reaches_extending_configs() {
    let project = TestProject::new();
    project.add_file("base.json", r#"{ "compilerOptions": { "paths": {} } }"#);
    project.add_file("tsconfig.json", r#"{ "extends": "./base.json" }"#);
    project.add_file("main.scss", "@use '@lib/x';");

    let (scanner, mut index) = project.index().await;
    assert!(index.config_for(&project.doc("main.scss")).unwrap().aliases.is_empty());

    let base = project.add_file(
        "base.json",
        r#"{ "compilerOptions": { "paths": { "@lib/*": ["libs/*"] } } }"#,
    );
    let event = WorkspaceEvent::changed(&base).unwrap();
    scanner.apply(&mut index, &event, &project.root()).await;

    let config = index.config_for(&project.doc("main.scss")).unwrap();
    assert_eq!(config.aliases[0].prefix, "@lib/");
}

#[tokio::test]
async fn test_deleted_config_without_ancestor_leaves_documents_unassociated() {
    let project = TestProject::new();
    project.add_file("sub/tsconfig.json", WEB_CONFIG);
    project.add_file("sub/a.scss", "@use '@web/x';");

    let (scanner, mut index) = project.index().await;
    assert!(index.association(&project.doc("sub/a.scss")).is_some());

    let removed = project.remove_file("sub/tsconfig.json");
    let event = WorkspaceEvent::deleted(&removed).unwrap();
    scanner.apply(&mut index, &event, &project.root()).await;

    assert!(index.configs().is_empty());
    assert!(index.association(&project.doc("sub/a.scss")).is_none());
    assert!(index.config_for(&project.doc("sub/a.scss")).is_none());
}
